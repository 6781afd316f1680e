//! Rusty Realty: an egui dashboard over commercial real-estate listings.
//!
//! The [`data`] module is UI-free and holds the whole pipeline (load,
//! preprocess, filter, aggregate, export). [`state`] drives it one
//! interaction at a time and [`app`] / [`ui`] draw the result.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
