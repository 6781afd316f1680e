//! egui rendering. Everything here reads [`crate::state::AppState`] and
//! forwards user edits back to it.

pub mod charts;
pub mod panels;
pub mod table;
