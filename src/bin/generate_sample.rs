use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

/// Write a synthetic `{"items": [...]}` listing file.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    #[arg(long, default_value = "data/raw_data.json")]
    out: PathBuf,

    #[arg(long, default_value_t = 300)]
    count: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Category name with its typical deposit and monthly rent (10k KRW).
const CATEGORIES: [(&str, f64, f64); 6] = [
    ("카페", 3000.0, 180.0),
    ("음식점", 4000.0, 250.0),
    ("편의점", 2500.0, 150.0),
    ("주점", 3500.0, 220.0),
    ("미용실", 2000.0, 120.0),
    ("학원", 5000.0, 300.0),
];

const STATIONS: [(&str, &str); 6] = [
    ("강남역", "강남구"),
    ("역삼역", "강남구"),
    ("홍대입구역", "마포구"),
    ("신촌역", "서대문구"),
    ("잠실역", "송파구"),
    ("건대입구역", "광진구"),
];

fn listing(rng: &mut StdRng, id: usize, first_day: NaiveDate) -> Value {
    let (category, base_deposit, base_rent) = *CATEGORIES.choose(rng).unwrap_or(&CATEGORIES[0]);
    let (station, gu) = *STATIONS.choose(rng).unwrap_or(&STATIONS[0]);

    let scale: f64 = rng.gen_range(0.4..2.0_f64);
    let deposit = (base_deposit * scale / 100.0).round() * 100.0;
    let monthly_rent = (base_rent * scale * rng.gen_range(0.8..1.2_f64)).round();
    // Roughly a quarter of listings carry no key money.
    let premium = if rng.gen_bool(0.25) {
        0.0
    } else {
        (deposit * rng.gen_range(0.1..1.5_f64) / 100.0).round() * 100.0
    };
    let size = (rng.gen_range(15.0..180.0_f64) * 10.0).round() / 10.0;

    // Basement units come through as text and do not coerce to a number.
    let floor = match rng.gen_range(0..10_i32) {
        0 => json!("B1"),
        n => json!(n.min(5)),
    };
    let near_subway = match rng.gen_range(0..8) {
        0 => Value::Null,
        1 => json!(format!("{station} 버스 이용")),
        _ => json!(format!("{station} 도보 {}분", rng.gen_range(1..20))),
    };

    let created = first_day + Duration::days(rng.gen_range(0..60));
    let created_at = format!(
        "{}T{:02}:{:02}:00Z",
        created.format("%Y-%m-%d"),
        rng.gen_range(0..24),
        rng.gen_range(0..60)
    );

    json!({
        "id": id,
        "title": format!("{gu} {category} 매물 {id}"),
        "businessMiddleCodeName": category,
        "deposit": deposit,
        "monthlyRent": monthly_rent,
        "premium": premium,
        "maintenanceFee": rng.gen_range(5..40),
        "size": size,
        "floor": floor,
        "createdDateUtc": created_at,
        "nearSubwayStation": near_subway,
        "location": { "gu": gu, "station": station },
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid start date")?;
    let items: Vec<Value> = (1..=args.count)
        .map(|id| listing(&mut rng, id, first_day))
        .collect();

    if let Some(dir) = args.out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let text = serde_json::to_string_pretty(&json!({ "items": items }))?;
    std::fs::write(&args.out, text)
        .with_context(|| format!("writing {}", args.out.display()))?;

    println!("Wrote {} listings to {}", args.count, args.out.display());
    Ok(())
}
