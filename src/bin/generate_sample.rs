use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

/// Layouts written to the sample, one of which is picked per row.
const NAIVE_LAYOUTS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m-%d-%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
    "%m-%d-%Y %H:%M",
    "%Y/%m/%d %H:%M",
];

const JUNK: [&str; 4] = ["", "not-a-date", "N/A", "2023-13-45 99:99:99"];

/// Deterministic splitmix64 stream; the sample is identical on every run.
struct SimpleRng(u64);

impl SimpleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// Render `t` in a randomly chosen accepted layout, or as junk ~5% of the time.
fn render(t: DateTime<Utc>, rng: &mut SimpleRng) -> String {
    if rng.next_f64() < 0.05 {
        return JUNK[rng.below(JUNK.len() as u64) as usize].to_string();
    }
    // One slot in nine is the offset-aware layout.
    let pick = rng.below(NAIVE_LAYOUTS.len() as u64 + 1) as usize;
    match NAIVE_LAYOUTS.get(pick) {
        Some(layout) => t.format(layout).to_string(),
        None => {
            let hours = rng.below(25) as i32 - 12;
            let offset = FixedOffset::east_opt(hours * 3600).unwrap_or(FixedOffset::east_opt(0).unwrap());
            t.with_timezone(&offset)
                .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
                .to_string()
        }
    }
}

fn main() {
    let mut rng = SimpleRng(42);

    let sensors = ["north", "south", "east", "west"];
    let origin = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let year_secs = 365 * 24 * 3600;

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(["reading_id", "sensor", "value", "recorded_at"])
        .expect("Failed to write header");

    let n_rows = 500;
    for id in 0..n_rows {
        let t = origin
            + Duration::seconds(rng.below(year_secs) as i64)
            + Duration::milliseconds(rng.below(1000) as i64);
        let sensor = sensors[rng.below(sensors.len() as u64) as usize];
        let value = format!("{:.3}", 20.0 + rng.next_f64() * 15.0);

        writer
            .write_record([id.to_string(), sensor.to_string(), value, render(t, &mut rng)])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {n_rows} rows with mixed timestamp layouts to {output_path}");
}
