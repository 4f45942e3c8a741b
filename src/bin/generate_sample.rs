use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One output row; field names match the dashboard's expected header.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Asthma")]
    asthma: u32,
    #[serde(rename = "COPD")]
    copd: u32,
    #[serde(rename = "Ischemic_heart_disease")]
    ischemic_heart_disease: u32,
    #[serde(rename = "Eye_inflammation")]
    eye_inflammation: u32,
    #[serde(rename = "Skin_inflammation")]
    skin_inflammation: u32,
    #[serde(rename = "PM25_avg")]
    pm25_avg: f64,
    #[serde(rename = "Temp_avg")]
    temp_avg: f64,
    #[serde(rename = "Wind Speed")]
    wind_speed: f64,
    /// Left blank now and then to exercise missing-value handling.
    #[serde(rename = "Humidity")]
    humidity: Option<f64>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Non-negative count around `mean`.
    fn count(&mut self, mean: f64, std_dev: f64) -> u32 {
        self.gauss(mean, std_dev).round().max(0.0) as u32
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2022, 1, 1).context("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).context("invalid end date")?;

    let output_path = "sample_health_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut rows = 0usize;
    for date in start.iter_days().take_while(|d| *d <= end) {
        // Dry season (Dec–Apr) brings haze: high PM2.5, low wind.
        let season = (2.0 * std::f64::consts::PI * (date.ordinal0() as f64) / 365.0).cos();
        let pm25 = (35.0 + 25.0 * season + rng.gauss(0.0, 8.0)).max(2.0);
        let wind = (2.5 - 1.0 * season + rng.gauss(0.0, 0.4)).max(0.1);
        let temp = 29.0 - 3.0 * season + rng.gauss(0.0, 1.2);
        let humidity = 70.0 - 12.0 * season + rng.gauss(0.0, 5.0);

        let exposure = pm25 / 35.0;
        let row = Row {
            date: date.format("%Y-%m-%d").to_string(),
            asthma: rng.count(40.0 * exposure, 6.0),
            copd: rng.count(25.0 * exposure, 5.0),
            ischemic_heart_disease: rng.count(18.0 + 4.0 * exposure, 4.0),
            eye_inflammation: rng.count(12.0 * exposure, 3.0),
            skin_inflammation: rng.count(10.0 + 2.0 * exposure, 3.0),
            pm25_avg: round1(pm25),
            temp_avg: round1(temp),
            wind_speed: round1(wind),
            humidity: (rng.next_f64() > 0.03).then(|| round1(humidity)),
        };
        writer
            .serialize(&row)
            .with_context(|| format!("writing row for {}", row.date))?;
        rows += 1;
    }
    writer.flush().context("flushing output")?;

    println!(
        "Wrote {rows} days ({} to {}) to {output_path}",
        start.year(),
        end.year()
    );
    Ok(())
}
