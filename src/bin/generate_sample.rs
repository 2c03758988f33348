use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use impact_explorer::data::model::{
    CARBON_INTENSITY_ARRAY, COUNTY_FIPS_ARRAY, WATER_INTENSITY_ARRAY, WATER_SCARCITY_ARRAY,
};
use impact_explorer::data::states::STATES;

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

    /// Positive value spread around `median` (log-normal).
    fn lognormal(&mut self, median: f64, sigma: f64) -> f64 {
        median * self.gauss(0.0, sigma).exp()
    }
}

/// Roughly 1 in 40 cells becomes a sentinel: zero or missing.
fn with_sentinels(value: f64, rng: &mut SimpleRng) -> Option<f64> {
    let roll = rng.next_f64();
    if roll < 0.0125 {
        Some(0.0)
    } else if roll < 0.025 {
        None
    } else {
        Some(value)
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut fips: Vec<i64> = Vec::new();
    let mut carbon: Vec<Option<f64>> = Vec::new();
    let mut water: Vec<Option<f64>> = Vec::new();
    let mut scarcity: Vec<Option<f64>> = Vec::new();

    for state in &STATES {
        let state_code: i64 = state.fips.parse().context("state FIPS code")?;
        // Grid mix differs by state; counties scatter around it.
        let grid_carbon = rng.lognormal(0.45, 0.35);
        let grid_water = rng.lognormal(2.0, 0.5);
        let dryness = rng.lognormal(1.0, 0.8);
        let n_counties = 5 + (rng.next_u64() % 60) as i64;

        for county in 0..n_counties {
            let c = rng.lognormal(grid_carbon, 0.15);
            let w = rng.lognormal(grid_water, 0.25);
            let s = w * rng.lognormal(dryness, 0.6);

            fips.push(state_code * 1000 + 2 * county + 1);
            carbon.push(with_sentinels(c, &mut rng));
            water.push(with_sentinels(w, &mut rng));
            scarcity.push(with_sentinels(s, &mut rng));
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new(WATER_SCARCITY_ARRAY, DataType::Float64, true),
        Field::new(CARBON_INTENSITY_ARRAY, DataType::Float64, true),
        Field::new(WATER_INTENSITY_ARRAY, DataType::Float64, true),
        Field::new(COUNTY_FIPS_ARRAY, DataType::Int64, false),
    ]));

    let n_rows = fips.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(scarcity)),
            Arc::new(Float64Array::from(carbon)),
            Arc::new(Float64Array::from(water)),
            Arc::new(Int64Array::from(fips)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let output_path = "CountyLevelMetrics.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {n_rows} counties across {} states to {output_path}", STATES.len());
    Ok(())
}
