use std::f64::consts::PI;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const NUM_TRACES: usize = 48;
const TRACE_INTERVAL_M: f64 = 25.0;
const NUM_SAMPLES: usize = 500;
const SAMPLE_INTERVAL_S: f64 = 0.004;
const PEAK_FREQUENCY_HZ: f64 = 25.0;

/// Ricker (Mexican hat) wavelet evaluated `tau` seconds from its peak.
fn ricker(tau: f64, peak_hz: f64) -> f64 {
    let a = (PI * peak_hz * tau).powi(2);
    (1.0 - 2.0 * a) * (-a).exp()
}

/// Two-way time of a flat reflector at zero-offset time `t0` seen at `offset`.
fn moveout(t0: f64, offset: f64, velocity: f64) -> f64 {
    (t0 * t0 + (offset / velocity).powi(2)).sqrt()
}

fn generate_trace(
    times: &[f64],
    offset: f64,
    reflectors: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    times
        .iter()
        .map(|&t| {
            let signal: f64 = reflectors
                .iter()
                .map(|&(t0, velocity, amp)| {
                    amp * ricker(t - moveout(t0, offset, velocity), PEAK_FREQUENCY_HZ)
                })
                .sum();
            signal + rng.gauss(0.0, noise_level)
        })
        .collect()
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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let times: Vec<f64> = (0..NUM_SAMPLES).map(|i| i as f64 * SAMPLE_INTERVAL_S).collect();
    let offsets: Vec<f64> = (0..NUM_TRACES).map(|i| i as f64 * TRACE_INTERVAL_M).collect();

    // (zero-offset time s, stacking velocity m/s, amplitude)
    let reflectors = [
        (0.30, 1600.0, 1.0),
        (0.75, 2100.0, -0.7),
        (1.20, 2600.0, 0.5),
        (1.65, 3000.0, -0.35),
    ];

    let mut fields = vec![Field::new("sample_axis", DataType::Float64, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(Float64Array::from(times.clone()))];

    for &offset in &offsets {
        let trace = generate_trace(&times, offset, &reflectors, 0.02, &mut rng);
        fields.push(Field::new(format!("{offset}"), DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(trace)));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns)
        .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_gather.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {NUM_TRACES} traces ({NUM_SAMPLES} samples each) to {output_path}"
    );
}
