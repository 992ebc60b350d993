//! Synthetic workloads for benchmarking the Tempo replayer.
//!
//! - [`synthetic_line`]: one JSON record with a query and parameters
//! - [`synthetic_log`]: a newline-delimited log of such records
//! - [`write_synthetic_log`]: the same log, written to any `Write`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::io::{self, Write};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;

/// Query field name used by every synthetic record.
pub const QUERY_FIELD: &str = "query";

/// Parameter field name used by every synthetic record.
pub const PARAMS_FIELD: &str = "params";

const TABLES: [&str; 4] = ["users", "orders", "items", "sessions"];

/// Build one record line (without the trailing newline).
///
/// Every query selects from a random table with `param_count`
/// placeholders, and `params` holds that many random values.
pub fn synthetic_line(rng: &mut impl Rng, param_count: usize) -> String {
    let table = TABLES[rng.random_range(0..TABLES.len())];
    let placeholders: Vec<String> = (1..=param_count).map(|i| format!("${i}")).collect();
    let query = format!(
        "SELECT * FROM {table} WHERE id IN ({})",
        placeholders.join(", ")
    );
    let params: Vec<String> = (0..param_count)
        .map(|_| rng.random_range(0..1_000_000u32).to_string())
        .collect();
    json!({ QUERY_FIELD: query, PARAMS_FIELD: params, "ts": rng.random::<u32>() }).to_string()
}

/// Build a deterministic log of `records` lines for `seed`.
pub fn synthetic_log(records: usize, param_count: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut buf = Vec::with_capacity(records * 96);
    for _ in 0..records {
        buf.extend_from_slice(synthetic_line(&mut rng, param_count).as_bytes());
        buf.push(b'\n');
    }
    buf
}

/// Write a deterministic log of `records` lines for `seed` to `out`.
pub fn write_synthetic_log<W: Write>(
    out: &mut W,
    records: usize,
    param_count: usize,
    seed: u64,
) -> io::Result<()> {
    out.write_all(&synthetic_log(records, param_count, seed))
}
