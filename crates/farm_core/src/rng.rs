//! Deterministic random stream utilities.
//!
//! A [`Stream`] is keyed by a string and reproduces the same sequence of
//! samples for the same key. Call sites build a fresh stream from a label such
//! as `"{seed id}{day}"` whenever real environmental data is missing, so two
//! runs over identical inputs never diverge.

const LCG_MULTIPLIER: u64 = 1_664_525;
const LCG_INCREMENT: u64 = 1_013_904_223;
const LCG_MODULUS: u64 = 1 << 32;

#[derive(Clone, Debug)]
pub struct Stream {
    state: u64,
}

impl Stream {
    /// Construct a stream for the given key.
    pub fn from_key(key: &str) -> Self {
        Self {
            state: hash_key(key),
        }
    }

    /// Advance the linear congruential state and return a sample in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Advance the stream and return `true` with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

/// Stream key used by the daily weather fallback.
pub fn weather_key(seed_id: &str, day: u32) -> String {
    format!("{seed_id}{day}")
}

/// Rolling `*31` hash over UTF-16 code units, wrapped to `i32` and made
/// non-negative.
fn hash_key(key: &str) -> u64 {
    let mut hash: i32 = 0;
    for unit in key.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    i64::from(hash).unsigned_abs()
}
