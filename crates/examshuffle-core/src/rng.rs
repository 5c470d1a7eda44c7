// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use sha2::Digest;
use sha2::Sha256;

use crate::types::seed::Seed;

/// Divisor mapping a raw 32-bit draw onto the unit interval.
const DIVISOR: f64 = u32::MAX as f64;

/// Largest `f64` strictly below 1.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;

/// A deterministic stream of values in `[0, 1)` derived from a seed.
///
/// Draw `k` (starting at 1) is the first four bytes of
/// `SHA-256(seed_hex ‖ k)`, read big-endian, divided by `2^32 - 1`. There is no
/// ambient entropy: equal seeds driven by equal call sequences agree.
pub struct SeededSequence {
    seed: String,
    counter: u64,
}

impl SeededSequence {
    pub fn from_seed(seed: &Seed) -> Self {
        Self {
            seed: seed.to_hex(),
            counter: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.counter
    }

    pub fn next_u32(&mut self) -> u32 {
        self.counter += 1;
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(self.counter.to_string().as_bytes());
        let digest = hasher.finalize();
        u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        // Only a raw draw of `u32::MAX` reaches 1.0; every other value is
        // left untouched by the clamp.
        (self.next_u32() as f64 / DIVISOR).min(MAX_UNIT)
    }

    /// Next integer in `[min, max)`. Panics if the range is empty or wider
    /// than `i64::MAX`.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        assert!(max > min, "empty range [{min}, {max})");
        let Some(span) = max.checked_sub(min) else {
            panic!("range [{min}, {max}) is too wide");
        };
        let offset = (self.next_unit() * span as f64).floor() as i64;
        // `span as f64` may round up, so the offset can reach `span`.
        min + offset.min(span - 1)
    }

    /// Next index in `[0, bound)`. Panics if `bound` is zero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        self.next_int(0, bound as i64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> Seed {
        Seed::from_bytes([byte; 32])
    }

    #[test]
    fn test_first_draw_uses_counter_one() {
        let s = seed(1);
        let mut hasher = Sha256::new();
        hasher.update(format!("{}1", s.to_hex()).as_bytes());
        let digest = hasher.finalize();
        let expected = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);

        let mut rng = SeededSequence::from_seed(&s);
        assert_eq!(rng.draws(), 0);
        assert_eq!(rng.next_u32(), expected);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededSequence::from_seed(&seed(7));
        let mut b = SeededSequence::from_seed(&seed(7));
        for _ in 0..100 {
            assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededSequence::from_seed(&seed(7));
        let mut b = SeededSequence::from_seed(&seed(8));
        let a: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let b: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unit_range() {
        let mut rng = SeededSequence::from_seed(&seed(3));
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
        assert!(MAX_UNIT < 1.0);
    }

    #[test]
    fn test_next_int_range() {
        let mut rng = SeededSequence::from_seed(&seed(4));
        let mut seen = [false; 5];
        for _ in 0..1_000 {
            let v = rng.next_int(-2, 3);
            assert!((-2..3).contains(&v));
            seen[(v + 2) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_next_int_single_value() {
        let mut rng = SeededSequence::from_seed(&seed(5));
        for _ in 0..100 {
            assert_eq!(rng.next_int(9, 10), 9);
        }
    }

    #[test]
    fn test_next_int_near_limits() {
        let mut rng = SeededSequence::from_seed(&seed(10));
        for _ in 0..100 {
            let v = rng.next_int(i64::MAX - 3, i64::MAX);
            assert!((i64::MAX - 3..i64::MAX).contains(&v));
            let v = rng.next_int(i64::MIN, i64::MIN + 2);
            assert!((i64::MIN..i64::MIN + 2).contains(&v));
            let v = rng.next_int(0, i64::MAX);
            assert!((0..i64::MAX).contains(&v));
        }
    }

    #[test]
    #[should_panic(expected = "too wide")]
    fn test_next_int_overwide_range_panics() {
        let mut rng = SeededSequence::from_seed(&seed(11));
        rng.next_int(i64::MIN, i64::MAX);
    }

    #[test]
    #[should_panic(expected = "empty range")]
    fn test_next_int_empty_range_panics() {
        let mut rng = SeededSequence::from_seed(&seed(6));
        rng.next_int(3, 3);
    }

    #[test]
    fn test_roughly_uniform() {
        let mut rng = SeededSequence::from_seed(&seed(9));
        let mut buckets = [0usize; 10];
        let n = 20_000;
        for _ in 0..n {
            buckets[rng.next_index(10)] += 1;
        }
        // Expected 2000 per bucket; allow a generous margin.
        for count in buckets {
            assert!((1700..2300).contains(&count), "bucket count {count}");
        }
    }
}
