//! Injected random stream
//!
//! The engine never creates its own generator. Callers pass any seeded
//! `rand::RngCore` (tests use `ChaCha8Rng`), and the engine only relies on
//! the methods below, so determinism depends on the seed and not on which
//! algorithm sits behind the stream.

/// Minimal random source used by the mutation engine
pub trait RandomStream {
    fn next_u64(&mut self) -> u64;

    /// Uniform float in [0, 1)
    fn next_f32(&mut self) -> f32 {
        // 24 high bits fit exactly in an f32 mantissa
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [min, max)
    fn next_f32_in_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_f32()
    }

    /// Uniform index in [0, len). Returns 0 for empty ranges.
    fn next_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        // Widening multiply avoids modulo bias for any realistic len
        ((self.next_u64() as u128 * len as u128) >> 64) as usize
    }

    fn coin_flip(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}

impl<R: rand::RngCore> RandomStream for R {
    fn next_u64(&mut self) -> u64 {
        rand::RngCore::next_u64(self)
    }
}

/// Fisher-Yates shuffle driven by a `RandomStream`
pub fn shuffle<T, R: RandomStream + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            assert_eq!(RandomStream::next_u64(&mut a), RandomStream::next_u64(&mut b));
        }
    }

    #[test]
    fn test_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let f = rng.next_f32_in_range(-0.5, 0.5);
            assert!((-0.5..0.5).contains(&f));
            assert!(rng.next_index(6) < 6);
        }
        assert_eq!(rng.next_index(0), 0);
        assert_eq!(rng.next_f32_in_range(2.0, 2.0), 2.0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
