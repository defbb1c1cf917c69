use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use rand_core::RngCore;
use rand_distr::Distribution;

/// Deterministic randomness for reproducible property runs.
pub struct Source {
    source: ChaCha8Rng,
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    /// Rejection-samples a value in `[0, max)` from the bits selected by `mask`.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Uniform value in `[0, max)`.
    #[inline]
    pub fn next_usize_below(&mut self, max: usize) -> usize {
        assert!(max > 0, "invalid argument: max = 0");
        let mask: u64 = (max as u64).next_power_of_two() - 1;
        self.next_u64n(max as u64, mask) as usize
    }

    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(self)
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..32).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn bounded_draws() {
        let mut source: Source = Source::new([0u8; 32]);
        for max in [1usize, 2, 3, 7, 8, 100] {
            (0..256).for_each(|_| assert!(source.next_usize_below(max) < max));
        }
    }
}
