use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Powers of two `2^k` with `k` drawn uniformly from `[min_log, max_log]`.
///
/// Radix and parallelism parameters of the network are always powers of two,
/// so randomized configurations are drawn through their logarithm.
#[derive(Clone, Debug)]
pub struct LogUniform {
    log: Uniform<u32>,
}

impl LogUniform {
    pub fn new(min_log: u32, max_log: u32) -> LogUniform {
        assert!(
            min_log <= max_log && max_log < usize::BITS,
            "invalid argument: log range [{}, {}]",
            min_log,
            max_log
        );
        LogUniform {
            log: Uniform::new_inclusive(min_log, max_log).expect("non-empty log range"),
        }
    }
}

impl Distribution<usize> for LogUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        1usize << self.log.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    #[test]
    fn powers_in_range() {
        let dist: LogUniform = LogUniform::new(1, 4);
        let mut source: Source = Source::new([1u8; 32]);
        let mut seen: [bool; 5] = [false; 5];
        (0..512).for_each(|_| {
            let x: usize = source.sample(&dist);
            assert!(x.is_power_of_two() && (2..=16).contains(&x), "x={}", x);
            seen[x.trailing_zeros() as usize] = true;
        });
        assert_eq!(seen, [false, true, true, true, true]);
    }

    #[test]
    fn single_value_range() {
        let mut source: Source = Source::new([2u8; 32]);
        let dist: LogUniform = LogUniform::new(3, 3);
        (0..8).for_each(|_| assert_eq!(source.sample(&dist), 8));
    }
}
