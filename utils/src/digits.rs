//! Digit arithmetic in base `2^log_radix`.
//!
//! Every index handled by the network is a fixed-length word of radix digits,
//! least significant digit first. Stage indices, butterfly-unit ids and memory
//! addresses are all derived from these words by dropping, extracting or
//! permuting digits.

#[inline(always)]
fn low_mask(bits: usize) -> usize {
    if bits >= usize::BITS as usize {
        usize::MAX
    } else {
        (1usize << bits) - 1
    }
}

#[inline(always)]
fn shr(v: usize, bits: usize) -> usize {
    v.checked_shr(bits as u32).unwrap_or(0)
}

/// Returns `log2(x)` if `x` is a power of two.
#[inline]
pub fn exact_log2(x: usize) -> Option<usize> {
    if x.is_power_of_two() {
        Some(x.trailing_zeros() as usize)
    } else {
        None
    }
}

/// Splits `v` into `len` little-endian digits of `log_radix` bits.
/// Digits of `v` above position `len` are dropped.
pub fn digits_of(v: usize, log_radix: usize, len: usize) -> Vec<usize> {
    let mask: usize = low_mask(log_radix);
    let mut tmp: usize = v;
    let mut digits: Vec<usize> = Vec::with_capacity(len);
    for _ in 0..len {
        digits.push(tmp & mask);
        tmp = shr(tmp, log_radix);
    }
    digits
}

/// Inverse of [digits_of]: composes little-endian digits into an integer.
pub fn from_digits(digits: &[usize], log_radix: usize) -> usize {
    debug_assert!(
        digits.iter().all(|d| *d <= low_mask(log_radix)),
        "invalid argument: digit larger than radix-1 in {:?}",
        digits
    );
    digits.iter().rev().fold(0usize, |acc, d| (acc << log_radix) | d)
}

/// Reverses the order of the `len` low digits of `v`:
/// `v_0 + v_1 R + ... + v_{len-1} R^{len-1}` becomes
/// `v_{len-1} + v_{len-2} R + ... + v_0 R^{len-1}`.
pub fn reverse_digits(v: usize, log_radix: usize, len: usize) -> usize {
    let mask: usize = low_mask(log_radix);
    let mut tmp: usize = v;
    let mut rev: usize = 0;
    for _ in 0..len {
        rev = (rev << log_radix) | (tmp & mask);
        tmp = shr(tmp, log_radix);
    }
    rev
}

/// Two-segment digit reversal used by pipelined network variants.
///
/// Part of the public digit toolbox: the network of this workspace only needs
/// [reverse_digits], the split form serves last-stage schedules that reverse
/// unit and position digits separately.
///
/// Digits `[0, step)` are reversed among themselves and digits `[step, len)`
/// among themselves. `step == 0` (or `step == len`) is [reverse_digits].
pub fn reverse_digits_split(v: usize, log_radix: usize, len: usize, step: usize) -> usize {
    assert!(
        step <= len,
        "invalid argument: step={} > len={}",
        step,
        len
    );
    let low_bits: usize = step * log_radix;
    let low: usize = reverse_digits(v & low_mask(low_bits), log_radix, step);
    let high: usize = reverse_digits(shr(v, low_bits), log_radix, len - step);
    high.checked_shl(low_bits as u32).unwrap_or(0) | low
}

/// Stride ordering of `[0, n)`: `0, stride, 2*stride, ...` then `1, 1+stride, ...`
/// and so on. With `cons > 1`, runs of `cons` consecutive values move together.
///
/// `inc_stride(8, 2, 1) = [0, 2, 4, 6, 1, 3, 5, 7]`.
pub fn inc_stride(n: usize, stride: usize, cons: usize) -> Vec<usize> {
    debug_assert!(stride * cons != 0, "invalid argument: stride*cons = 0");
    debug_assert!(
        n % (stride * cons) == 0,
        "invalid argument: n={} is not a multiple of stride*cons={}",
        n,
        stride * cons
    );
    let rows: usize = n / (stride * cons);
    let mut order: Vec<usize> = Vec::with_capacity(n);
    for offset in 0..stride {
        for i in 0..rows {
            for c in 0..cons {
                order.push(offset * cons + c + i * stride * cons);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_roundtrip_radix8() {
        let digits: Vec<usize> = digits_of(0o765, 3, 4);
        assert_eq!(digits, vec![5, 6, 7, 0]);
        assert_eq!(from_digits(&digits, 3), 0o765);
        // digits above len are dropped
        assert_eq!(digits_of(0o1765, 3, 3), vec![5, 6, 7]);
    }

    #[test]
    fn reverse_radix8_three_digits() {
        let want: [(usize, usize); 9] = [
            (0, 0),
            (1, 64),
            (2, 128),
            (7, 448),
            (8, 8),
            (63, 504),
            (64, 1),
            (100, 289),
            (511, 511),
        ];
        want.iter()
            .for_each(|(v, rev)| assert_eq!(reverse_digits(*v, 3, 3), *rev, "v={}", v));
    }

    #[test]
    fn reverse_is_an_involution() {
        for log_radix in 1..5 {
            for len in 1..5 {
                let n: usize = 1 << (log_radix * len);
                for v in 0..n {
                    assert_eq!(reverse_digits(reverse_digits(v, log_radix, len), log_radix, len), v);
                }
            }
        }
    }

    #[test]
    fn reverse_split_segments() {
        // radix 4, digits (lsb first) [1, 2, 3, 0, 1]
        let v: usize = from_digits(&[1, 2, 3, 0, 1], 2);
        assert_eq!(reverse_digits_split(v, 2, 5, 0), reverse_digits(v, 2, 5));
        assert_eq!(reverse_digits_split(v, 2, 5, 5), reverse_digits(v, 2, 5));
        assert_eq!(reverse_digits_split(v, 2, 5, 2), from_digits(&[2, 1, 1, 0, 3], 2));
        assert_eq!(reverse_digits_split(v, 2, 5, 3), from_digits(&[3, 2, 1, 1, 0], 2));
    }

    #[test]
    fn stride_orderings() {
        assert_eq!(inc_stride(8, 2, 1), vec![0, 2, 4, 6, 1, 3, 5, 7]);
        assert_eq!(inc_stride(8, 2, 2), vec![0, 1, 4, 5, 2, 3, 6, 7]);
        assert_eq!(inc_stride(6, 1, 1), (0..6).collect::<Vec<usize>>());
        let mut sorted: Vec<usize> = inc_stride(64, 8, 1);
        sorted.sort();
        assert_eq!(sorted, (0..64).collect::<Vec<usize>>());
    }

    #[test]
    fn log2_of_powers() {
        assert_eq!(exact_log2(1), Some(0));
        assert_eq!(exact_log2(16), Some(4));
        assert_eq!(exact_log2(12), None);
        assert_eq!(exact_log2(0), None);
    }
}
