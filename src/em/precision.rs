//! Extended-precision probabilities.
//!
//! Per-document likelihoods are products of one factor per distinct word.
//! A few hundred factors around `1e-3` underflow `f64` to zero, so every
//! probability the engine touches is a binary [`FBig`] with a fixed mantissa
//! width and round-half-to-even, and only converted to `f64` for logging,
//! the convergence statistic, and reporting.

use crate::error::{Error, Result};
use dashu_float::round::mode::HalfEven;
use dashu_float::FBig;

/// Binary arbitrary-precision float used for all engine probabilities.
pub type Prob = FBig<HalfEven, 2>;

/// Factory for [`Prob`] values carrying a fixed mantissa width.
///
/// Results of `+`, `*` and `/` inherit the larger operand precision, so
/// seeding every value through one context keeps the whole fit at that width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    bits: usize,
}

impl Precision {
    /// Context for `bits`-bit mantissas.
    pub fn new(bits: usize) -> Self {
        Self { bits }
    }

    /// Mantissa width.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Zero at this precision.
    pub fn zero(&self) -> Prob {
        Prob::ZERO.with_precision(self.bits).value()
    }

    /// One at this precision.
    pub fn one(&self) -> Prob {
        Prob::ONE.with_precision(self.bits).value()
    }

    /// Exact binary value of `x`, widened to this precision.
    pub fn from_f64(&self, name: &'static str, x: f64) -> Result<Prob> {
        if !x.is_finite() {
            return Err(Error::InvalidParameter {
                name,
                message: "not representable as a finite float",
            });
        }
        let value = Prob::try_from(x).map_err(|_| Error::InvalidParameter {
            name,
            message: "not representable as a finite float",
        })?;
        Ok(value.with_precision(self.bits).value())
    }
}

/// Nearest `f64` (may round to `0.0` for very small values).
pub fn to_f64(p: &Prob) -> f64 {
    p.to_f64().value()
}

/// `Σ ln(p)` over entries whose `f64` value is strictly positive.
///
/// Zero entries are skipped rather than contributing `-inf`.
pub fn positive_log_sum<'a>(values: impl IntoIterator<Item = &'a Prob>) -> f64 {
    values
        .into_iter()
        .map(to_f64)
        .filter(|&x| x > 0.0)
        .map(f64::ln)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_do_not_underflow() {
        let ctx = Precision::new(400);
        let factor = ctx.from_f64("factor", 1e-3).unwrap();
        let mut product = ctx.one();
        for _ in 0..400 {
            product = &product * &factor;
        }
        // 1e-1200 is far below f64's range but still strictly positive here.
        assert!(product > ctx.zero());

        let ratio = &product / &product;
        assert!((to_f64(&ratio) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn precision_is_carried() {
        let ctx = Precision::new(256);
        assert_eq!(ctx.bits(), 256);
        let third = &ctx.one() / &ctx.from_f64("three", 3.0).unwrap();
        assert!((to_f64(&third) - 1.0 / 3.0).abs() < 1e-16);
    }

    #[test]
    fn non_finite_is_rejected() {
        let ctx = Precision::new(128);
        assert!(ctx.from_f64("x", f64::NAN).is_err());
        assert!(ctx.from_f64("x", f64::INFINITY).is_err());
    }

    #[test]
    fn log_sum_skips_zeros() {
        let ctx = Precision::new(128);
        let values = [
            ctx.one(),
            ctx.zero(),
            ctx.from_f64("half", 0.5).unwrap(),
        ];
        let sum = positive_log_sum(values.iter());
        assert!((sum - 0.5f64.ln()).abs() < 1e-12);
    }
}
