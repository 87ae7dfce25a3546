//! Standard normal distribution: CDF, inverse CDF and critical values.
//!
//! The CDF goes through `erfc`, evaluated with a positive-term series near
//! zero and a continued fraction in the tails; both are accurate to roughly
//! 1e-14. The inverse starts from Acklam's rational approximation and takes
//! one Halley step against that CDF.

use std::f64::consts::{PI, SQRT_2};

/// Switch-over between the series and the continued fraction
const SERIES_LIMIT: f64 = 3.0;
const CONTINUED_FRACTION_TERMS: u32 = 80;

/// Complementary error function
pub fn erfc(x: f64) -> f64 {
    if x < 0.0 {
        return 2.0 - erfc(-x);
    }
    if x < SERIES_LIMIT {
        return 1.0 - erf_series(x);
    }
    // erfc(x) = exp(-x²)/√π · 1/(x + (1/2)/(x + 1/(x + (3/2)/(x + ...))))
    let mut f = x;
    for k in (1..=CONTINUED_FRACTION_TERMS).rev() {
        f = x + (k as f64 / 2.0) / f;
    }
    (-x * x).exp() / (PI.sqrt() * f)
}

/// erf(x) = 2/√π · exp(-x²) · Σ 2ⁿ x^(2n+1) / (1·3·…·(2n+1)), all terms positive
fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    let mut n = 0.0;
    while term > sum * 1e-17 {
        n += 1.0;
        term *= 2.0 * x2 / (2.0 * n + 1.0);
        sum += term;
    }
    2.0 / PI.sqrt() * (-x2).exp() * sum
}

/// Φ(z), the standard normal CDF
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];
const P_LOW: f64 = 0.024_25;

/// Φ⁻¹(p) for 0 < p < 1. Returns ±∞ at the endpoints and NaN outside.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    let x = if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    };

    // one Halley step
    let e = normal_cdf(x) - p;
    let u = e * (2.0 * PI).sqrt() * (x * x / 2.0).exp();
    x - u / (1.0 + x * u / 2.0)
}

/// Two-sided critical value for a confidence level given as a fraction (0.95 → 1.96).
pub fn z_for_confidence(level: f64) -> f64 {
    inverse_normal_cdf(1.0 - (1.0 - level) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdf_reference_values() {
        assert_eq!(normal_cdf(0.0), 0.5);
        assert!((normal_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-13);
        assert!((normal_cdf(-1.959_963_984_540_054) - 0.025).abs() < 1e-13);
        assert!((normal_cdf(-5.0) - 2.866_515_718_791_939e-7).abs() < 1e-18);
    }

    #[test]
    fn test_erf_continuity_at_switch() {
        let below = erfc(SERIES_LIMIT - 1e-12);
        let above = erfc(SERIES_LIMIT);
        assert!((below - above).abs() < 1e-14);
    }

    #[test]
    fn test_inverse_reference_values() {
        assert!((inverse_normal_cdf(0.975) - 1.959_963_984_540_054).abs() < 1e-12);
        assert!((inverse_normal_cdf(0.8) - 0.841_621_233_572_914_2).abs() < 1e-12);
        assert!((inverse_normal_cdf(0.01) + 2.326_347_874_040_841).abs() < 1e-12);
        assert_eq!(inverse_normal_cdf(0.5), 0.0);
    }

    #[test]
    fn test_inverse_roundtrip() {
        for i in 1..100 {
            let p = i as f64 / 100.0;
            assert!((normal_cdf(inverse_normal_cdf(p)) - p).abs() < 1e-13);
        }
    }

    #[test]
    fn test_inverse_edges() {
        assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
        assert!(inverse_normal_cdf(1.5).is_nan());
    }

    #[test]
    fn test_confidence_critical_values() {
        assert!((z_for_confidence(0.95) - 1.96).abs() < 1e-4);
        assert!((z_for_confidence(0.99) - 2.5758).abs() < 1e-4);
        assert!((z_for_confidence(0.90) - 1.6449).abs() < 1e-4);
    }
}
