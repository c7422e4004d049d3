// ABOUTME: Self-contained probability distribution routines for significance testing
// ABOUTME: Log-gamma, regularized incomplete beta, Student-t and standard normal CDF/quantiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

//! Numerical support for the statistical kernel.
//!
//! These cover exactly what regression and correlation significance need:
//! two-sided t-test p-values, t critical values for confidence bands, and
//! normal quantiles for effect-size intervals.

use std::f64::consts::{PI, SQRT_2};

/// Lanczos approximation coefficients (g = 7, n = 9)
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

const LANCZOS_G: f64 = 7.0;

/// Iteration cap for the incomplete-beta continued fraction
const BETA_MAX_ITERATIONS: u32 = 300;

/// Convergence tolerance for the continued fraction
const BETA_EPSILON: f64 = 1e-15;

/// Guard against division by zero inside Lentz's algorithm
const FLOAT_MIN: f64 = 1e-300;

/// Bisection steps for inverting the t CDF
const QUANTILE_BISECTION_STEPS: u32 = 200;

/// Natural log of the gamma function for `x > 0`
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula
        return (PI / (PI * x).sin().abs()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut series = LANCZOS_COEFFICIENTS[0];
    for (i, coefficient) in (1_u32..).zip(LANCZOS_COEFFICIENTS.iter().skip(1)) {
        series += coefficient / (x + f64::from(i));
    }
    let t = x + LANCZOS_G + 0.5;

    // 0.5 * ln(2π) + (x + 0.5) ln t − t + ln(series)
    0.5f64.mul_add((2.0 * PI).ln(), (x + 0.5).mul_add(t.ln(), -t)) + series.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`
#[must_use]
pub fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = a.mul_add(
        x.ln(),
        b.mul_add((1.0 - x).ln(), ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b)),
    );
    let front = ln_front.exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz)
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = clamp_tiny(1.0 - qab * x / qap).recip();
    let mut h = d;

    for m in 1..=BETA_MAX_ITERATIONS {
        let m = f64::from(m);
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = clamp_tiny(aa.mul_add(d, 1.0)).recip();
        c = clamp_tiny(1.0 + aa / c);
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = clamp_tiny(aa.mul_add(d, 1.0)).recip();
        c = clamp_tiny(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < BETA_EPSILON {
            break;
        }
    }
    h
}

fn clamp_tiny(value: f64) -> f64 {
    if value.abs() < FLOAT_MIN {
        FLOAT_MIN
    } else {
        value
    }
}

/// Cumulative distribution function of Student's t with `df` degrees of freedom
#[must_use]
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }
    let tail = 0.5 * incomplete_beta(df / 2.0, 0.5, df / t.mul_add(t, df));
    if t > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Two-sided p-value for a t statistic
///
/// Returns 1.0 when there are no degrees of freedom and 0.0 for an infinite
/// statistic (a perfect fit).
#[must_use]
pub fn t_two_sided_p_value(t: f64, df: f64) -> f64 {
    if df <= 0.0 || t.is_nan() {
        return 1.0;
    }
    if t.is_infinite() {
        return 0.0;
    }
    incomplete_beta(df / 2.0, 0.5, df / t.mul_add(t, df)).clamp(0.0, 1.0)
}

/// Quantile of Student's t: the `t` with `P(T ≤ t) = probability`
///
/// Solved by bisection on the CDF, so accuracy is limited only by the CDF.
#[must_use]
pub fn t_critical_value(probability: f64, df: f64) -> f64 {
    if df <= 0.0 || !(0.0..=1.0).contains(&probability) {
        return f64::NAN;
    }
    if probability < 0.5 {
        return -t_critical_value(1.0 - probability, df);
    }
    if probability >= 1.0 {
        return f64::INFINITY;
    }

    let mut low = 0.0;
    let mut high = 1.0;
    while student_t_cdf(high, df) < probability && high < 1e12 {
        high *= 2.0;
    }
    for _ in 0..QUANTILE_BISECTION_STEPS {
        let mid = 0.5 * (low + high);
        if student_t_cdf(mid, df) < probability {
            low = mid;
        } else {
            high = mid;
        }
    }
    0.5 * (low + high)
}

/// Complementary error function (Chebyshev fit, |error| < 1.2e-7)
#[must_use]
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / 0.5f64.mul_add(z, 1.0);
    let poly = t.mul_add(
        t.mul_add(
            t.mul_add(
                t.mul_add(
                    t.mul_add(
                        t.mul_add(
                            t.mul_add(
                                t.mul_add(t.mul_add(0.170_872_77, -0.822_152_23), 1.488_515_87),
                                -1.135_203_98,
                            ),
                            0.278_868_07,
                        ),
                        -0.186_288_06,
                    ),
                    0.096_784_18,
                ),
                0.374_091_96,
            ),
            1.000_023_68,
        ),
        -1.265_512_23,
    );
    let result = t * (-z).mul_add(z, poly).exp();
    if x >= 0.0 {
        result
    } else {
        2.0 - result
    }
}

/// Standard normal cumulative distribution function
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// Standard normal quantile (Acklam's rational approximation)
#[must_use]
pub fn normal_quantile(probability: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
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

    if probability <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if probability >= 1.0 {
        return f64::INFINITY;
    }

    let tail = |q: f64| {
        let numerator = horner(&C, q);
        let denominator = horner(&D, q).mul_add(q, 1.0);
        numerator / denominator
    };

    if probability < P_LOW {
        tail((-2.0 * probability.ln()).sqrt())
    } else if probability > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - probability).ln()).sqrt())
    } else {
        let q = probability - 0.5;
        let r = q * q;
        q * horner(&A, r) / horner(&B, r).mul_add(r, 1.0)
    }
}

/// Evaluate a polynomial with coefficients ordered from the highest power
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .fold(0.0, |acc, coefficient| acc.mul_add(x, *coefficient))
}

/// Two-sided interval `(lower, upper)` of a normal distribution
#[must_use]
pub fn normal_interval(confidence: f64, mean: f64, scale: f64) -> (f64, f64) {
    let z = normal_quantile(0.5 * (1.0 + confidence));
    (z.mul_add(-scale, mean), z.mul_add(scale, mean))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_ln_gamma_matches_factorials() {
        assert_close(ln_gamma(1.0), 0.0, 1e-12);
        assert_close(ln_gamma(5.0), 24.0_f64.ln(), 1e-10);
        assert_close(ln_gamma(0.5), PI.sqrt().ln(), 1e-10);
    }

    #[test]
    fn test_incomplete_beta_bounds_and_symmetry() {
        assert_close(incomplete_beta(2.0, 3.0, 0.0), 0.0, 1e-15);
        assert_close(incomplete_beta(2.0, 3.0, 1.0), 1.0, 1e-15);
        assert_close(incomplete_beta(2.0, 2.0, 0.5), 0.5, 1e-10);
        let x = 0.3;
        assert_close(
            incomplete_beta(2.5, 1.5, x),
            1.0 - incomplete_beta(1.5, 2.5, 1.0 - x),
            1e-10,
        );
    }

    #[test]
    fn test_t_critical_value_known_points() {
        assert_close(t_critical_value(0.975, 1.0), 12.706, 1e-3);
        assert_close(t_critical_value(0.975, 10.0), 2.228, 1e-3);
        assert_close(t_critical_value(0.975, 30.0), 2.042, 1e-3);
        assert_close(t_critical_value(0.5, 5.0), 0.0, 1e-9);
    }

    #[test]
    fn test_two_sided_p_value() {
        assert_close(t_two_sided_p_value(0.0, 10.0), 1.0, 1e-12);
        assert_close(t_two_sided_p_value(2.228, 10.0), 0.05, 1e-3);
        assert_close(t_two_sided_p_value(f64::INFINITY, 3.0), 0.0, 1e-15);
        assert_close(t_two_sided_p_value(1.0, 0.0), 1.0, 1e-15);
    }

    #[test]
    fn test_normal_quantile_and_cdf() {
        assert_close(normal_quantile(0.975), 1.959_964, 1e-6);
        assert_close(normal_quantile(0.5), 0.0, 1e-9);
        assert_close(normal_cdf(1.959_964), 0.975, 1e-6);
        assert_close(normal_cdf(0.0), 0.5, 1e-7);
    }
}
