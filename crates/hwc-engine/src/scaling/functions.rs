//! Pure scale functions. Each maps `(target, default)` to a multiplier.

/// Constant from CACTI depth scaling (1.56 / 2).
pub const CACTI_DEPTH_EXPONENT: f64 = 0.78;

pub fn linear(target: f64, default: f64) -> f64 {
    target / default
}

pub fn reciprocal(target: f64, default: f64) -> f64 {
    default / target
}

pub fn quadratic(target: f64, default: f64) -> f64 {
    (target / default).powi(2)
}

pub fn power(target: f64, default: f64, exponent: f64) -> f64 {
    (target / default).powf(exponent)
}

/// `n * log_base(n)` ratio.
pub fn nlog_base(target: f64, default: f64, base: f64) -> f64 {
    (target * target.log(base)) / (default * default.log(base))
}

pub fn nlog2n(target: f64, default: f64) -> f64 {
    (target * target.log2()) / (default * default.log2())
}

pub fn cacti_depth(target: f64, default: f64) -> f64 {
    power(target, default, CACTI_DEPTH_EXPONENT)
}

pub fn noscale(_target: f64, _default: f64) -> f64 {
    1.0
}
