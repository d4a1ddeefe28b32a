/// Logistic activation: `1 / (1 + e^-x)`, mapping any finite `x` into (0, 1).
///
/// Saturates to exactly 0.0 or 1.0 in `f64` for very large `|x|`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed in terms of its *output*.
///
/// `activated` must already be `sigmoid(z)`; the result is `σ'(z) = a(1 - a)`.
/// Passing a pre-activation value here gives a wrong gradient.
#[inline]
pub fn sigmoid_derivative(activated: f64) -> f64 {
    activated * (1.0 - activated)
}
