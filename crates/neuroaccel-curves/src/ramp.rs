//! Normalized exponential ramp shared by both curve families.

/// Below this `|ln(growth_base)|` the ramp falls back to linear interpolation.
pub const GROWTH_EPSILON: f64 = 1e-9;

/// Normalized exponential growth `(b^t - 1) / (b - 1)` for `t` in `[0,1]`.
///
/// Computed as `expm1(t·ln b) / expm1(ln b)` so bases close to 1 keep their
/// precision. When `ln b` is within [`GROWTH_EPSILON`] of zero, or `b` is not
/// a usable base at all, the result is `t` itself, which is the limit of the
/// formula as `b → 1`. The output is always in `[0,1]`.
///
/// # Example
///
/// ```
/// use neuroaccel_curves::ramp::normalized_growth;
///
/// assert_eq!(normalized_growth(0.0, 1.05), 0.0);
/// assert_eq!(normalized_growth(1.0, 1.05), 1.0);
/// // Convex for b > 1: below the diagonal in the middle.
/// assert!(normalized_growth(0.5, 1.05) < 0.5);
/// // Degenerate base: linear.
/// assert_eq!(normalized_growth(0.25, 1.0), 0.25);
/// ```
#[inline]
pub fn normalized_growth(t: f64, growth_base: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let ln_base = growth_base.ln();
    if !ln_base.is_finite() || ln_base.abs() < GROWTH_EPSILON {
        return t;
    }

    let growth = (t * ln_base).exp_m1() / ln_base.exp_m1();
    if growth.is_finite() {
        growth.clamp(0.0, 1.0)
    } else {
        t
    }
}

/// Whether `growth_base` is close enough to 1 to take the linear fallback.
#[inline]
pub fn is_degenerate_growth(growth_base: f64) -> bool {
    let ln_base = growth_base.ln();
    ln_base.is_finite() && ln_base.abs() < GROWTH_EPSILON
}

/// One acceleration window: flat at `from` up to `start`, ramping to `to`
/// over `width`, flat at `to` afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp {
    start: f64,
    width: f64,
    from: f64,
    to: f64,
    growth_base: f64,
}

impl Ramp {
    /// Create a ramp. A non-positive or NaN `width` is clamped to
    /// `f64::EPSILON` so evaluation never divides by zero.
    pub fn new(start: f64, width: f64, from: f64, to: f64, growth_base: f64) -> Self {
        let width = if width > 0.0 { width } else { f64::EPSILON };
        Self {
            start,
            width,
            from,
            to,
            growth_base,
        }
    }

    /// Speed at which the ramp starts.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Speed at which the ramp reaches its plateau.
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    /// Multiplier below the window.
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Multiplier above the window.
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Evaluate the ramp at `speed`. NaN speeds are treated as 0.
    #[inline]
    pub fn evaluate(&self, speed: f64) -> f64 {
        let speed = if speed.is_nan() { 0.0 } else { speed };

        if speed <= self.start {
            return self.from;
        }
        if speed >= self.end() {
            return self.to;
        }

        let t = (speed - self.start) / self.width;
        self.from + normalized_growth(t, self.growth_base) * (self.to - self.from)
    }
}
