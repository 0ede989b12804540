//! Monotonic function algebra for size-domain inference
//!
//! Each node axis carries a [`Monotonic`] function `f(scale_factor) -> size`
//! predicting how many pixels its subtree occupies when its data-bound content
//! is scaled by `scale_factor`. Functions are immutable and compose into new
//! instances with [`Monotonic::add`], [`Monotonic::max`], [`Monotonic::smul`]
//! and [`Monotonic::adds`]. Linear functions stay closed-form as long as the
//! composition allows it; everything else falls back to numeric root finding
//! when inverted.
//!
//! ## Inversion
//!
//! [`Monotonic::inverse`] finds the scale factor that makes a subtree fill a
//! pixel budget. Linear functions invert exactly. Other functions use
//! [`find_target_monotonic`]: the upper bound doubles until it overshoots the
//! target, then the bracket is bisected. Non-convergence is not an error;
//! the returned [`Inversion`] reports whether the root met the tolerance.

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use tracing::debug;

type RunFn = Rc<dyn Fn(f64) -> f64>;
type InverseFn = Rc<dyn Fn(f64, &InverseOptions) -> Option<f64>>;

/// Tuning for numeric inversion
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InverseOptions {
    /// Accepted `|f(x) - target|`
    pub tolerance: f64,
    /// Bisection step limit
    pub max_iterations: usize,
    /// Lower end of the initial bracket
    pub lower_bound: f64,
    /// Upper end of the initial bracket, doubled until it overshoots
    pub upper_bound_guess: f64,
}

impl Default for InverseOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 50,
            lower_bound: 0.0,
            upper_bound_guess: 10.0,
        }
    }
}

impl InverseOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_upper_bound_guess(mut self, guess: f64) -> Self {
        self.upper_bound_guess = guess;
        self
    }
}

/// Result of inverting a monotonic function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inversion {
    pub value: f64,
    /// `true` when `|f(value) - target|` is within tolerance
    pub converged: bool,
}

/// An invertible, non-decreasing scalar function
#[derive(Clone)]
pub enum Monotonic {
    Linear {
        slope: f64,
        intercept: f64,
    },
    Unknown {
        run: RunFn,
        inverse: Option<InverseFn>,
    },
}

impl fmt::Debug for Monotonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Monotonic::Linear { slope, intercept } => f
                .debug_struct("Linear")
                .field("slope", slope)
                .field("intercept", intercept)
                .finish(),
            Monotonic::Unknown { inverse, .. } => f
                .debug_struct("Unknown")
                .field("custom_inverse", &inverse.is_some())
                .finish(),
        }
    }
}

impl Monotonic {
    /// `x -> slope * x + intercept`
    pub fn linear(slope: f64, intercept: f64) -> Self {
        Monotonic::Linear { slope, intercept }
    }

    /// A size that does not respond to scaling
    pub fn constant(value: f64) -> Self {
        Self::linear(0.0, value)
    }

    /// An opaque function, inverted numerically
    pub fn unknown(run: impl Fn(f64) -> f64 + 'static) -> Self {
        Monotonic::Unknown {
            run: Rc::new(run),
            inverse: None,
        }
    }

    /// An opaque function with its own inverse
    pub fn unknown_with_inverse(
        run: impl Fn(f64) -> f64 + 'static,
        inverse: impl Fn(f64, &InverseOptions) -> Option<f64> + 'static,
    ) -> Self {
        Monotonic::Unknown {
            run: Rc::new(run),
            inverse: Some(Rc::new(inverse)),
        }
    }

    pub fn run(&self, x: f64) -> f64 {
        match self {
            Monotonic::Linear { slope, intercept } => slope * x + intercept,
            Monotonic::Unknown { run, .. } => run(x),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Monotonic::Linear { .. })
    }

    /// Linear with zero slope
    pub fn is_constant(&self) -> bool {
        matches!(self, Monotonic::Linear { slope, .. } if *slope == 0.0)
    }

    /// Find `x` with `f(x) ≈ target`.
    ///
    /// Returns `None` when no solution exists (a constant function).
    pub fn inverse(&self, target: f64, options: &InverseOptions) -> Option<Inversion> {
        let inversion = match self {
            Monotonic::Linear { slope, intercept } => {
                if *slope == 0.0 {
                    return None;
                }
                Inversion {
                    value: (target - intercept) / slope,
                    converged: true,
                }
            }
            Monotonic::Unknown {
                inverse: Some(inverse),
                run,
            } => {
                let value = inverse(target, options)?;
                Inversion {
                    value,
                    converged: (run(value) - target).abs() < options.tolerance,
                }
            }
            Monotonic::Unknown { run, inverse: None } => {
                find_target_monotonic(|x| run(x), target, options)
            }
        };
        if !inversion.converged {
            debug!(
                target,
                value = inversion.value,
                "monotonic inversion did not converge"
            );
        }
        Some(inversion)
    }

    /// Pointwise sum; stays linear when every term is linear
    pub fn add(fns: &[Monotonic]) -> Monotonic {
        let linear: Option<(f64, f64)> = fns.iter().try_fold((0.0, 0.0), |(m, b), f| match f {
            Monotonic::Linear { slope, intercept } => Some((m + slope, b + intercept)),
            Monotonic::Unknown { .. } => None,
        });
        match linear {
            Some((slope, intercept)) => Monotonic::linear(slope, intercept),
            None => {
                let fns = fns.to_vec();
                Monotonic::unknown(move |x| fns.iter().map(|f| f.run(x)).sum())
            }
        }
    }

    /// `x -> f(x) + k`
    pub fn adds(&self, k: f64) -> Monotonic {
        match self {
            Monotonic::Linear { slope, intercept } => Monotonic::linear(*slope, intercept + k),
            Monotonic::Unknown { .. } => {
                let f = self.clone();
                Monotonic::unknown(move |x| f.run(x) + k)
            }
        }
    }

    /// `x -> k * f(x)`
    pub fn smul(k: f64, f: &Monotonic) -> Monotonic {
        match f {
            Monotonic::Linear { slope, intercept } => Monotonic::linear(k * slope, k * intercept),
            Monotonic::Unknown { .. } => {
                let f = f.clone();
                Monotonic::unknown(move |x| k * f.run(x))
            }
        }
    }

    /// Pointwise maximum.
    ///
    /// Linear functions sharing one intercept stay linear (the steepest one
    /// dominates for non-negative scale factors); anything else is opaque.
    /// The maximum of no functions is the zero function.
    pub fn max(fns: &[Monotonic]) -> Monotonic {
        let Some(first) = fns.first() else {
            return Monotonic::constant(0.0);
        };
        if let Monotonic::Linear { intercept, .. } = first {
            let shared_intercept = *intercept;
            let steepest = fns.iter().try_fold(f64::NEG_INFINITY, |acc, f| match f {
                Monotonic::Linear { slope, intercept } if *intercept == shared_intercept => {
                    Some(acc.max(*slope))
                }
                _ => None,
            });
            if let Some(slope) = steepest {
                return Monotonic::linear(slope, shared_intercept);
            }
        }
        let fns = fns.to_vec();
        Monotonic::unknown(move |x| {
            fns.iter()
                .map(|f| f.run(x))
                .fold(f64::NEG_INFINITY, f64::max)
        })
    }
}

/// Numerically solve `f(x) = target` for a non-decreasing `f`.
///
/// The bracket `[lower_bound, upper_bound_guess]` is grown geometrically
/// until `f(high) >= target` (at most `min(20, max_iterations / 2)` times),
/// then bisected until the midpoint is within tolerance or `max_iterations`
/// steps have been taken. On exhaustion the midpoint of the final bracket is
/// returned with `converged = false`.
pub fn find_target_monotonic(
    f: impl Fn(f64) -> f64,
    target: f64,
    options: &InverseOptions,
) -> Inversion {
    let mut low = options.lower_bound;
    let mut high = options.upper_bound_guess.max(low);
    if high <= low {
        high = low + 1.0;
    }

    let growth_limit = 20.min(options.max_iterations / 2);
    let mut growth = 0;
    while f(high) < target && growth < growth_limit {
        let next = if high > 0.0 {
            high * 2.0
        } else {
            high + (high - low).max(1.0)
        };
        low = high;
        high = next;
        growth += 1;
    }

    for _ in 0..options.max_iterations {
        let mid = low + (high - low) / 2.0;
        let value = f(mid);
        if (value - target).abs() < options.tolerance {
            return Inversion {
                value: mid,
                converged: true,
            };
        }
        if mid <= low || mid >= high {
            break;
        }
        if value < target {
            low = mid;
        } else {
            high = mid;
        }
    }

    let value = low + (high - low) / 2.0;
    Inversion {
        value,
        converged: (f(value) - target).abs() < options.tolerance,
    }
}
