//! Continuous domains and position scales

use super::dims::Interval;

/// Union of every continuous domain, `None` when there are none
pub fn unify_domains(domains: &[Interval]) -> Option<Interval> {
    Interval::union_all(domains)
}

/// Maps data positions in `domain` onto `[0, size]` pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosScale {
    pub domain: Interval,
    pub size: f64,
    pub reverse: bool,
}

impl PosScale {
    pub fn new(domain: Interval, size: f64, reverse: bool) -> Self {
        Self {
            domain,
            size,
            reverse,
        }
    }

    /// Pixels per data unit; 0 for a degenerate domain
    pub fn factor(&self) -> f64 {
        let width = self.domain.width();
        if width.abs() < f64::EPSILON {
            0.0
        } else {
            self.size / width
        }
    }

    pub fn apply(&self, pos: f64) -> f64 {
        let scaled = (pos - self.domain.min) * self.factor();
        if self.reverse {
            self.size - scaled
        } else {
            scaled
        }
    }
}

/// Build the position scale for a root axis with a continuous domain
pub fn compute_pos_scale(domain: Interval, size: f64, reverse: bool) -> PosScale {
    PosScale::new(domain, size, reverse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_scale_maps_domain_to_pixels() {
        let scale = compute_pos_scale(Interval::new(10.0, 20.0), 200.0, false);
        assert_eq!(scale.apply(10.0), 0.0);
        assert_eq!(scale.apply(15.0), 100.0);
        assert_eq!(scale.apply(20.0), 200.0);
    }

    #[test]
    fn test_pos_scale_reverse() {
        let scale = compute_pos_scale(Interval::new(0.0, 4.0), 100.0, true);
        assert_eq!(scale.apply(0.0), 100.0);
        assert_eq!(scale.apply(1.0), 75.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_zero() {
        let scale = compute_pos_scale(Interval::point(3.0), 100.0, false);
        assert_eq!(scale.apply(3.0), 0.0);
        assert_eq!(scale.apply(7.0), 0.0);
    }

    #[test]
    fn test_unify_domains() {
        let domains = [Interval::new(0.0, 3.0), Interval::new(2.0, 9.0)];
        assert_eq!(unify_domains(&domains), Some(Interval::new(0.0, 9.0)));
        assert_eq!(unify_domains(&[]), None);
    }
}
