use crate::misc::FloatingPoint;

/// Bracket of the root of the decreasing function `f(p) = fp(p) - s`
/// `p3 = None` stands for `p = infinity`
#[derive(Clone, Copy, Debug)]
pub(crate) struct RootBracket<T: FloatingPoint> {
    pub p1: T,
    pub f1: T,
    pub p3: Option<T>,
    pub f3: T,
}

impl<T: FloatingPoint> RootBracket<T> {
    /// Next estimate of the root by fitting the rational function `(u p + v) / (p + w)`
    /// through `(p1, f1)`, `(p2, f2)` and `(p3, f3)`, then narrow the bracket around `p2`
    pub fn interpolate(&mut self, p2: T, f2: T) -> T {
        let (p1, f1, f3) = (self.p1, self.f1, self.f3);
        let p = match self.p3 {
            Some(p3) => {
                let h1 = f1 * (f2 - f3);
                let h2 = f2 * (f3 - f1);
                let h3 = f3 * (f1 - f2);
                -(p1 * p2 * h3 + p2 * p3 * h1 + p3 * p1 * h2) / (p1 * h1 + p2 * h2 + p3 * h3)
            }
            None => (p1 * (f1 - f3) * f2 - p2 * (f2 - f3) * f1) / ((f1 - f2) * f3),
        };

        if f2 < T::zero() {
            self.p3 = Some(p2);
            self.f3 = f2;
        } else {
            self.p1 = p2;
            self.f1 = f2;
        }
        p
    }

    /// Fall back to the geometric mean of the bracket when the rational estimate
    /// leaves the bracket or the bracket has not halved (in `ln p`) over the last two steps
    ///
    /// `widths` keeps the log widths seen since the last fallback.
    pub fn safeguard(&self, p: T, widths: &mut Vec<T>) -> T {
        let p3 = match self.p3 {
            Some(p3) if self.p1 > T::zero() => p3,
            _ => return p,
        };

        let width = (p3 / self.p1).ln();
        widths.push(width);
        let stalled = widths.len() >= 3 && width > T::lit(0.5) * widths[widths.len() - 3];
        if stalled || p <= self.p1 || p >= p3 {
            widths.clear();
            widths.push(width);
            (self.p1 * p3).sqrt()
        } else {
            p
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::RootBracket;

    #[test]
    fn exact_for_rational_functions() {
        // f(p) = (1 - p) / (p + 1) has its root at p = 1 and tends to -1 at infinity
        let f = |p: f64| (1. - p) / (p + 1.);
        let mut bracket = RootBracket {
            p1: 0.,
            f1: f(0.),
            p3: None,
            f3: -1.,
        };
        let p = bracket.interpolate(3., f(3.));
        assert_relative_eq!(p, 1., epsilon = 1e-12);
        assert_eq!(bracket.p3, Some(3.));

        let mut bracket = RootBracket {
            p1: 0.,
            f1: f(0.),
            p3: Some(4.),
            f3: f(4.),
        };
        let p = bracket.interpolate(0.5, f(0.5));
        assert_relative_eq!(p, 1., epsilon = 1e-12);
        assert_eq!(bracket.p1, 0.5);
    }

    #[test]
    fn open_bracket_is_not_safeguarded() {
        let mut widths = vec![];
        let bracket = RootBracket {
            p1: 1.,
            f1: 1.,
            p3: None,
            f3: -1.,
        };
        assert_eq!(bracket.safeguard(1e6, &mut widths), 1e6);

        let bracket = RootBracket {
            p1: 0.,
            f1: 1.,
            p3: Some(10.),
            f3: -1.,
        };
        assert_eq!(bracket.safeguard(20., &mut widths), 20.);
        assert!(widths.is_empty());
    }

    #[test]
    fn estimates_outside_the_bracket_are_bisected() {
        let mut widths = vec![];
        let bracket = RootBracket {
            p1: 1.,
            f1: 1.,
            p3: Some(100.),
            f3: -1.,
        };
        assert_relative_eq!(bracket.safeguard(150., &mut widths), 10., epsilon = 1e-12);
        assert_relative_eq!(bracket.safeguard(0.5, &mut widths), 10., epsilon = 1e-12);
        assert_eq!(bracket.safeguard(50., &mut widths), 50.);
    }

    #[test]
    fn stalled_bracket_is_bisected() {
        // one end keeps moving by a few percent while the other stays put
        let mut widths = vec![];
        let ends = [(1.5, 250.), (5., 250.), (9., 245.)];
        let estimates: Vec<f64> = ends
            .iter()
            .map(|(p1, p3)| {
                let bracket = RootBracket {
                    p1: *p1,
                    f1: 1.,
                    p3: Some(*p3),
                    f3: -1.,
                };
                bracket.safeguard(p3 - 1., &mut widths)
            })
            .collect();
        assert_eq!(estimates[0], 249.);
        assert_eq!(estimates[1], 249.);
        assert_relative_eq!(estimates[2], (9f64 * 245.).sqrt(), epsilon = 1e-12);
        assert_eq!(widths.len(), 1);
    }

    #[test]
    fn shrinking_bracket_keeps_the_estimate() {
        let mut widths = vec![];
        let ends = [(1., 1000.), (10., 1000.), (100., 1000.)];
        for (p1, p3) in ends {
            let bracket = RootBracket {
                p1,
                f1: 1.,
                p3: Some(p3),
                f3: -1.,
            };
            assert_eq!(bracket.safeguard(p3 * 0.5, &mut widths), p3 * 0.5);
        }
        assert_eq!(widths.len(), 3);
    }
}
