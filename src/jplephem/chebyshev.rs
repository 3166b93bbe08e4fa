//! Chebyshev polynomial evaluation for SPK records
//!
//! SPK types 2 and 3 store each coordinate of a record as the coefficients of
//! a Chebyshev series over the record interval mapped onto [-1, 1].

/// A Chebyshev series borrowed from a record's coefficient block
#[derive(Debug, Clone, Copy)]
pub struct ChebyshevSeries<'a> {
    coefficients: &'a [f64],
}

impl<'a> ChebyshevSeries<'a> {
    /// Wrap a slice of coefficients, lowest order first
    pub fn new(coefficients: &'a [f64]) -> Self {
        Self { coefficients }
    }

    /// Evaluate the series at `s` in [-1, 1] (Clenshaw recurrence)
    pub fn evaluate(&self, s: f64) -> f64 {
        let mut b1 = 0.0;
        let mut b2 = 0.0;
        for &c in self.coefficients.iter().skip(1).rev() {
            let b0 = 2.0 * s * b1 - b2 + c;
            b2 = b1;
            b1 = b0;
        }
        match self.coefficients.first() {
            Some(&c0) => s * b1 - b2 + c0,
            None => 0.0,
        }
    }

    /// Evaluate the series and its derivative with respect to `s`
    pub fn evaluate_with_derivative(&self, s: f64) -> (f64, f64) {
        // T_k and T'_k by forward recurrence
        let (mut t_prev, mut t) = (1.0, s);
        let (mut dt_prev, mut dt) = (0.0, 1.0);
        let mut value = 0.0;
        let mut derivative = 0.0;

        for (k, &c) in self.coefficients.iter().enumerate() {
            match k {
                0 => value += c,
                1 => {
                    value += c * s;
                    derivative += c;
                }
                _ => {
                    let t_next = 2.0 * s * t - t_prev;
                    let dt_next = 2.0 * t + 2.0 * s * dt - dt_prev;
                    t_prev = t;
                    t = t_next;
                    dt_prev = dt;
                    dt = dt_next;
                    value += c * t;
                    derivative += c * dt;
                }
            }
        }

        (value, derivative)
    }

    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether the series has no terms
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chebyshev_constant() {
        let series = ChebyshevSeries::new(&[3.0]);
        assert_relative_eq!(series.evaluate(-0.7), 3.0);
        assert_eq!(series.evaluate_with_derivative(0.2), (3.0, 0.0));
    }

    #[test]
    fn test_chebyshev_linear() {
        // 1 + 2x
        let series = ChebyshevSeries::new(&[1.0, 2.0]);
        assert_relative_eq!(series.evaluate(0.5), 2.0);
        let (value, derivative) = series.evaluate_with_derivative(0.5);
        assert_relative_eq!(value, 2.0);
        assert_relative_eq!(derivative, 2.0);
    }

    #[test]
    fn test_chebyshev_quadratic() {
        // T2(x) = 2x^2 - 1, so 1*T0 + 0*T1 + 1*T2 = 2x^2
        let series = ChebyshevSeries::new(&[1.0, 0.0, 1.0]);
        for &x in &[-1.0, -0.3, 0.0, 0.4, 1.0] {
            assert_relative_eq!(series.evaluate(x), 2.0 * x * x, epsilon = 1e-14);
            let (value, derivative) = series.evaluate_with_derivative(x);
            assert_relative_eq!(value, 2.0 * x * x, epsilon = 1e-14);
            assert_relative_eq!(derivative, 4.0 * x, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_chebyshev_cubic_matches_clenshaw() {
        let coefficients = [0.3, -1.2, 0.7, 2.5, -0.4];
        let series = ChebyshevSeries::new(&coefficients);
        for &x in &[-0.9, -0.1, 0.33, 0.8] {
            let (value, _) = series.evaluate_with_derivative(x);
            assert_relative_eq!(value, series.evaluate(x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_series() {
        let series = ChebyshevSeries::new(&[]);
        assert!(series.is_empty());
        assert_eq!(series.evaluate(0.5), 0.0);
    }
}
