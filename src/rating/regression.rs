//! Ordinary least squares for a single predictor

/// `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation of the fitted points
    pub r_value: f64,
}

impl LinearFit {
    /// Fit `ys` against `xs`. Returns `None` for fewer than two points,
    /// mismatched lengths or when all `xs` are equal.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let r_value = if syy == 0.0 {
            0.0
        } else {
            sxy / (sxx * syy).sqrt()
        };

        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
            r_value,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// The `x` whose prediction is `y`
    pub fn invert(&self, y: f64) -> f64 {
        y / self.slope - self.intercept / self.slope
    }
}
