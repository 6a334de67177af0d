use serde::{Deserialize, Serialize};

/// Summary of the reconstruction errors of quantized points.
///
/// The writer records, for every stored point, the great-circle distance in meters between the original point and
/// the point a reader will restore from the file. The report is diagnostic only and is not stored.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl QualityReport {
    /// Adds one error sample.
    pub fn record(&mut self, error: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = error;
            self.max = error;
        } else {
            self.min = self.min.min(error);
            self.max = self.max.max(error);
        }

        let delta = error - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (error - self.mean);
    }

    /// Number of recorded samples.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Average error, zero if nothing was recorded.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation of the errors.
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }

    /// Smallest recorded error.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest recorded error.
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn statistics() {
        let mut report = QualityReport::default();
        assert_eq!(report.std_dev(), 0.0);

        for error in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            report.record(error);
        }

        assert_eq!(report.count(), 8);
        assert_abs_diff_eq!(report.mean(), 5.0);
        assert_abs_diff_eq!(report.std_dev(), 2.0);
        assert_eq!(report.min(), 2.0);
        assert_eq!(report.max(), 9.0);
    }
}
