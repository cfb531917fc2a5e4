use std::cmp::{max, min};

use crate::reading::Reading;

/// Running min/max/sum/count for one key. The sum stays in tenths so no
/// rounding happens until presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistic {
    min: Reading,
    max: Reading,
    sum: i64,
    count: u64,
}

impl Statistic {
    pub fn new(reading: Reading) -> Self {
        Statistic {
            min: reading,
            max: reading,
            sum: reading.tenths() as i64,
            count: 1,
        }
    }

    #[inline]
    pub fn record(&mut self, reading: Reading) {
        self.min = min(self.min, reading);
        self.max = max(self.max, reading);
        self.sum += reading.tenths() as i64;
        self.count += 1;
    }

    #[inline]
    pub fn merge(&mut self, other: &Statistic) {
        self.min = min(self.min, other.min);
        self.max = max(self.max, other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn min_reading(&self) -> Reading {
        self.min
    }

    pub fn max_reading(&self) -> Reading {
        self.max
    }

    /// Sum of all readings in tenths.
    pub fn sum_tenths(&self) -> i64 {
        self.sum
    }

    pub fn min(&self) -> f64 {
        self.min.as_f64()
    }

    pub fn max(&self) -> f64 {
        self.max.as_f64()
    }

    pub fn sum(&self) -> f64 {
        self.sum as f64 / 10.0
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean in real units, rounded to two decimals.
    pub fn average(&self) -> f64 {
        let mean = self.sum() / self.count as f64;
        let rounded = (mean * 100.0).round() / 100.0;
        // -0.0 prints as "-0"; fold it into 0.
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }
}
