//! Ready-time histogram

use serde::{Deserialize, Serialize};

use crate::simulation::{SimulationError, SimulationResult};

/// One half-open bucket `[lower, upper)`; the last bucket also holds `upper`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Inclusive lower edge
    pub lower: f64,
    /// Upper edge
    pub upper: f64,
    /// Values in the bucket
    pub count: usize,
}

/// Equal-width histogram over minutes-to-ready values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadyTimeHistogram {
    /// Buckets from lowest to highest
    pub buckets: Vec<HistogramBucket>,
}

impl ReadyTimeHistogram {
    /// Bin `values` into `bins` equal-width buckets spanning their range
    pub fn from_values(values: &[f64], bins: usize) -> SimulationResult<Self> {
        if bins == 0 {
            return Err(SimulationError::invalid_argument("histogram bins must be greater than 0"));
        }
        if values.is_empty() {
            return Ok(Self::default());
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            return Ok(Self {
                buckets: vec![HistogramBucket { lower: min, upper: max, count: values.len() }],
            });
        }

        let width = (max - min) / bins as f64;
        let mut buckets: Vec<HistogramBucket> = (0..bins)
            .map(|i| HistogramBucket {
                lower: min + width * i as f64,
                upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for value in values {
            let index = (((value - min) / width) as usize).min(bins - 1);
            buckets[index].count += 1;
        }

        Ok(Self { buckets })
    }

    /// Values counted across all buckets
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Whether there are no buckets
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Largest bucket count
    pub fn peak(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bins_rejected() {
        let result = ReadyTimeHistogram::from_values(&[1.0, 2.0], 0);
        assert!(matches!(result, Err(SimulationError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_values() {
        let histogram = ReadyTimeHistogram::from_values(&[], 20).unwrap();
        assert!(histogram.is_empty());
        assert_eq!(histogram.total(), 0);
        assert_eq!(histogram.peak(), 0);
    }

    #[test]
    fn test_all_equal_values_single_bucket() {
        let histogram = ReadyTimeHistogram::from_values(&[42.0, 42.0, 42.0], 20).unwrap();
        assert_eq!(histogram.buckets.len(), 1);
        assert_eq!(histogram.buckets[0].count, 3);
        assert_eq!(histogram.buckets[0].lower, 42.0);
    }

    #[test]
    fn test_binning() {
        let values = [0.0, 1.0, 2.5, 5.0, 7.5, 9.9, 10.0];
        let histogram = ReadyTimeHistogram::from_values(&values, 4).unwrap();

        assert_eq!(histogram.buckets.len(), 4);
        assert_eq!(histogram.total(), values.len());
        // width 2.5: [0,2.5) [2.5,5) [5,7.5) [7.5,10]
        let counts: Vec<usize> = histogram.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 3]);
        assert_eq!(histogram.buckets[3].upper, 10.0);
        assert_eq!(histogram.peak(), 3);
    }
}
