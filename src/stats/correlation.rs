//! Pearson correlation matrix of the three charted variables.

use crate::data::{ClimateTable, Metric};
use statrs::statistics::Statistics;

/// Symmetric 3×3 matrix indexed in [`Metric::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    pub fn compute(table: &ClimateTable) -> Self {
        let columns = Metric::ALL.map(|m| table.metric_values(m));
        let mut values = [[f64::NAN; 3]; 3];

        for i in 0..3 {
            for j in i..3 {
                let r = if i == j {
                    Self::self_correlation(&columns[i])
                } else {
                    pearson(&columns[i], &columns[j])
                };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self { values }
    }

    pub fn get(&self, a: Metric, b: Metric) -> f64 {
        self.values[index(a)][index(b)]
    }

    /// Off-diagonal pair with the largest |r|, ignoring NaN.
    pub fn strongest_pair(&self) -> Option<(Metric, Metric, f64)> {
        let mut best: Option<(Metric, Metric, f64)> = None;
        for (i, a) in Metric::ALL.iter().enumerate() {
            for b in Metric::ALL.iter().skip(i + 1) {
                let r = self.get(*a, *b);
                if r.is_nan() {
                    continue;
                }
                if best.map_or(true, |(_, _, current)| r.abs() > current.abs()) {
                    best = Some((*a, *b, r));
                }
            }
        }
        best
    }

    fn self_correlation(column: &[f64]) -> f64 {
        if column.len() >= 2 && column.iter().std_dev() > 0.0 {
            1.0
        } else {
            f64::NAN
        }
    }
}

fn index(metric: Metric) -> usize {
    match metric {
        Metric::AvgTemp => 0,
        Metric::Rainfall => 1,
        Metric::Humidity => 2,
    }
}

/// Sample Pearson r; NaN with fewer than two points or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }

    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx == 0.0 || sy == 0.0 {
        return f64::NAN;
    }

    let r = xs.iter().covariance(ys.iter()) / (sx * sy);
    r.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::fixtures::record;

    #[test]
    fn test_pearson_linear() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate() {
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[3.0, 3.0]).is_nan());
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let mut records = Vec::new();
        for (i, year) in (2010..2015).enumerate() {
            let mut r = record("Sabah", "Kota Kinabalu", year, 23.0 + i as f64, 31.0 + i as f64);
            r.rainfall_mm = 300.0 - 20.0 * i as f64;
            r.humidity_pct = 80.0 + (i % 2) as f64;
            records.push(r);
        }
        let matrix = CorrelationMatrix::compute(&ClimateTable::new(records));

        assert_eq!(matrix.get(Metric::AvgTemp, Metric::AvgTemp), 1.0);
        assert!((matrix.get(Metric::AvgTemp, Metric::Rainfall) + 1.0).abs() < 1e-12);
        assert_eq!(
            matrix.get(Metric::Rainfall, Metric::Humidity),
            matrix.get(Metric::Humidity, Metric::Rainfall)
        );

        let (a, b, r) = matrix.strongest_pair().unwrap();
        assert_eq!((a, b), (Metric::AvgTemp, Metric::Rainfall));
        assert!(r < 0.0);
    }

    #[test]
    fn test_empty_table_is_all_nan() {
        let matrix = CorrelationMatrix::compute(&ClimateTable::default());
        assert!(matrix.get(Metric::Humidity, Metric::Humidity).is_nan());
        assert_eq!(matrix.strongest_pair(), None);
    }
}
