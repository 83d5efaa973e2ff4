//! Per-product seasonal mean baseline

use crate::error::Result;
use crate::features::FeatureRow;
use crate::models::{check_training_set, ForecastModel, TrainedForecastModel, TrainingControl};
use std::collections::HashMap;

/// Predicts the average quantity seen for a (month, product) pair, falling
/// back to the product average and then the overall average.
#[derive(Debug, Clone)]
pub struct SeasonalMean {
    /// Name of the model
    name: String,
}

/// Trained seasonal mean lookup tables
#[derive(Debug, Clone)]
pub struct TrainedSeasonalMean {
    /// Name of the model
    name: String,
    by_month_and_product: HashMap<(i64, i64), f64>,
    by_product: HashMap<i64, f64>,
    overall: f64,
}

impl SeasonalMean {
    pub fn new() -> Self {
        Self {
            name: "Seasonal Mean".to_string(),
        }
    }
}

impl Default for SeasonalMean {
    fn default() -> Self {
        Self::new()
    }
}

fn key(row: &FeatureRow) -> (i64, i64) {
    (row[0].round() as i64, row[1].round() as i64)
}

fn averages<K: std::hash::Hash + Eq>(pairs: impl Iterator<Item = (K, f64)>) -> HashMap<K, f64> {
    let mut sums: HashMap<K, (f64, usize)> = HashMap::new();
    for (k, v) in pairs {
        let entry = sums.entry(k).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

impl ForecastModel for SeasonalMean {
    type Trained = TrainedSeasonalMean;

    fn train_with_control(
        &self,
        features: &[FeatureRow],
        labels: &[f64],
        _control: &TrainingControl,
    ) -> Result<Self::Trained> {
        check_training_set(features, labels)?;

        let by_month_and_product = averages(features.iter().map(key).zip(labels.iter().copied()));
        let by_product = averages(
            features
                .iter()
                .map(|row| key(row).1)
                .zip(labels.iter().copied()),
        );
        let overall = labels.iter().sum::<f64>() / labels.len() as f64;

        Ok(TrainedSeasonalMean {
            name: self.name.clone(),
            by_month_and_product,
            by_product,
            overall,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedSeasonalMean {
    fn predict(&self, inputs: &[FeatureRow]) -> Result<Vec<f64>> {
        Ok(inputs
            .iter()
            .map(|row| {
                let (month, product) = key(row);
                self.by_month_and_product
                    .get(&(month, product))
                    .or_else(|| self.by_product.get(&product))
                    .copied()
                    .unwrap_or(self.overall)
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
