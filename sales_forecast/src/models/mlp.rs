//! Two-layer feed-forward regressor trained with Adam on mean squared error

use crate::config::{PipelineConfig, BATCH_SIZE, EPOCHS, HIDDEN_DIM, INPUT_DIM, LEARNING_RATE};
use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use crate::models::{check_training_set, ForecastModel, TrainedForecastModel, TrainingControl};
use candle_core::{DType, Device, Module, Tensor, Var};
use candle_nn::{AdamW, Linear, Optimizer, ParamsAdamW};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Dense(2 -> hidden, ReLU) -> Dense(hidden -> 1) regressor
#[derive(Debug, Clone)]
pub struct MlpRegressor {
    /// Name of the model
    name: String,
    hidden_dim: usize,
    epochs: usize,
    learning_rate: f64,
    batch_size: usize,
    shuffle: bool,
    seed: Option<u64>,
}

/// Trained regressor weights
#[derive(Debug, Clone)]
pub struct TrainedMlp {
    /// Name of the model
    name: String,
    hidden: Linear,
    output: Linear,
    device: Device,
    loss_history: Vec<f64>,
}

impl MlpRegressor {
    /// Create a regressor with the given hidden width, epoch count and learning rate
    pub fn new(hidden_dim: usize, epochs: usize, learning_rate: f64) -> Result<Self> {
        if hidden_dim == 0 {
            return Err(ForecastError::InvalidParameter(
                "Hidden dimension must be positive".to_string(),
            ));
        }
        if epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Epochs must be positive".to_string(),
            ));
        }
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Learning rate must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("MLP (hidden={}, epochs={})", hidden_dim, epochs),
            hidden_dim,
            epochs,
            learning_rate,
            batch_size: BATCH_SIZE,
            shuffle: true,
            seed: None,
        })
    }

    /// Build a regressor from pipeline settings
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        let model = Self::new(config.hidden_dim, config.epochs, config.learning_rate)?
            .with_batch_size(config.batch_size)?
            .with_shuffle(config.shuffle);
        Ok(match config.seed {
            Some(seed) => model.with_seed(seed),
            None => model,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "Batch size must be positive".to_string(),
            ));
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for MlpRegressor {
    fn default() -> Self {
        Self {
            name: format!("MLP (hidden={}, epochs={})", HIDDEN_DIM, EPOCHS),
            hidden_dim: HIDDEN_DIM,
            epochs: EPOCHS,
            learning_rate: LEARNING_RATE,
            batch_size: BATCH_SIZE,
            shuffle: true,
            seed: None,
        }
    }
}

/// Glorot-uniform weights and zero bias, registered as trainable variables
fn dense_layer(
    in_dim: usize,
    out_dim: usize,
    rng: &mut StdRng,
    device: &Device,
) -> Result<(Linear, Vec<Var>)> {
    let limit = (6.0 / (in_dim + out_dim) as f64).sqrt() as f32;
    let dist = Uniform::new_inclusive(-limit, limit);
    let weights: Vec<f32> = (0..in_dim * out_dim).map(|_| dist.sample(rng)).collect();

    let weight = Var::from_tensor(&Tensor::from_vec(weights, (out_dim, in_dim), device)?)?;
    let bias = Var::from_tensor(&Tensor::zeros(out_dim, DType::F32, device)?)?;
    let layer = Linear::new(weight.as_tensor().clone(), Some(bias.as_tensor().clone()));

    Ok((layer, vec![weight, bias]))
}

fn input_tensor(rows: &[FeatureRow], device: &Device) -> Result<Tensor> {
    let flat: Vec<f32> = rows
        .iter()
        .flat_map(|row| [row[0] as f32, row[1] as f32])
        .collect();
    Ok(Tensor::from_vec(flat, (rows.len(), INPUT_DIM), device)?)
}

fn forward(hidden: &Linear, output: &Linear, xs: &Tensor) -> Result<Tensor> {
    let h = hidden.forward(xs)?.relu()?;
    Ok(output.forward(&h)?)
}

impl ForecastModel for MlpRegressor {
    type Trained = TrainedMlp;

    fn train_with_control(
        &self,
        features: &[FeatureRow],
        labels: &[f64],
        control: &TrainingControl,
    ) -> Result<Self::Trained> {
        check_training_set(features, labels)?;

        let device = Device::Cpu;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (hidden, mut vars) = dense_layer(INPUT_DIM, self.hidden_dim, &mut rng, &device)?;
        let (output, output_vars) = dense_layer(self.hidden_dim, 1, &mut rng, &device)?;
        vars.extend(output_vars);

        let params = ParamsAdamW {
            lr: self.learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay: 0.0,
        };
        let mut opt = AdamW::new(vars, params)?;

        let num_samples = features.len();
        let xs = input_tensor(features, &device)?;
        let targets: Vec<f32> = labels.iter().map(|&y| y as f32).collect();
        let ys = Tensor::from_vec(targets, (num_samples, 1), &device)?;

        info!(
            samples = num_samples,
            epochs = self.epochs,
            batch_size = self.batch_size,
            "training regressor"
        );

        let mut order: Vec<u32> = (0..num_samples as u32).collect();
        let mut loss_history = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            if control.is_cancelled() {
                warn!(epochs_completed = epoch, "training cancelled");
                return Err(ForecastError::Cancelled {
                    epochs_completed: epoch,
                });
            }

            if self.shuffle {
                order.shuffle(&mut rng);
            }

            let mut total_loss = 0.0;
            for batch in order.chunks(self.batch_size) {
                let idx = Tensor::from_slice(batch, batch.len(), &device)?;
                let batch_x = xs.index_select(&idx, 0)?;
                let batch_y = ys.index_select(&idx, 0)?;

                let pred = forward(&hidden, &output, &batch_x)?;
                let loss = candle_nn::loss::mse(&pred, &batch_y)?;
                opt.backward_step(&loss)?;

                total_loss += loss.to_scalar::<f32>()? as f64 * batch.len() as f64;
            }

            let epoch_loss = total_loss / num_samples as f64;
            if !epoch_loss.is_finite() {
                return Err(ForecastError::TrainingError(format!(
                    "Loss diverged at epoch {}",
                    epoch + 1
                )));
            }
            debug!(epoch = epoch + 1, loss = epoch_loss, "epoch complete");
            loss_history.push(epoch_loss);
        }

        if let Some(last) = loss_history.last() {
            info!(final_loss = *last, "training complete");
        }

        Ok(TrainedMlp {
            name: self.name.clone(),
            hidden,
            output,
            device,
            loss_history,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedMlp {
    fn predict(&self, inputs: &[FeatureRow]) -> Result<Vec<f64>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let xs = input_tensor(inputs, &self.device)?;
        let out = forward(&self.hidden, &self.output, &xs)?;
        let values = out.flatten_all()?.to_vec1::<f32>()?;

        Ok(values.into_iter().map(f64::from).collect())
    }

    fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_validation() {
        assert!(MlpRegressor::new(0, 10, 0.01).is_err());
        assert!(MlpRegressor::new(8, 0, 0.01).is_err());
        assert!(MlpRegressor::new(8, 10, -1.0).is_err());
        assert!(MlpRegressor::new(8, 10, 0.01).unwrap().with_batch_size(0).is_err());
    }

    #[test]
    fn test_dense_layer_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let (layer, vars) = dense_layer(2, 4, &mut rng, &Device::Cpu).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(layer.weight().dims(), &[4, 2]);
        let limit = (6.0f32 / 6.0).sqrt();
        let weights = layer.weight().flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(weights.iter().all(|w| w.abs() <= limit));
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let features = vec![[1.0, 0.0], [2.0, 0.0], [1.0, 1.0]];
        let labels = vec![5.0, 7.0, 3.0];
        let model = MlpRegressor::new(8, 5, 0.01).unwrap().with_seed(42);

        let a = model.train(&features, &labels).unwrap();
        let b = model.train(&features, &labels).unwrap();
        let inputs = [[3.0, 0.0], [3.0, 1.0]];
        assert_eq!(a.predict(&inputs).unwrap(), b.predict(&inputs).unwrap());
    }

    #[test]
    fn test_cancelled_before_first_epoch() {
        let control = TrainingControl::new();
        control.cancel();
        let result = MlpRegressor::default().train_with_control(&[[1.0, 0.0]], &[1.0], &control);
        assert!(matches!(
            result,
            Err(ForecastError::Cancelled { epochs_completed: 0 })
        ));
    }
}
