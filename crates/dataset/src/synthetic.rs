use crate::error::DataError;
use crate::prices::Observation;
use configuration::{StructuralBreak, SyntheticConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp, Normal};

/// Generates a reproducible daily price series.
///
/// Each day's price is `base_price + trend + cumulative break shifts + noise`.
/// The trend rises linearly by `trend_span` over the whole range and the noise
/// is Gaussian. Any price below `price_floor` is replaced by the floor plus an
/// exponential draw, so every generated price is strictly positive.
///
/// All noise is drawn before any floor jitter, so identical settings always
/// produce the identical series.
pub fn generate(config: &SyntheticConfig) -> Result<Vec<Observation>, DataError> {
    let days = (config.end_date - config.start_date).num_days() + 1;
    let n = usize::try_from(days).map_err(|_| {
        DataError::Synthetic(format!(
            "start_date {} is after end_date {}",
            config.start_date, config.end_date
        ))
    })?;

    let normal = Normal::new(0.0, config.noise_std_dev)
        .map_err(|e| DataError::Synthetic(format!("noise distribution: {e}")))?;
    let jitter = Exp::new(1.0 / config.floor_jitter_mean)
        .map_err(|e| DataError::Synthetic(format!("floor jitter distribution: {e}")))?;
    if !(config.price_floor > 0.0) {
        return Err(DataError::Synthetic("price_floor must be positive".to_string()));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();

    let mut breaks: Vec<StructuralBreak> = config.breaks.clone();
    breaks.sort_by_key(|b| b.index);
    let mut pending = breaks.iter().peekable();
    let mut shift = 0.0;

    let observations = config
        .start_date
        .iter_days()
        .take(n)
        .zip(noise)
        .enumerate()
        .map(|(i, (date, noise))| {
            while let Some(b) = pending.next_if(|b| b.index <= i) {
                shift += b.shift;
            }
            let trend = if n > 1 {
                config.trend_span * i as f64 / (n - 1) as f64
            } else {
                0.0
            };

            let mut price = config.base_price + trend + shift + noise;
            if !(price >= config.price_floor) {
                price = config.price_floor + jitter.sample(&mut rng);
            }
            Observation::new(date, price)
        })
        .collect();

    Ok(observations)
}
