/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample (n - 1) standard deviation, `None` with fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Percentage change from `from` to `to`; `None` when `from` is zero.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_of_empty_is_undefined() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[4.0, 6.0]), Some(5.0));
    }

    #[test]
    fn std_dev_uses_bessel_correction() {
        assert_eq!(sample_std_dev(&[3.0]), None);
        // Sample variance of 2,4,4,4,5,5,7,9 is 32/7.
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_relative_eq!(sd, (32.0f64 / 7.0).sqrt());
    }

    #[test]
    fn pct_change_guards_zero_base() {
        assert_eq!(pct_change(0.0, 10.0), None);
        assert_relative_eq!(pct_change(100.0, 105.0).unwrap(), 5.0);
        assert_relative_eq!(pct_change(50.0, 30.0).unwrap(), -40.0);
    }
}
