//! Offline fitting: standard scaler + ordinary least squares
//!
//! Only used by the artifact tool. Request-time code never touches this.

use chrono::Utc;

use crate::constants::ARTIFACT_FORMAT_VERSION;
use crate::logic::error::{EngineError, EngineResult};
use crate::logic::features::{CategoryCodes, FeatureEncoder, StandardScaler, FEATURE_COUNT};
use crate::logic::input::RawInput;
use super::artifact::{ArtifactLayout, ModelArtifact, ModelMetrics, ModelSpec};
use super::inference::Regressor;
use super::linear::LinearModel;

/// One labelled row of the insurance dataset
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub input: RawInput,
    pub charges: f64,
}

/// Fit scaler + OLS on `samples` and package the result
pub fn fit_linear_artifact(name: &str, samples: &[TrainingSample]) -> EngineResult<ModelArtifact> {
    if samples.len() <= FEATURE_COUNT {
        return Err(EngineError::Artifact(format!(
            "need more than {} samples to fit {} coefficients, got {}",
            FEATURE_COUNT,
            FEATURE_COUNT + 1,
            samples.len()
        )));
    }

    let categories = CategoryCodes::ordinal();
    let raw_encoder = FeatureEncoder::new(&categories, StandardScaler::identity(FEATURE_COUNT))?;

    let mut raw_rows = Vec::with_capacity(samples.len());
    for sample in samples {
        sample.input.validate()?;
        raw_rows.push(raw_encoder.raw_values(&sample.input).to_vec());
    }

    let scaler = StandardScaler::fit(&raw_rows)?;
    let rows: Vec<Vec<f64>> = raw_rows.iter().map(|r| scaler.transform(r)).collect();
    let targets: Vec<f64> = samples.iter().map(|s| s.charges).collect();

    let model = fit_ols(&rows, &targets)?;
    let metrics = evaluate(&model, &rows, &targets)?;

    log::info!(
        "Fitted linear model on {} samples: R²={:.4} RMSE={:.2} MAE={:.2}",
        samples.len(),
        metrics.r2,
        metrics.rmse,
        metrics.mae
    );

    Ok(ModelArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        name: name.to_string(),
        algorithm: "ordinary_least_squares".to_string(),
        trained_at: Some(Utc::now()),
        metrics: Some(metrics),
        layout: ArtifactLayout::current(),
        categories,
        scaler,
        model: ModelSpec::Linear(model),
    })
}

/// Solve the normal equations `(XᵀX) β = Xᵀy` with an intercept column
pub fn fit_ols(rows: &[Vec<f64>], targets: &[f64]) -> EngineResult<LinearModel> {
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    if rows.len() != targets.len() || width == 0 {
        return Err(EngineError::Artifact("training rows and targets do not line up".to_string()));
    }

    // Column 0 is the intercept
    let dim = width + 1;
    let mut xtx = vec![vec![0.0; dim]; dim];
    let mut xty = vec![0.0; dim];

    for (row, y) in rows.iter().zip(targets) {
        let augmented: Vec<f64> = std::iter::once(1.0).chain(row.iter().copied()).collect();
        for i in 0..dim {
            xty[i] += augmented[i] * y;
            for j in 0..dim {
                xtx[i][j] += augmented[i] * augmented[j];
            }
        }
    }

    let beta = solve(xtx, xty)?;
    Ok(LinearModel {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
    })
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> EngineResult<Vec<f64>> {
    let n = b.len();
    let scale = a.iter().flatten().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0);

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < scale * 1e-10 {
            return Err(EngineError::Artifact(format!(
                "design matrix is singular (column {} is collinear or constant)",
                col
            )));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

/// In-sample R², RMSE and MAE
pub fn evaluate(model: &dyn Regressor, rows: &[Vec<f64>], targets: &[f64]) -> EngineResult<ModelMetrics> {
    let n = targets.len() as f64;
    let mean = targets.iter().sum::<f64>() / n;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut abs_err = 0.0;
    for (row, y) in rows.iter().zip(targets) {
        let err = y - model.predict(row)?;
        ss_res += err * err;
        abs_err += err.abs();
        ss_tot += (y - mean).powi(2);
    }

    Ok(ModelMetrics {
        r2: if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 },
        rmse: (ss_res / n).sqrt(),
        mae: abs_err / n,
        samples: Some(targets.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::input::{Region, Sex};

    #[test]
    fn test_ols_recovers_exact_line() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let targets: Vec<f64> = rows.iter().map(|r| 3.0 + 2.0 * r[0] - 0.5 * r[1]).collect();
        let model = fit_ols(&rows, &targets).unwrap();
        assert!((model.intercept - 3.0).abs() < 1e-6);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-6);
        assert!((model.coefficients[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_collinear_columns_rejected() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        let targets = vec![1.0; 10];
        assert!(fit_ols(&rows, &targets).is_err());
    }

    #[test]
    fn test_fit_linear_artifact_is_loadable() {
        let regions = Region::ALL;
        let samples: Vec<TrainingSample> = (0..40)
            .map(|i| {
                let input = RawInput {
                    age: 18 + i as u32,
                    sex: if i % 2 == 0 { Sex::Female } else { Sex::Male },
                    bmi: 18.0 + (i % 17) as f64,
                    children: (i % 3) as u32,
                    smoker: i % 5 == 0,
                    region: regions[(i / 2) % 4],
                };
                let charges = 2000.0
                    + 250.0 * input.age as f64
                    + 300.0 * input.bmi
                    + if input.smoker { 20000.0 } else { 0.0 };
                TrainingSample { input, charges }
            })
            .collect();

        let artifact = fit_linear_artifact("synthetic", &samples).unwrap();
        assert!(artifact.validate().is_ok());
        let metrics = artifact.metrics.as_ref().unwrap();
        assert!(metrics.r2 > 0.999, "r2 = {}", metrics.r2);
        assert_eq!(metrics.samples, Some(40));
    }

    #[test]
    fn test_too_few_samples() {
        assert!(fit_linear_artifact("tiny", &[]).is_err());
    }
}
