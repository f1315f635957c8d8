//! ONNX regressor (feature `onnx`)
//!
//! For artifacts exported from Keras / scikit-learn via ONNX. Input is a
//! `[1, n_features]` f32 tensor, output the first element of the first
//! output.

use ndarray::Array2;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;
use parking_lot::Mutex;

use crate::logic::error::{EngineError, EngineResult};
use super::inference::Regressor;

pub struct OnnxRegressor {
    session: Mutex<Session>,
    output_name: String,
    n_features: usize,
}

impl OnnxRegressor {
    pub fn load(model_path: &str, n_features: usize) -> EngineResult<Self> {
        log::info!("Loading ONNX model from: {}", model_path);

        if !std::path::Path::new(model_path).exists() {
            return Err(EngineError::Artifact(format!("ONNX model not found: {}", model_path)));
        }

        let session = Session::builder()
            .map_err(|e| EngineError::Artifact(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EngineError::Artifact(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| EngineError::Artifact(format!("Failed to load model: {}", e)))?;

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| EngineError::Artifact("ONNX model defines no output".to_string()))?;

        log::info!("ONNX model loaded successfully (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            n_features,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> EngineResult<f64> {
        let input: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, self.n_features), input)
            .map_err(|_| EngineError::ShapeMismatch {
                expected: self.n_features,
                actual: row.len(),
            })?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| EngineError::Estimation(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| EngineError::Estimation(format!("Inference failed: {}", e)))?;

        let output = outputs.get(&self.output_name)
            .ok_or_else(|| EngineError::Estimation("No output".to_string()))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| EngineError::Estimation(format!("Extract error: {}", e)))?;

        data.first()
            .map(|v| *v as f64)
            .ok_or_else(|| EngineError::Estimation("Empty output tensor".to_string()))
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}
