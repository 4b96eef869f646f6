//! ONNX Runtime classifier with a round-robin session pool.

use crate::core::inference::OutputActivation;
use ort::{session::Session, value::ValueType};
use std::sync::Mutex;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

/// Food classifier backed by an ONNX model.
///
/// Sessions need exclusive access while running, so each one sits behind a
/// mutex and calls are spread across the pool with an atomic counter. The
/// classifier itself is shared by reference across concurrent requests.
pub struct OrtClassifier {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: std::sync::atomic::AtomicUsize,
    pub(super) input_name: String,
    pub(super) output_name: String,
    pub(super) activation: OutputActivation,
    pub(super) model_path: std::path::PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtClassifier")
            .field("model", &self.model_name)
            .field("path", &self.model_path)
            .field("pool", &self.sessions.len())
            .field("io", &(&self.input_name, &self.output_name))
            .field("activation", &self.activation)
            .finish()
    }
}

impl OrtClassifier {
    /// Declared shape of the bound input, read from the first session.
    /// Dynamic dimensions stay negative.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session = self.sessions.first()?.lock().ok()?;
        let input = session
            .inputs
            .iter()
            .find(|input| input.name == self.input_name)?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Model path this classifier was loaded from.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Number of sessions in the pool.
    pub fn pool_size(&self) -> usize {
        self.sessions.len()
    }
}
