use super::*;
use crate::core::FoodError;
use crate::core::errors::SimpleError;
use crate::core::inference::FoodClassifier;
use crate::domain::{CategoryDistribution, NormalizedTensor};
use ort::value::TensorRef;

impl OrtClassifier {
    /// Returns the model name associated with this classifier.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn run_inference_with_processor<T>(
        &self,
        tensor: &NormalizedTensor,
        processor: impl FnOnce(&[i64], &[f32]) -> Result<T, FoodError>,
    ) -> Result<T, FoodError> {
        let input_shape = tensor.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(tensor.view()).map_err(|e| {
            FoodError::inference_error(
                &self.model_name,
                &format!("failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            FoodError::inference_error(
                &self.model_name,
                &format!(
                    "failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
                SimpleError::new("Session lock acquisition failed"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            FoodError::inference_error(
                &self.model_name,
                &format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                FoodError::inference_error(
                    &self.model_name,
                    &format!("failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        processor(output_shape, output_data)
    }
}

/// Checks that the output is a single row of scores and returns it.
pub(super) fn single_row<'a>(
    model_name: &str,
    output_shape: &[i64],
    output_data: &'a [f32],
) -> Result<&'a [f32], FoodError> {
    let valid = output_shape.len() == 2 && output_shape[0] == 1 && output_shape[1] > 0;
    if !valid {
        return Err(FoodError::inference_error(
            model_name,
            &format!("expected output shape [1, N], got {:?}", output_shape),
            SimpleError::new("Invalid output tensor dimensions"),
        ));
    }
    let expected_len = output_shape[1] as usize;
    if output_data.len() != expected_len {
        return Err(FoodError::inference_error(
            model_name,
            &format!(
                "output data size mismatch: expected {}, got {}",
                expected_len,
                output_data.len()
            ),
            SimpleError::new("Output length does not match its shape"),
        ));
    }
    Ok(output_data)
}

/// Turns one output row into a distribution. A row that is not a valid
/// distribution is a model fault, so it is reported as an inference error.
pub(super) fn output_distribution(
    model_name: &str,
    activation: OutputActivation,
    output_shape: &[i64],
    output_data: &[f32],
) -> Result<CategoryDistribution, FoodError> {
    let row = single_row(model_name, output_shape, output_data)?;
    activation.to_distribution(row).map_err(|e| {
        FoodError::inference_error(
            model_name,
            "model output is not a probability distribution",
            e,
        )
    })
}

impl FoodClassifier for OrtClassifier {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn classify(&self, tensor: &NormalizedTensor) -> Result<CategoryDistribution, FoodError> {
        let activation = self.activation;
        self.run_inference_with_processor(tensor, |output_shape, output_data| {
            output_distribution(&self.model_name, activation, output_shape, output_data)
        })
    }
}
