use super::*;
use crate::core::FoodError;
use crate::core::config::{ConfigError, ModelConfig};
use crate::core::errors::SimpleError;
use crate::core::inference::session::build_session;
use crate::processors::ChannelOrder;
use std::path::Path;
use tracing::{info, warn};

impl OrtClassifier {
    /// Loads a classifier with a single session and default options.
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self, FoodError> {
        let path = model_path.as_ref();
        let config = ModelConfig {
            model_path: Some(path.to_path_buf()),
            ..ModelConfig::default()
        };
        Self::from_config(&config)
    }

    /// Loads a classifier as described by the model configuration.
    ///
    /// Input and output tensor names are taken from the configuration or,
    /// when unset, from the first input and output of the model.
    pub fn from_config(config: &ModelConfig) -> Result<Self, FoodError> {
        let path = config.model_path.as_deref().ok_or_else(|| {
            FoodError::Config(ConfigError::InvalidConfig {
                message: "model.model_path is required to load the classifier".to_string(),
            })
        })?;
        let pool_size = config.session_pool_size.max(1);

        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            sessions.push(Mutex::new(build_session(path, config.ort_session.as_ref())?));
        }

        let model_name = config
            .model_name
            .clone()
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "unknown_model".to_string());

        let (input_name, output_name) = {
            let first = sessions[0].lock().map_err(|_| {
                FoodError::inference_error(
                    &model_name,
                    "session lock poisoned during load",
                    SimpleError::new("Session lock acquisition failed"),
                )
            })?;
            let input_name = match &config.input_name {
                Some(name) => name.clone(),
                None => first
                    .inputs
                    .first()
                    .map(|input| input.name.clone())
                    .ok_or_else(|| {
                        FoodError::inference_error(
                            &model_name,
                            "model declares no inputs",
                            SimpleError::new("No inputs available in session"),
                        )
                    })?,
            };
            let output_name = match &config.output_name {
                Some(name) => name.clone(),
                None => first
                    .outputs
                    .first()
                    .map(|output| output.name.clone())
                    .ok_or_else(|| {
                        FoodError::inference_error(
                            &model_name,
                            "model declares no outputs",
                            SimpleError::new("No outputs available in session"),
                        )
                    })?,
            };
            (input_name, output_name)
        };

        info!(
            model = %model_name,
            path = %path.display(),
            sessions = pool_size,
            input = %input_name,
            output = %output_name,
            "loaded classifier"
        );

        let classifier = OrtClassifier {
            sessions,
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            output_name,
            activation: config.activation,
            model_path: path.to_path_buf(),
            model_name,
        };
        classifier.check_input_shape(config.input_size, config.channel_order);
        Ok(classifier)
    }

    /// Warns when the declared model input cannot take a single normalized
    /// image. Dynamic dimensions (negative) match anything.
    fn check_input_shape(&self, input_size: u32, order: ChannelOrder) {
        let Some(declared) = self.primary_input_shape() else {
            return;
        };
        let side = i64::from(input_size);
        let expected: [i64; 4] = match order {
            ChannelOrder::HWC => [1, side, side, 3],
            ChannelOrder::CHW => [1, 3, side, side],
        };
        let compatible = declared.len() == expected.len()
            && declared
                .iter()
                .zip(expected)
                .all(|(&got, want)| got < 0 || got == want);
        if !compatible {
            warn!(
                model = %self.model_name,
                ?declared,
                ?expected,
                "model input shape does not match the configured normalization"
            );
        }
    }
}
