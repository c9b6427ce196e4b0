use std::path::Path;

use log::{error, info};
use ort::session::Session;

use super::error::ClassifierError;
use super::labels::LabelTable;
use super::model::Classifier;
use super::preprocess::{Preprocessor, IMAGENET_MEAN, IMAGENET_STD};
use crate::runtime::{create_session_builder, RuntimeConfig};
use crate::{BuiltinModel, ModelCharacteristics, ModelManager};

/// A builder for constructing a Classifier with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    labels_path: Option<String>,
    model_name: Option<String>,
    session: Option<Session>,
    labels: Option<LabelTable>,
    preprocessor: Option<Preprocessor>,
    model_characteristics: Option<ModelCharacteristics>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX model execution
    ///
    /// # Example
    /// ```
    /// use retina::{ClassifierBuilder, RuntimeConfig};
    ///
    /// let config = RuntimeConfig::default();
    /// let builder = ClassifierBuilder::new()
    ///     .with_runtime_config(config);
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Overrides the preprocessing pipeline.
    ///
    /// Rarely needed: `with_model` installs the pipeline the model was
    /// trained with.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Sets the model to use for classification using a built-in model type
    ///
    /// # Arguments
    /// * `model` - The BuiltinModel variant to use (e.g., AlexNet)
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The model paths are already set
    ///   - The model is not downloaded
    ///   - The model or label file failed to load
    ///   - The model structure is invalid
    ///
    /// # Example
    /// ```no_run
    /// use retina::{ClassifierBuilder, BuiltinModel};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_model(BuiltinModel::AlexNet);
    /// ```
    pub fn with_model(mut self, model: BuiltinModel) -> Result<Self, ClassifierError> {
        if self.model_path.is_some() || self.labels_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Model and label paths already set".to_string(),
            ));
        }

        // Initialize model manager with default location
        let manager = ModelManager::new_default().map_err(|e| {
            ClassifierError::BuildError(format!("Failed to create model manager: {}", e))
        })?;

        // Check if model is downloaded
        if !manager.is_model_downloaded(model) {
            return Err(ClassifierError::BuildError(format!(
                "Model '{:?}' is not downloaded. Please download it first using ModelManager::download_model()",
                model
            )));
        }

        // Get paths
        let model_path = manager.get_model_path(model);
        let labels_path = manager.get_labels_path(model);

        // Load the label table
        let labels = LabelTable::from_file(&labels_path).map_err(|e| {
            error!("Failed to load label table: {}", e);
            e
        })?;
        info!("Label table loaded successfully ({} classes)", labels.len());

        // Create session using the singleton environment
        let session = create_session_builder(&self.runtime_config)?.commit_from_file(&model_path)?;

        // Validate model structure
        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        let info = model.get_model_info();
        let characteristics = model.characteristics();

        if self.preprocessor.is_none() {
            self.preprocessor = Some(Preprocessor::new(
                characteristics.resize_edge,
                characteristics.crop_size,
                IMAGENET_MEAN,
                IMAGENET_STD,
            )?);
        }
        self.model_characteristics = Some(characteristics);
        self.model_name = Some(info.name.to_string());
        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.labels_path = Some(labels_path.to_string_lossy().to_string());
        self.labels = Some(labels);
        self.session = Some(session);
        Ok(self)
    }

    /// Sets a custom model and label file path for the classifier
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `labels_path` - Path to the label file (one label per line)
    /// * `crop_size` - Optional input side length for the model. If not
    ///   provided, defaults to 224 pixels with the standard ImageNet
    ///   normalization.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The model or label paths are empty
    ///   - The paths are already set
    ///   - The files don't exist
    ///   - The model or label table failed to load
    ///   - The model structure is invalid
    pub fn with_custom_model(
        mut self,
        model_path: &str,
        labels_path: &str,
        crop_size: Option<u32>,
    ) -> Result<Self, ClassifierError> {
        if model_path.is_empty() || labels_path.is_empty() {
            return Err(ClassifierError::BuildError(
                "Model and label paths cannot be empty".to_string(),
            ));
        }
        if self.model_path.is_some() || self.labels_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Model and label paths already set".to_string(),
            ));
        }

        // Validate paths exist
        if !Path::new(model_path).exists() {
            return Err(ClassifierError::BuildError(format!(
                "Model file not found: {}",
                model_path
            )));
        }
        if !Path::new(labels_path).exists() {
            return Err(ClassifierError::BuildError(format!(
                "Label file not found: {}",
                labels_path
            )));
        }

        // Load the label table
        let labels = LabelTable::from_file(labels_path)?;
        info!("Label table loaded successfully ({} classes)", labels.len());

        // Create session using the singleton environment
        let session = create_session_builder(&self.runtime_config)?.commit_from_file(model_path)?;

        // Validate model structure
        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        let crop_size = crop_size.unwrap_or(224);
        if self.preprocessor.is_none() {
            // The 32px margin matches the 224-in-256 ImageNet convention
            self.preprocessor = Some(Preprocessor::new(
                crop_size + 32,
                crop_size,
                IMAGENET_MEAN,
                IMAGENET_STD,
            )?);
        }

        self.model_characteristics = Some(ModelCharacteristics {
            num_classes: labels.len(),
            resize_edge: crop_size + 32,
            crop_size,
            model_size_mb: 0, // Not critical for functionality
        });
        self.model_name = Some(
            Path::new(model_path)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "custom".to_string()),
        );
        self.model_path = Some(model_path.to_string());
        self.labels_path = Some(labels_path.to_string());
        self.labels = Some(labels);
        self.session = Some(session);
        Ok(self)
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - No model and label paths are set
    ///   - The label table is empty
    pub fn build(mut self) -> Result<Classifier, ClassifierError> {
        if self.model_path.is_none() || self.labels_path.is_none() {
            return Err(ClassifierError::BuildError(
                "Model not set. Call with_model() or with_custom_model() first".to_string(),
            ));
        }

        let labels = self
            .labels
            .take()
            .ok_or_else(|| ClassifierError::BuildError("No label table loaded".into()))?;
        if labels.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Label table is empty".into(),
            ));
        }

        let session = self
            .session
            .take()
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?;
        let characteristics = self
            .model_characteristics
            .take()
            .ok_or_else(|| ClassifierError::BuildError("Model characteristics not set".into()))?;
        let preprocessor = self.preprocessor.take().unwrap_or_default();

        if labels.len() != characteristics.num_classes {
            log::warn!(
                "Label table has {} entries but the model is expected to output {} classes",
                labels.len(),
                characteristics.num_classes
            );
        }

        Ok(Classifier {
            model_path: self.model_path.take().unwrap(),
            labels_path: self.labels_path.take().unwrap(),
            model_name: self.model_name.take().unwrap_or_else(|| "custom".into()),
            session: std::sync::Arc::new(session),
            labels: std::sync::Arc::new(labels),
            preprocessor,
        })
    }

    /// Validates that the model has the expected input/output structure
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        // Check inputs
        let inputs = &session.inputs;
        if inputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 input for the image tensor".to_string(),
            ));
        }

        // Check outputs
        let outputs = &session.outputs;
        if outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for the class logits".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_model() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_custom_model_missing_files() {
        let result = ClassifierBuilder::new().with_custom_model(
            "/nonexistent/model.onnx",
            "/nonexistent/model_classes.txt",
            None,
        );
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_custom_model_empty_paths() {
        let result = ClassifierBuilder::new().with_custom_model("", "", None);
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }
}
