use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;
use ndarray::Array1;
use ort::session::Session;
use ort::value::Tensor;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::labels::LabelTable;
use super::preprocess::{load_image, Preprocessor};
use super::utils::{argmax, softmax};

/// A single classification result.
///
/// `confidence` is the softmax probability of the predicted class expressed
/// as a percentage, so it always falls in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// 0-based index into the label table
    pub class_index: usize,
    /// Human-readable class label
    pub label: String,
    /// Probability percentage of the predicted class
    pub confidence: f32,
}

/// A thread-safe image classifier backed by a pretrained ONNX model.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync` because all of its fields are
/// thread-safe: `String` and `Preprocessor` are plain owned data, and
/// `Session` and `LabelTable` are wrapped in `Arc`.
/// The model and label table are loaded once at build time and never
/// mutated afterwards, so concurrent predictions need no locking.
///
/// ```rust,no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use retina::{Classifier, BuiltinModel};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::builder()
///     .with_model(BuiltinModel::AlexNet)?
///     .build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.predict_path("cat.jpg").unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub model_path: String,
    pub labels_path: String,
    pub model_name: String,
    pub session: Arc<Session>,
    pub labels: Arc<LabelTable>,
    pub preprocessor: Preprocessor,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            labels_path: self.labels_path.clone(),
            model_name: self.model_name.clone(),
            num_classes: self.labels.len(),
            crop_size: self.preprocessor.crop_size(),
        }
    }

    /// Classifies a decoded image.
    ///
    /// Runs the fixed preprocessing pipeline, the forward pass, a stable
    /// softmax over the logits and a stable argmax over the probabilities.
    /// Ties in maximum probability resolve to the lowest class index.
    ///
    /// # Errors
    /// - `PredictionError` if the forward pass fails or produces an
    ///   unexpected output shape
    /// - `IndexOutOfRangeError` if the label table is narrower than the
    ///   model output and the argmax lands past its end
    pub fn predict(&self, img: &DynamicImage) -> Result<Prediction, ClassifierError> {
        let tensor = self.preprocessor.process(img)?;
        let logits = self.forward(tensor)?;

        let probabilities = softmax(&logits);
        let class_index = argmax(&probabilities)
            .ok_or_else(|| ClassifierError::PredictionError("Model produced no logits".into()))?;
        let label = self.labels.get(class_index)?.to_string();

        Ok(Prediction {
            class_index,
            label,
            confidence: probabilities[class_index] * 100.0,
        })
    }

    /// Decodes the image at `path` and classifies it.
    pub fn predict_path<P: AsRef<Path>>(&self, path: P) -> Result<Prediction, ClassifierError> {
        let img = load_image(path)?;
        self.predict(&img)
    }

    /// Classifies every path in order, resolving each against `base_dir`,
    /// and hands one formatted result line per image to `sink` as soon as
    /// it is produced.
    ///
    /// The first failure aborts the remaining paths; lines emitted before
    /// the failure have already reached the sink.
    pub fn run<P: AsRef<str>>(
        &self,
        paths: &[P],
        base_dir: &Path,
        sink: impl FnMut(String),
    ) -> Result<(), ClassifierError> {
        run_pipeline(
            paths,
            |path| {
                let prediction = self.predict_path(base_dir.join(path))?;
                Ok(self.result_line(path, &prediction))
            },
            sink,
        )
    }

    /// Formats one output line for a prediction.
    ///
    /// The confidence is printed unrounded.
    pub fn result_line(&self, path: &str, prediction: &Prediction) -> String {
        format!(
            "Using {}, {} is a {} with {} %",
            self.model_name, path, prediction.label, prediction.confidence
        )
    }

    /// Runs the forward pass and extracts the logit vector.
    fn forward(&self, input: ndarray::Array4<f32>) -> Result<Array1<f32>, ClassifierError> {
        let input_name = self
            .session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| ClassifierError::ModelError("Model has no inputs".into()))?;

        let input_dyn = input.into_dyn();
        let input_layout = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            input_name.as_str(),
            Tensor::from_array(&input_layout).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self.session.run(input_tensors).map_err(|e| {
            ClassifierError::PredictionError(format!("Failed to run model: {}", e))
        })?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::PredictionError(format!("Failed to extract output tensor: {}", e))
        })?;

        let shape = output_tensor.shape();
        if shape.len() != 2 || shape[0] != 1 {
            return Err(ClassifierError::PredictionError(format!(
                "Expected output of shape [1, num_classes], got {:?}",
                shape
            )));
        }

        let logits_slice = output_tensor.slice(ndarray::s![0, ..]);
        Ok(Array1::from_iter(logits_slice.iter().copied()))
    }
}

/// Drives the per-path loop: classify each path in order, emit its line,
/// stop at the first error. Separated from `Classifier::run` so the
/// ordering contract is testable without a loaded model.
fn run_pipeline<P: AsRef<str>>(
    paths: &[P],
    mut classify_one: impl FnMut(&str) -> Result<String, ClassifierError>,
    mut sink: impl FnMut(String),
) -> Result<(), ClassifierError> {
    for path in paths {
        let line = classify_one(path.as_ref())?;
        sink(line);
    }
    Ok(())
}
