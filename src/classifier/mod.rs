pub mod builder;
mod error;
mod labels;
mod model;
mod preprocess;
mod utils;

pub use builder::ClassifierBuilder;
pub use error::ClassifierError;
pub use labels::LabelTable;
pub use model::{Classifier, Prediction};
pub use preprocess::{load_image, Preprocessor};
pub use utils::{argmax, softmax};

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the class label file
    pub labels_path: String,
    /// Short model name, as printed in result lines
    pub model_name: String,
    /// Number of classes in the label table
    pub num_classes: usize,
    /// Side length of the square input fed to the model
    pub crop_size: u32,
}
