use ort::Error as OrtError;
use std::fmt;

/// Represents the different types of errors that can occur in the image classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred while loading or running the ONNX model
    ModelError(String),
    /// Error occurred while loading the class label file
    LabelTableError(String),
    /// Error occurred while decoding an input image
    ImageDecodeError(String),
    /// The image's channel layout cannot be converted to 3-channel RGB
    UnsupportedFormatError(String),
    /// The predicted class index falls outside the label table
    IndexOutOfRangeError { index: usize, len: usize },
    /// Error occurred during the build phase
    BuildError(String),
    /// Error occurred while making predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::LabelTableError(msg) => write!(f, "Label table error: {}", msg),
            Self::ImageDecodeError(msg) => write!(f, "Image decode error: {}", msg),
            Self::UnsupportedFormatError(msg) => write!(f, "Unsupported format: {}", msg),
            Self::IndexOutOfRangeError { index, len } => write!(
                f,
                "Class index {} out of range for label table of length {}",
                index, len
            ),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}

impl From<image::ImageError> for ClassifierError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => {
                ClassifierError::UnsupportedFormatError(e.to_string())
            }
            e => ClassifierError::ImageDecodeError(e.to_string()),
        }
    }
}
