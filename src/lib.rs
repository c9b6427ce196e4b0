//! A thread-safe image classifier library using pretrained ONNX vision models.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use retina::{Classifier, BuiltinModel};
//!
//! let classifier = Classifier::builder()
//!     .with_model(BuiltinModel::AlexNet)?
//!     .build()?;
//!
//! let prediction = classifier.predict_path("cat.jpg")?;
//! println!("{} ({:.1} %)", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The classifier is thread-safe and can be shared across threads using `Arc`:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use retina::{Classifier, BuiltinModel};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(Classifier::builder()
//!     .with_model(BuiltinModel::AlexNet)?
//!     .build()?);
//!
//! let mut handles = vec![];
//! for path in ["cat.jpg", "dog.jpg"] {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.predict_path(path).unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod model_manager;
pub mod models;
mod runtime;

pub use classifier::{
    argmax, softmax, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, LabelTable,
    Prediction, Preprocessor,
};
pub use model_manager::{ModelError, ModelManager};
pub use models::{BuiltinModel, ModelCharacteristics, ModelInfo};
pub use runtime::{create_session_builder, OptLevel, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
