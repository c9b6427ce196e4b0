use std::path::Path;

use super::error::ClassifierError;

/// An ordered table of class names.
///
/// The position of a label in the table corresponds to the index of its
/// score in the model's output vector. The table must be as wide as the
/// model output, but that invariant is only checkable at predict time:
/// a lookup past the end fails with `IndexOutOfRangeError`.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Loads a label table from a plain text file, one label per line.
    ///
    /// Surrounding whitespace is stripped from each line; line order
    /// defines the label-index mapping.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::LabelTableError(format!(
                "Failed to read label file {}: {}",
                path.display(),
                e
            ))
        })?;

        let labels: Vec<String> = contents.lines().map(|l| l.trim().to_string()).collect();
        log::info!("Loaded {} labels from {}", labels.len(), path.display());
        Ok(Self { labels })
    }

    /// Returns the label at `index`, or `IndexOutOfRangeError` if the index
    /// falls outside the table.
    pub fn get(&self, index: usize) -> Result<&str, ClassifierError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(ClassifierError::IndexOutOfRangeError {
                index,
                len: self.labels.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
