use std::path::Path;
use crate::error::ClassifyError;
use crate::utils;

/// Class names in model output order. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Loads one label per line. A missing or unreadable file, or one with no
    /// lines at all, is fatal: a classifier cannot exist without labels.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        let labels = utils::file_to_vec(path).map_err(|source| ClassifyError::AssetLoad {
            path: path.to_path_buf(),
            source,
        })?;

        if labels.is_empty() {
            return Err(ClassifyError::EmptyLabels(path.to_path_buf()));
        }

        log::info!("Loaded {} labels from {}", labels.len(), path.display());
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}
