//! Error types for poke_classify

use std::path::PathBuf;
use thiserror::Error;

/// A frame that could not be turned into a model input. The frame is dropped,
/// the pipeline keeps running.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to decode frame: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Frame has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Failed to resize frame: {0}")]
    Resize(String),
}

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Failed to load asset {path}: {source}")]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Label file {0} contains no labels")]
    EmptyLabels(PathBuf),

    #[error("Inference engine unavailable: {0:#}")]
    EngineUnavailable(anyhow::Error),

    #[error("Inference failed: {0:#}")]
    Inference(anyhow::Error),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Model returned an empty output vector")]
    EmptyOutput,

    #[error("Output vector has {actual} scores but the label table has {expected} entries")]
    OutputMismatch { expected: usize, actual: usize },

    #[error("Model mismatch: {0}")]
    ModelMismatch(String),

    #[error("Classification service is closed")]
    ServiceClosed,
}

impl ClassifyError {
    /// True when only the current frame is lost and the next one may succeed.
    pub fn is_skippable(&self) -> bool {
        matches!(self, ClassifyError::Frame(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_errors_are_skippable() {
        let err = ClassifyError::from(FrameError::Empty { width: 0, height: 12 });
        assert!(err.is_skippable());
        assert!(err.to_string().contains("0x12"));
    }

    #[test]
    fn test_startup_errors_are_not_skippable() {
        let err = ClassifyError::EmptyLabels(PathBuf::from("labelmap.txt"));
        assert!(!err.is_skippable());
        assert!(err.to_string().contains("labelmap.txt"));

        let err = ClassifyError::OutputMismatch { expected: 150, actual: 3 };
        assert!(!err.is_skippable());
        assert_eq!(
            err.to_string(),
            "Output vector has 3 scores but the label table has 150 entries"
        );
    }
}
