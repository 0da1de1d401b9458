use serde::{Deserialize, Serialize};

/// Top-1 result for a single frame.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub class_id: usize,
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(class_id: usize, label: &str, confidence: f32) -> Self {
        Self {
            class_id,
            label: label.to_string(),
            confidence,
        }
    }

    /// Confidence as a percentage.
    pub fn percent(&self) -> f32 {
        self.confidence * 100.0
    }

    /// Two-line display text: the label, then the confidence as `NN.NN%`.
    pub fn message(&self) -> String {
        format!("{}\n{:.2}%", self.label, self.percent())
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
