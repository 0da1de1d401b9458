use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::common::inference_device::InferenceDevice;

pub const DEFAULT_INPUT_SIZE: u32 = 224;
pub const DEFAULT_NUM_CLASSES: usize = 150;

/// Everything needed to build a classifier: the assets, the runtime and the
/// expected model geometry. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub weights_path: PathBuf,
    pub ort_lib_path: PathBuf,
    pub labels_path: PathBuf,
    pub inference_device: InferenceDevice,
    pub input_size: u32,
    pub num_classes: usize,
    pub profile: bool,
    /// TensorRT only: build the engine in fp16.
    pub trt_fp16: bool,
    /// TensorRT only: cache built engines next to the model.
    pub trt_engine_cache: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: PathBuf::from("model.onnx"),
            ort_lib_path: PathBuf::from("libonnxruntime.so"),
            labels_path: PathBuf::from("labelmap.txt"),
            inference_device: InferenceDevice::CPU,
            input_size: DEFAULT_INPUT_SIZE,
            num_classes: DEFAULT_NUM_CLASSES,
            profile: false,
            trt_fp16: false,
            trt_engine_cache: true,
        }
    }
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config = serde_json::from_str(json).context("Invalid model config")?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn set_device_type(&mut self, device_type: InferenceDevice) {
        self.inference_device = device_type;
    }

    pub fn summary(&self) -> String {
        format!("Weights File Path: {}\n\
        Labels Path: {}\n\
        OnnxRuntime Lib Path: {}\n\
        Inference Device: {}\n\
        Model Input Resolution: {}x{}\n\
        Number of Classes: {}",
                self.weights_path.display(), self.labels_path.display(), self.ort_lib_path.display(),
                self.inference_device, self.input_size, self.input_size, self.num_classes)
    }
}
