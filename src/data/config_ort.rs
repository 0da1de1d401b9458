//! Options for building the ONNX Runtime engine.

use std::path::{Path, PathBuf};
use crate::common::{InferenceDevice, ModelConfig};

#[derive(Debug, Clone)]
pub struct ConfigOrt {
    pub onnx_path: PathBuf,
    pub ort_lib_path: PathBuf,
    pub device: InferenceDevice,
    pub model_size: u32,
    pub nc: Option<usize>,
    pub profile: bool,

    // trt related
    pub trt_engine_cache_enable: bool,
    pub trt_fp16_enable: bool,
}

impl Default for ConfigOrt {
    fn default() -> Self {
        Self {
            onnx_path: PathBuf::new(),
            ort_lib_path: PathBuf::new(),
            device: InferenceDevice::CPU,
            model_size: 224,
            nc: None,
            profile: false,

            trt_engine_cache_enable: true,
            trt_fp16_enable: false,
        }
    }
}

impl From<&ModelConfig> for ConfigOrt {
    fn from(config: &ModelConfig) -> Self {
        ConfigOrt::new()
            .with_model(&config.weights_path)
            .with_ort_lib_path(&config.ort_lib_path)
            .with_device(config.inference_device)
            .with_model_size(config.input_size)
            .with_nc(config.num_classes)
            .with_profile(config.profile)
            .with_trt_fp16(config.trt_fp16)
            .with_trt_engine_cache(config.trt_engine_cache)
    }
}

impl ConfigOrt {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_model<P: AsRef<Path>>(mut self, onnx_path: P) -> Self {
        self.onnx_path = onnx_path.as_ref().to_path_buf();
        self
    }

    pub fn with_ort_lib_path<P: AsRef<Path>>(mut self, ort_lib_path: P) -> Self {
        self.ort_lib_path = ort_lib_path.as_ref().to_path_buf();
        self
    }

    pub fn with_model_size(mut self, n: u32) -> Self {
        self.model_size = n;
        self
    }

    pub fn with_device(mut self, device_type: InferenceDevice) -> Self {
        self.device = device_type;
        self
    }

    pub fn with_trt_fp16(mut self, x: bool) -> Self {
        self.trt_fp16_enable = x;
        self
    }

    pub fn with_trt_engine_cache(mut self, x: bool) -> Self {
        self.trt_engine_cache_enable = x;
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_nc(mut self, nc: usize) -> Self {
        self.nc = Some(nc);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_model_config() {
        let config = ModelConfig {
            weights_path: PathBuf::from("pokemon.onnx"),
            inference_device: InferenceDevice::TensorRT(1),
            input_size: 160,
            num_classes: 3,
            trt_fp16: true,
            trt_engine_cache: false,
            ..Default::default()
        };
        let ort = ConfigOrt::from(&config);

        assert_eq!(ort.onnx_path, PathBuf::from("pokemon.onnx"));
        assert_eq!(ort.device, InferenceDevice::TensorRT(1));
        assert_eq!(ort.model_size, 160);
        assert_eq!(ort.nc, Some(3));
        assert!(ort.trt_fp16_enable);
        assert!(!ort.trt_engine_cache_enable);
    }
}
