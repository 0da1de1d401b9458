use serde::{Deserialize, Serialize};

/// Execution provider the ONNX Runtime session is built for. GPU variants
/// carry the device ordinal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum InferenceDevice {
    #[default] CPU,
    CUDA(usize),
    TensorRT(usize),
    CoreML(usize),
}

// Hardcoded device names. Storing the "proper" spelling and the lowercase version.
const CPU: [&str; 2] = ["CPU","cpu"];
const CUDA: [&str; 2] = ["CUDA","cuda"];
const TENSOR_RT: [&str; 2] = ["TensorRT","tensorrt"];
const CORE_ML: [&str; 2] = ["CoreML","coreml"];

impl InferenceDevice {
    pub fn from_name(device: &str, device_id: usize) -> Option<Self> {
        match device.to_lowercase().as_str() {
            "cpu" => Some(InferenceDevice::CPU),
            "cuda" => Some(InferenceDevice::CUDA(device_id)),
            "tensorrt" => Some(InferenceDevice::TensorRT(device_id)),
            "coreml" => Some(InferenceDevice::CoreML(device_id)),
            _ => None,
        }
    }

    pub fn str(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => CPU[0],
            InferenceDevice::CUDA(_) => CUDA[0],
            InferenceDevice::TensorRT(_) => TENSOR_RT[0],
            InferenceDevice::CoreML(_) => CORE_ML[0],
        }
    }

    pub fn device_id(&self) -> usize {
        match self {
            InferenceDevice::CPU => 0,
            InferenceDevice::CUDA(id) | InferenceDevice::TensorRT(id) | InferenceDevice::CoreML(id) => *id,
        }
    }

    /// Same provider on another device ordinal. CPU has no ordinal and is
    /// returned unchanged.
    pub fn with_device_id(self, device_id: usize) -> Self {
        match self {
            InferenceDevice::CPU => InferenceDevice::CPU,
            InferenceDevice::CUDA(_) => InferenceDevice::CUDA(device_id),
            InferenceDevice::TensorRT(_) => InferenceDevice::TensorRT(device_id),
            InferenceDevice::CoreML(_) => InferenceDevice::CoreML(device_id),
        }
    }

    pub fn all_inference_devices() -> Vec<&'static str> {
        vec![CPU[1], CUDA[1], TENSOR_RT[1], CORE_ML[1]]
    }
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceDevice::CPU => write!(f, "{}", self.str()),
            _ => write!(f, "{}:{}", self.str(), self.device_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(InferenceDevice::from_name("CUDA", 1), Some(InferenceDevice::CUDA(1)));
        assert_eq!(InferenceDevice::from_name("TensorRT", 0), Some(InferenceDevice::TensorRT(0)));
        assert_eq!(InferenceDevice::from_name("cpu", 7), Some(InferenceDevice::CPU));
        assert_eq!(InferenceDevice::from_name("rocm", 0), None);
    }

    #[test]
    fn test_with_device_id_keeps_the_provider() {
        assert_eq!(InferenceDevice::CUDA(0).with_device_id(3), InferenceDevice::CUDA(3));
        assert_eq!(InferenceDevice::TensorRT(2).with_device_id(1).device_id(), 1);
        assert_eq!(InferenceDevice::CPU.with_device_id(5), InferenceDevice::CPU);
    }

    #[test]
    fn test_display() {
        assert_eq!(InferenceDevice::CPU.to_string(), "CPU");
        assert_eq!(InferenceDevice::CoreML(2).to_string(), "CoreML:2");
    }
}
