//! ONNX Runtime backed inference engine.

use std::path::Path;
use std::time::Instant;
use anyhow::Result;
use ndarray::Array4;
use ort::{
    execution_providers::{ExecutionProvider,
                          CPUExecutionProvider,
                          CUDAExecutionProvider,
                          TensorRTExecutionProvider,
                          CoreMLExecutionProvider},
    session::builder::{GraphOptimizationLevel, SessionBuilder},
    session::Session,
    value::Tensor,
};
use crate::classification_runners::inference_engine::InferenceEngine;
use crate::common::InferenceDevice;
use crate::data::{ConfigOrt, TimeCalc, CROSS_MARK};

#[derive(Debug)]
pub struct OrtEngine {
    session: Session,
    device: InferenceDevice,
    input_name: String,
    output_name: String,
    model_size: u32,
    nc: usize,
    profile: bool,
    pub infer_time: TimeCalc,
}

impl OrtEngine {
    /// Fails without touching the runtime when the model file is missing. A
    /// library path with a directory part must exist; a bare file name is left
    /// to the system loader.
    pub fn new(config: &ConfigOrt) -> Result<Self> {
        if !config.onnx_path.is_file() {
            anyhow::bail!("{CROSS_MARK} Model file not found: {}", config.onnx_path.display());
        }
        Self::load_runtime(&config.ort_lib_path)?;

        let mut builder = Session::builder()?;

        let mut device = config.device;
        match device {
            InferenceDevice::TensorRT(device_id) => {
                Self::build_trt(
                    &mut builder,
                    device_id,
                    config.trt_fp16_enable,
                    config.trt_engine_cache_enable,
                ).unwrap_or_else(|err| {
                    log::warn!("{err}, Using cpu");
                    device = InferenceDevice::CPU;
                })
            }
            InferenceDevice::CUDA(device_id) => {
                Self::build_cuda(&mut builder, device_id).unwrap_or_else(|err| {
                    log::warn!("{err}, Using cpu");
                    device = InferenceDevice::CPU;
                })
            }
            InferenceDevice::CoreML(_) => Self::build_coreml(&mut builder).unwrap_or_else(|err| {
                log::warn!("{err}, Using cpu");
                device = InferenceDevice::CPU;
            }),
            InferenceDevice::CPU => {
                Self::build_cpu(&mut builder)?;
            }
        }

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.onnx_path)?;

        let input_name = match session.inputs.first() {
            Some(input) => input.name.clone(),
            None => anyhow::bail!("{CROSS_MARK} Model {} declares no inputs", config.onnx_path.display()),
        };
        let output_name = match session.outputs.first() {
            Some(output) => output.name.clone(),
            None => anyhow::bail!("{CROSS_MARK} Model {} declares no outputs", config.onnx_path.display()),
        };

        let mut engine = Self {
            session,
            device,
            input_name,
            output_name,
            model_size: config.model_size,
            nc: 0,
            profile: config.profile,
            infer_time: TimeCalc::default(),
        };

        // Dry run on a blank frame: validates the input shape and learns the output length.
        let size = config.model_size as usize;
        let scores = engine.run(Array4::zeros((1, size, size, 3)))?;
        engine.nc = scores.len();
        engine.infer_time.clear();

        if let Some(nc) = config.nc {
            if nc != engine.nc {
                log::warn!("Configured for {} classes but the model outputs {}", nc, engine.nc);
            }
        }

        log::info!(
            "Backend: ONNXRuntime | Device: {} | Input: [1, {}, {}, 3] ({}) | Output: {} ({})",
            engine.device,
            engine.model_size,
            engine.model_size,
            engine.input_name,
            engine.nc,
            engine.output_name,
        );

        Ok(engine)
    }

    fn load_runtime(ort_lib_path: &Path) -> Result<()> {
        let has_dir = ort_lib_path.parent().is_some_and(|dir| !dir.as_os_str().is_empty());
        if has_dir && !ort_lib_path.is_file() {
            anyhow::bail!("{CROSS_MARK} ONNX Runtime library not found: {}", ort_lib_path.display());
        }

        // A library that cannot be loaded makes ort panic instead of returning an error.
        let lib = ort_lib_path.display().to_string();
        let committed = std::panic::catch_unwind(|| ort::init_from(lib.clone()).commit());
        match committed {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => anyhow::bail!("{CROSS_MARK} Failed to load ONNX Runtime from {lib}: {:?}", e),
            Err(_) => anyhow::bail!("{CROSS_MARK} Failed to load ONNX Runtime from {lib}"),
        }
    }

    fn build_trt(
        builder: &mut SessionBuilder,
        device_id: usize,
        fp16_enable: bool,
        engine_cache_enable: bool,
    ) -> Result<()> {
        let trt = TensorRTExecutionProvider::default()
            .with_device_id(device_id as i32)
            .with_fp16(fp16_enable)
            .with_engine_cache(engine_cache_enable)
            .with_engine_cache_path("trt-cache");
        if trt.is_available()? {
            match trt.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} TensorRT initialization failed: {:?}", err) }
            }
            log::info!("Initial model serialization with TensorRT may take some time...");
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} TensorRT execution provider not available")
        }
    }

    fn build_cuda(builder: &mut SessionBuilder, device_id: usize) -> Result<()> {
        let ep = CUDAExecutionProvider::default()
            .with_device_id(device_id as i32);
        if ep.is_available()? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} CUDA initialization failed: {:?}", err) }
            }
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} CUDA execution provider not available")
        }
    }

    fn build_coreml(builder: &mut SessionBuilder) -> Result<()> {
        let ep = CoreMLExecutionProvider::default()
            .with_subgraphs(false);
        if ep.is_available()? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} CoreML initialization failed: {:?}", err) }
            }
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} CoreML execution provider not available")
        }
    }

    fn build_cpu(builder: &mut SessionBuilder) -> Result<()> {
        let ep = CPUExecutionProvider::default();
        if ep.is_available()? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} CPU initialization failed: {:?}", err) }
            }
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} CPU execution provider not available")
        }
    }

    fn run(&mut self, input: Array4<f32>) -> Result<Vec<f32>> {
        let t_run = Instant::now();

        let tensor = Tensor::from_array(input)?;
        let scores: Vec<f32> = {
            let outputs = self.session.run(ort::inputs![self.input_name.as_str() => tensor])?;
            let output = outputs[self.output_name.as_str()].try_extract_array::<f32>()?;
            output.iter().copied().collect()
        };

        let t_run = t_run.elapsed();
        self.infer_time.add_or_push(0, t_run);

        if self.profile {
            log::info!(
                "[Profile] inference: {:?} ({:?} avg over {} runs)",
                t_run,
                self.infer_time.avg(),
                self.infer_time.runs(),
            );
        }

        Ok(scores)
    }

    pub fn device(&self) -> InferenceDevice {
        self.device
    }
}

impl InferenceEngine for OrtEngine {
    fn infer(&mut self, input: Array4<f32>) -> Result<Vec<f32>> {
        self.run(input)
    }

    fn input_size(&self) -> Option<u32> {
        Some(self.model_size)
    }

    fn num_classes(&self) -> Option<usize> {
        Some(self.nc)
    }
}
