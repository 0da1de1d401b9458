pub mod decoder;
pub mod image_ops;
pub mod inference_engine;
pub mod inference_process;
mod ort_engine;
mod poke_classifier;

pub use inference_engine::InferenceEngine;
pub use inference_process::InferenceProcess;
pub use ort_engine::*;
pub use poke_classifier::*;
