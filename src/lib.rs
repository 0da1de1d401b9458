mod utils;
pub mod camera_access;
pub mod classification_runners;
pub mod common;
pub mod data;
pub mod error;
pub mod service;

use std::time::Instant;
use crate::classification_runners::{InferenceEngine, OrtEngine, PokeClassifier};
use crate::common::{Classification, LabelTable, ModelConfig, PokeImage};
use crate::data::ConfigOrt;
use crate::error::ClassifyError;

pub type Result<T, E = ClassifyError> = std::result::Result<T, E>;

pub type OrtClassifier = PokeClassifier<OrtEngine>;

/// Loads the labels, brings up the ONNX Runtime session and checks that the
/// two agree. Any failure here is fatal for the caller.
pub fn init_classifier(model_details: &ModelConfig) -> Result<OrtClassifier> {
    log::info!("Initializing classifier\n{}", model_details.summary());

    let labels = LabelTable::load(&model_details.labels_path)?;

    let ort_options = ConfigOrt::from(model_details);
    log::info!("Initializing ORT session with ({}) execution provider", model_details.inference_device);
    let engine = OrtEngine::new(&ort_options).map_err(ClassifyError::EngineUnavailable)?;

    let classifier = PokeClassifier::new(engine, labels, model_details.input_size)?
        .with_profile(model_details.profile);
    log::info!(
        "Classifier ready: {} labels on {}",
        classifier.labels().len(),
        classifier.engine().device(),
    );
    Ok(classifier)
}

pub fn run_classification<E: InferenceEngine>(classifier: &mut PokeClassifier<E>, frame: PokeImage) -> Result<Classification> {
    let now = Instant::now();

    let classification = classifier.classify(frame)?;

    log::debug!("Processing time: {:?}", now.elapsed());

    Ok(classification)
}
