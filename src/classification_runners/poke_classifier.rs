use ndarray::Array4;
use crate::classification_runners::decoder;
use crate::classification_runners::image_ops;
use crate::classification_runners::inference_engine::InferenceEngine;
use crate::classification_runners::inference_process::InferenceProcess;
use crate::common::{Classification, LabelTable, PokeImage};
use crate::error::ClassifyError;

/// Frame in, top-1 label out. Owns the engine and the label table.
#[derive(Debug)]
pub struct PokeClassifier<E> {
    engine: E,
    labels: LabelTable,
    input_size: u32,
    profile: bool,
}

impl<E: InferenceEngine> PokeClassifier<E> {
    /// Fails when the engine reports a geometry that disagrees with the labels
    /// or with `input_size`.
    pub fn new(engine: E, labels: LabelTable, input_size: u32) -> Result<Self, ClassifyError> {
        if input_size == 0 {
            return Err(ClassifyError::ModelMismatch("input size must be non-zero".to_string()));
        }
        if labels.is_empty() {
            return Err(ClassifyError::ModelMismatch("label table is empty".to_string()));
        }
        if let Some(nc) = engine.num_classes() {
            if nc != labels.len() {
                return Err(ClassifyError::ModelMismatch(format!(
                    "model has {} classes, label table has {} entries",
                    nc,
                    labels.len()
                )));
            }
        }
        if let Some(size) = engine.input_size() {
            if size != input_size {
                return Err(ClassifyError::ModelMismatch(format!(
                    "model expects {size}x{size} input, configured for {input_size}x{input_size}"
                )));
            }
        }

        Ok(Self {
            engine,
            labels,
            input_size,
            profile: false,
        })
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    pub fn classify(&mut self, frame: PokeImage) -> Result<Classification, ClassifyError> {
        self.run(frame)
    }

    /// Decodes an encoded frame first; a decode failure is a skippable error.
    pub fn classify_bytes(&mut self, bytes: &[u8]) -> Result<Classification, ClassifyError> {
        let frame = PokeImage::decode(bytes)?;
        self.classify(frame)
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: InferenceEngine> InferenceProcess for PokeClassifier<E> {
    type Input = PokeImage;
    type Output = Classification;

    fn preprocess(&self, x: PokeImage) -> Result<Array4<f32>, ClassifyError> {
        Ok(image_ops::preprocess(x, self.input_size)?)
    }

    fn inference(&mut self, x: Array4<f32>) -> Result<Vec<f32>, ClassifyError> {
        self.engine.infer(x).map_err(ClassifyError::Inference)
    }

    fn postprocess(&self, ys: Vec<f32>) -> Result<Classification, ClassifyError> {
        decoder::decode(&ys, &self.labels)
    }

    fn profile(&self) -> bool {
        self.profile
    }
}
