use std::time::Instant;
use ndarray::Array4;
use crate::error::ClassifyError;
use crate::utils;

pub trait InferenceProcess {
    type Input;
    type Output;

    /// Pre-process the input data.
    fn preprocess(&self, x: Self::Input) -> Result<Array4<f32>, ClassifyError>;

    /// Executes the model on the preprocessed data.
    fn inference(&mut self, x: Array4<f32>) -> Result<Vec<f32>, ClassifyError>;

    /// Post-process the model's output.
    fn postprocess(&self, ys: Vec<f32>) -> Result<Self::Output, ClassifyError>;

    /// Log a per-stage summary after every run.
    fn profile(&self) -> bool {
        false
    }

    /// Executes the full pipeline.
    fn run(&mut self, x: Self::Input) -> Result<Self::Output, ClassifyError> {
        let start = Instant::now();
        let mut _elapsed = start.elapsed();

        let t_pre = Instant::now();
        let xs = self.preprocess(x)?;
        let t_pre = t_pre.elapsed();
        _elapsed = utils::trace("TIME", "Preprocessing input", start, _elapsed);

        let t_exe = Instant::now();
        let ys = self.inference(xs)?;
        let t_exe = t_exe.elapsed();
        _elapsed = utils::trace("TIME", "Inference run", start, _elapsed);

        let t_post = Instant::now();
        let y = self.postprocess(ys)?;
        let t_post = t_post.elapsed();
        utils::trace("TIME", "Postprocessing", start, _elapsed);

        if self.profile() {
            log::info!("> Preprocess: {t_pre:?} | Inference: {t_exe:?} | Postprocess: {t_post:?}");
        }

        Ok(y)
    }
}
