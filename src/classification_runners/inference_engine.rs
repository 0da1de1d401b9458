use ndarray::Array4;

/// The black-box model evaluator: an NHWC input tensor in, one score per
/// class out. Implementations own whatever runtime state they need.
pub trait InferenceEngine {
    /// Evaluates the model on a batch-of-one input tensor.
    fn infer(&mut self, input: Array4<f32>) -> anyhow::Result<Vec<f32>>;

    /// Square input size the model was built for, when the engine knows it.
    fn input_size(&self) -> Option<u32> {
        None
    }

    /// Length of the output vector, when the engine knows it.
    fn num_classes(&self) -> Option<usize> {
        None
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn infer(&mut self, input: Array4<f32>) -> anyhow::Result<Vec<f32>> {
        (**self).infer(input)
    }

    fn input_size(&self) -> Option<u32> {
        (**self).input_size()
    }

    fn num_classes(&self) -> Option<usize> {
        (**self).num_classes()
    }
}
