use crate::common::{Classification, LabelTable};
use crate::error::ClassifyError;

/// Index and value of the highest score.
///
/// The running maximum starts at the first element and only a strictly greater
/// score replaces it, so ties go to the lowest index and an all-zero vector
/// yields index 0. NaN scores never win over a number.
pub fn top_class(scores: &[f32]) -> Option<(usize, f32)> {
    let (&first, rest) = scores.split_first()?;
    let mut best = (0, first);

    for (i, &score) in rest.iter().enumerate() {
        if score > best.1 || (best.1.is_nan() && !score.is_nan()) {
            best = (i + 1, score);
        }
    }

    Some(best)
}

/// Maps the model output onto the label table.
pub fn decode(scores: &[f32], labels: &LabelTable) -> Result<Classification, ClassifyError> {
    if scores.len() != labels.len() {
        return Err(ClassifyError::OutputMismatch {
            expected: labels.len(),
            actual: scores.len(),
        });
    }

    let (class_id, confidence) = top_class(scores).ok_or(ClassifyError::EmptyOutput)?;
    let label = labels.get(class_id).ok_or(ClassifyError::EmptyOutput)?;

    Ok(Classification::new(class_id, label, confidence))
}
