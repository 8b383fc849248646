//! Response assembly

use crate::error::{Error, Result};
use crate::types::{Frame, PredictionResult};
use tracing::warn;

/// Zip labels and probabilities into one result per frame row.
///
/// `row_id` is the row's position in the frame, which preserves request order.
/// A label count that differs from the row count is an internal error. The
/// classifier adapter already rejects that case, so inside the pipeline this
/// only guards callers that hand labels in directly. A probability count that
/// differs is treated as "no probabilities".
pub fn assemble(
    frame: &Frame,
    labels: &[i64],
    probabilities: &[Option<f64>],
) -> Result<Vec<PredictionResult>> {
    if labels.len() != frame.len() {
        return Err(Error::internal(format!(
            "classifier returned {} labels for {} rows",
            labels.len(),
            frame.len()
        )));
    }

    let probabilities_usable = probabilities.len() == frame.len();
    if !probabilities_usable {
        warn!(
            "Ignoring {} probabilities for {} rows",
            probabilities.len(),
            frame.len()
        );
    }

    Ok(labels
        .iter()
        .enumerate()
        .map(|(row_id, &label)| PredictionResult {
            row_id,
            label,
            probability: if probabilities_usable {
                probabilities[row_id]
            } else {
                None
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(rows: usize) -> Frame {
        Frame::new(vec!["x".into()], (0..rows).map(|i| vec![json!(i)]).collect()).unwrap()
    }

    #[test]
    fn test_assemble_in_order() {
        let results = assemble(&frame(3), &[1, 0, 1], &[Some(0.9), None, Some(0.6)]).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0],
            PredictionResult {
                row_id: 0,
                label: 1,
                probability: Some(0.9)
            }
        );
        assert_eq!(results[1].row_id, 1);
        assert_eq!(results[1].probability, None);
        assert_eq!(results[2].label, 1);
    }

    #[test]
    fn test_label_length_mismatch() {
        assert!(matches!(
            assemble(&frame(2), &[1], &[None, None]),
            Err(Error::Internal(_))
        ));
    }

    #[test]
    fn test_probability_length_mismatch_degrades() {
        let results = assemble(&frame(2), &[0, 1], &[Some(0.1)]).unwrap();
        assert!(results.iter().all(|r| r.probability.is_none()));
    }

    #[test]
    fn test_empty_frame() {
        assert!(assemble(&frame(0), &[], &[]).unwrap().is_empty());
    }
}
