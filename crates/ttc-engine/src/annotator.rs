//! Dataset annotation
//!
//! Pairs each sample with its decision's braking state, in order, without
//! filtering or aggregating.

use std::borrow::Borrow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::Decision;
use crate::error::AnnotateError;
use crate::sample::Sample;

/// Original sample plus the braking state decided for it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotatedSample {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub sample: Sample,

    pub braking_state: bool,
}

impl AnnotatedSample {
    pub fn new(sample: Sample, decision: &Decision) -> Self {
        Self {
            sample,
            braking_state: decision.brake,
        }
    }
}

/// Lazily annotate `(sample, decision)` pairs, preserving order
pub fn annotate_pairs<'a, I, D>(pairs: I) -> impl Iterator<Item = AnnotatedSample> + 'a
where
    I: IntoIterator<Item = (&'a Sample, D)> + 'a,
    I::IntoIter: 'a,
    D: Borrow<Decision> + 'a,
{
    pairs
        .into_iter()
        .map(|(sample, decision)| AnnotatedSample::new(sample.clone(), decision.borrow()))
}

/// Annotate samples with separately computed decisions.
///
/// Both slices must have the same length; decision `i` belongs to sample `i`.
pub fn annotate(samples: &[Sample], decisions: &[Decision]) -> Result<Vec<AnnotatedSample>, AnnotateError> {
    if samples.len() != decisions.len() {
        return Err(AnnotateError::LengthMismatch {
            samples: samples.len(),
            decisions: decisions.len(),
        });
    }

    Ok(annotate_pairs(samples.iter().zip(decisions)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::WeatherCondition;

    fn decision(brake: bool) -> Decision {
        Decision {
            relative_speed: 1.0,
            raw_ttc: 1.0,
            threshold: 2.0,
            effective_ttc: 1.0,
            brake,
        }
    }

    #[test]
    fn test_annotate_preserves_order() {
        let samples: Vec<_> = (0..4)
            .map(|i| Sample::new(i as f64, 20.0, 10.0, 5.0, WeatherCondition::Dry))
            .collect();
        let decisions = vec![decision(true), decision(false), decision(false), decision(true)];

        let annotated = annotate(&samples, &decisions).unwrap();
        assert_eq!(annotated.len(), 4);
        for (i, record) in annotated.iter().enumerate() {
            assert_eq!(record.sample, samples[i]);
            assert_eq!(record.braking_state, decisions[i].brake);
        }
    }

    #[test]
    fn test_annotate_length_mismatch() {
        let samples = vec![Sample::new(0.0, 20.0, 10.0, 5.0, WeatherCondition::Dry)];
        let err = annotate(&samples, &[]).unwrap_err();
        assert_eq!(
            err,
            AnnotateError::LengthMismatch {
                samples: 1,
                decisions: 0
            }
        );
    }

    #[test]
    fn test_annotate_empty() {
        assert!(annotate(&[], &[]).unwrap().is_empty());
    }
}
