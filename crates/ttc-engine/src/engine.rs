//! Decision engine
//!
//! Composes the kinematic evaluator, the threshold policy and reaction
//! compensation into one braking [`Decision`] per sample.

use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotator::{annotate_pairs, AnnotatedSample};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::kinematics;
use crate::policy::ThresholdPolicy;
use crate::reaction::ReactionCompensation;
use crate::sample::Sample;

/// Braking decision and the quantities that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decision {
    /// Vehicle minus object speed (m/s)
    pub relative_speed: f64,

    /// Time to collision at constant velocity (s), infinite when not closing
    pub raw_ttc: f64,

    /// Weather-scaled threshold (s)
    pub threshold: f64,

    /// Raw TTC after reaction-time compensation (s)
    pub effective_ttc: f64,

    /// Emergency braking required
    pub brake: bool,
}

impl Decision {
    /// Whether the vehicle was closing on the object
    pub fn is_closing(&self) -> bool {
        self.relative_speed > 0.0
    }
}

/// Decide whether one sample requires emergency braking.
///
/// Braking needs the object to be closing and the effective TTC to be
/// strictly below the threshold; a margin equal to the threshold does not
/// brake.
pub fn decide(
    sample: &Sample,
    threshold_policy: &ThresholdPolicy,
    reaction_compensation: &ReactionCompensation,
) -> Decision {
    let closing = kinematics::evaluate_sample(sample);
    let threshold = threshold_policy.threshold_for(&sample.weather_condition);
    let effective_ttc = reaction_compensation.apply(closing.raw_ttc);

    Decision {
        relative_speed: closing.relative_speed,
        raw_ttc: closing.raw_ttc,
        threshold,
        effective_ttc,
        brake: closing.is_closing() && effective_ttc < threshold,
    }
}

/// Decision engine bound to one configuration snapshot
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: Arc<EngineConfig>,
}

impl DecisionEngine {
    /// Create an engine, validating the configuration
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::from_snapshot(Arc::new(config))
    }

    /// Create an engine sharing an existing configuration snapshot
    pub fn from_snapshot(config: Arc<EngineConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "Decision engine ready: base={}s, compensation={} ({}s)",
            config.threshold_policy.base_threshold_seconds,
            config.reaction_compensation.enabled,
            config.reaction_compensation.reaction_time_seconds
        );
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide a single sample
    pub fn decide(&self, sample: &Sample) -> Decision {
        decide(
            sample,
            &self.config.threshold_policy,
            &self.config.reaction_compensation,
        )
    }

    /// Lazily decide a sequence of samples, preserving order
    pub fn decisions<'a, I>(&'a self, samples: I) -> Decisions<'a, I::IntoIter>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        Decisions {
            engine: self,
            samples: samples.into_iter(),
        }
    }

    /// Decide every sample in order
    pub fn decide_all(&self, samples: &[Sample]) -> Vec<Decision> {
        debug!("Evaluating {} samples", samples.len());
        self.decisions(samples).collect()
    }

    /// Decide every sample on the rayon pool; output order matches input
    #[cfg(feature = "parallel")]
    pub fn decide_par(&self, samples: &[Sample]) -> Vec<Decision> {
        debug!("Evaluating {} samples in parallel", samples.len());
        samples.par_iter().map(|sample| self.decide(sample)).collect()
    }

    /// Decide and annotate every sample in order
    pub fn annotate(&self, samples: &[Sample]) -> Vec<AnnotatedSample> {
        annotate_pairs(samples.iter().zip(self.decisions(samples))).collect()
    }
}

/// Lazy, order-preserving decision iterator.
///
/// Cloning it restarts evaluation from the clone point, since every
/// decision depends only on its own sample.
#[derive(Debug, Clone)]
pub struct Decisions<'a, I> {
    engine: &'a DecisionEngine,
    samples: I,
}

impl<'a, I> Iterator for Decisions<'a, I>
where
    I: Iterator<Item = &'a Sample>,
{
    type Item = Decision;

    fn next(&mut self) -> Option<Self::Item> {
        self.samples.next().map(|sample| self.engine.decide(sample))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.samples.size_hint()
    }
}

impl<'a, I> ExactSizeIterator for Decisions<'a, I> where I: ExactSizeIterator<Item = &'a Sample> {}
