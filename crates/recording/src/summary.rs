//! Run summary

use std::fmt;

use serde::Serialize;
use ttc_engine::{Decision, Sample, Timestamp};

/// Aggregate view of one engine run, for logging
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Samples evaluated
    pub samples: usize,
    /// Samples where the vehicle was closing on the object
    pub closing: usize,
    /// Samples that triggered emergency braking
    pub brake_decisions: usize,
    /// Smallest finite effective TTC seen (s)
    pub min_effective_ttc: Option<f64>,
    /// Timestamp of the first braking sample
    pub first_brake_at: Option<Timestamp>,
}

impl RunSummary {
    pub fn from_run(samples: &[Sample], decisions: &[Decision]) -> Self {
        let mut summary = Self {
            samples: decisions.len(),
            ..Default::default()
        };

        for (sample, decision) in samples.iter().zip(decisions) {
            if decision.is_closing() {
                summary.closing += 1;
            }
            if decision.brake {
                summary.brake_decisions += 1;
                if summary.first_brake_at.is_none() {
                    summary.first_brake_at = Some(sample.timestamp.clone());
                }
            }
            if decision.effective_ttc.is_finite() {
                let min = summary.min_effective_ttc.get_or_insert(decision.effective_ttc);
                *min = min.min(decision.effective_ttc);
            }
        }

        summary
    }

    /// Share of samples that braked
    pub fn brake_ratio(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.brake_decisions as f64 / self.samples as f64
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples, {} closing, {} braking ({:.1}%)",
            self.samples,
            self.closing,
            self.brake_decisions,
            self.brake_ratio() * 100.0
        )?;
        if let Some(min) = self.min_effective_ttc {
            write!(f, ", min effective TTC {:.2}s", min)?;
        }
        if let Some(ts) = &self.first_brake_at {
            write!(f, ", first brake at {}", ts)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttc_engine::{DecisionEngine, EngineConfig, WeatherCondition};

    #[test]
    fn test_summary_counts() {
        let samples = vec![
            Sample::new(0.0, 10.0, 15.0, 20.0, WeatherCondition::Dry),
            Sample::new(1.0, 20.0, 10.0, 22.0, WeatherCondition::Dry),
            Sample::new(2.0, 20.0, 10.0, 22.0, WeatherCondition::Wet),
            Sample::new(3.0, 20.0, 10.0, 5.0, WeatherCondition::Wet),
        ];
        let engine = DecisionEngine::new(EngineConfig::default()).unwrap();
        let decisions = engine.decide_all(&samples);
        let summary = RunSummary::from_run(&samples, &decisions);

        assert_eq!(summary.samples, 4);
        assert_eq!(summary.closing, 3);
        assert_eq!(summary.brake_decisions, 2);
        assert_eq!(summary.first_brake_at, Some(Timestamp::Number(2.0)));
        assert!((summary.min_effective_ttc.unwrap() - 0.5).abs() < 1e-9);
        assert!((summary.brake_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::from_run(&[], &[]);
        assert_eq!(summary.brake_ratio(), 0.0);
        assert_eq!(summary.to_string(), "0 samples, 0 closing, 0 braking (0.0%)");
    }
}
