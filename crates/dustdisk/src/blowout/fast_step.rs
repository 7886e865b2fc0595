//! Step-size correction for blow-out.

use serde::{Deserialize, Serialize};

use crate::config::FastBlowoutConfig;
use crate::timescale::Timescale;

/// How the removed fraction was computed for one ratio Δt/t_blow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum FastStepRegime {
    /// min(ratio, 1)
    Linear { ratio: f64, threshold: f64 },
    /// 1 - exp(-ratio)
    Exponential { ratio: f64, threshold: f64 },
}

impl FastStepRegime {
    pub fn ratio(&self) -> f64 {
        match self {
            Self::Linear { ratio, .. } | Self::Exponential { ratio, .. } => *ratio,
        }
    }

    pub fn is_engaged(&self) -> bool {
        matches!(self, Self::Exponential { .. })
    }

    /// Removed fraction in [0, 1].
    pub fn fraction(&self) -> f64 {
        match *self {
            Self::Linear { ratio, .. } => ratio.clamp(0.0, 1.0),
            Self::Exponential { ratio, .. } => fast_blowout_correction_factor(ratio),
        }
    }
}

/// Exponential regime once the ratio exceeds the threshold.
pub fn classify_fast_step(ratio: f64, threshold: f64) -> FastStepRegime {
    if ratio > threshold {
        FastStepRegime::Exponential { ratio, threshold }
    } else {
        FastStepRegime::Linear { ratio, threshold }
    }
}

/// 1 - exp(-ratio), accurate for small ratios.
pub fn fast_blowout_correction_factor(ratio: f64) -> f64 {
    if !(ratio > 0.0) {
        return 0.0;
    }
    (-(-ratio).exp_m1()).clamp(0.0, 1.0)
}

/// Resolved fast-step settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastStepPolicy {
    enabled: bool,
    threshold: f64,
}

impl FastStepPolicy {
    pub fn new(enabled: bool, threshold: f64) -> Self {
        Self { enabled, threshold }
    }

    /// Strict mode only lowers the engagement threshold.
    pub fn from_config(config: &FastBlowoutConfig) -> Self {
        let threshold = if config.strict {
            config.strict_threshold
        } else {
            config.threshold
        };
        Self::new(config.enabled, threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Regime for a step of `dt` seconds; `None` when nothing is unbound.
    pub fn regime(&self, dt: f64, t_blow: Timescale) -> Option<FastStepRegime> {
        let t = t_blow.seconds()?;
        let ratio = dt / t;
        if self.enabled {
            Some(classify_fast_step(ratio, self.threshold))
        } else {
            Some(FastStepRegime::Linear {
                ratio,
                threshold: self.threshold,
            })
        }
    }

    pub fn fraction(&self, dt: f64, t_blow: Timescale) -> f64 {
        self.regime(dt, t_blow).map_or(0.0, |r| r.fraction())
    }
}
