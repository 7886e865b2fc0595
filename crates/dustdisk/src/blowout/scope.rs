//! Which mass is exposed to blow-out.

use serde::{Deserialize, Serialize};

use crate::config::BlowoutConfig;
use crate::physics::PhaseTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPhase {
    /// Blow-out acts only while the disk is solid
    #[default]
    SolidOnly,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlowoutLayer {
    /// Only the τ ≤ 1 skin is exposed
    #[default]
    SurfaceTauLe1,
    FullSurface,
}

/// Blow-out scope resolved once at run start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlowoutScope {
    Disabled,
    Active {
        target: TargetPhase,
        layer: BlowoutLayer,
    },
}

impl BlowoutScope {
    pub fn from_config(config: &BlowoutConfig) -> Self {
        if config.enabled {
            Self::Active {
                target: config.target_phase,
                layer: config.layer,
            }
        } else {
            Self::Disabled
        }
    }

    /// Fraction of the active mass exposed to blow-out.
    pub fn eligible_fraction(&self, phase: PhaseTag, sigma_tau1: f64, sigma_active: f64) -> f64 {
        match *self {
            Self::Disabled => 0.0,
            Self::Active { target, layer } => {
                if target == TargetPhase::SolidOnly && phase == PhaseTag::Vapor {
                    return 0.0;
                }
                match layer {
                    BlowoutLayer::FullSurface => 1.0,
                    BlowoutLayer::SurfaceTauLe1 => {
                        if !(sigma_active > 0.0) {
                            0.0
                        } else if sigma_tau1.is_infinite() {
                            1.0
                        } else {
                            (sigma_tau1 / sigma_active).clamp(0.0, 1.0)
                        }
                    }
                }
            }
        }
    }
}
