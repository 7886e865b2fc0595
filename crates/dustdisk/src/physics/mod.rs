//! Physical process models acting on the disk each step.
//!
//! Each model is a small value built once from the run configuration and
//! evaluated with the current state. None of them keeps state between
//! steps.

mod collision;
mod phase;
mod psat;
mod radiation;
mod shielding;
mod sinks;
mod sublimation;

#[cfg(test)]
mod psat_test;
#[cfg(test)]
mod shielding_test;
#[cfg(test)]
mod sinks_test;
#[cfg(test)]
mod sublimation_test;

pub use collision::{
    CollisionModel, GrindOutcome, OpticalDepthRegime, classify_optical_depth, collision_timescale,
    vertical_optical_depth,
};
pub use phase::{PhaseEvaluator, PhaseState, PhaseTag, VAPOR_STATE_FRACTION, vapor_fraction};
pub use psat::{
    ClausiusClapeyron, ClausiusCoefficients, LiquidBranch, LocalFitPsat, PsatEvaluation, PsatModel,
    PsatModelKind, PsatRow, PsatSelector, PsatStrategy, TabulatedPsat,
};
pub use radiation::{
    BetaRegime, BinBlowout, ChiBlow, RadiationModel, auto_chi_blow, beta, blowout_radius,
    blowout_timescale, classify_beta, mars_luminosity,
};
pub use shielding::{
    LosGeometry, ShieldingInputs, ShieldingOrder, ShieldingOutcome, ShieldingStack,
    resolve_los_factor, self_shielding_phi,
};
pub use sinks::{
    AuxiliarySinks, GasDragConfig, HydroEscapeConfig, gas_drag_timescale, hydro_escape_timescale,
};
pub use sublimation::{
    SublimationModel, SublimationRates, hkl_mass_flux, shrink_loss_fraction, sublimation_timescale,
};
