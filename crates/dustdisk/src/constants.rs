//! Physical constants and run-wide defaults (SI units).

/// Gravitational constant (m³/(kg·s²))
pub const G: f64 = 6.674_30e-11;

/// Speed of light (m/s)
pub const C: f64 = 2.997_924_58e8;

/// Stefan-Boltzmann constant (W/(m²·K⁴))
pub const SIGMA_SB: f64 = 5.670_374_419e-8;

/// Molar gas constant (J/(mol·K))
pub const R_GAS: f64 = 8.314_462_618;

/// Mars mass (kg)
pub const M_MARS: f64 = units::MARS_MASS_KG;

/// Mars radius (m)
pub const R_MARS: f64 = units::MARS_RADIUS_M;

/// Pi
pub const PI: f64 = std::f64::consts::PI;

/// Seed used when the configuration does not override it
pub const DEFAULT_SEED: u64 = 12_345;

/// Allowed ledger drift as a percentage of the initial mass
pub const MASS_BUDGET_TOLERANCE_PERCENT: f64 = 0.5;

/// β above which grains on circular orbits are unbound
pub const BLOWOUT_BETA_THRESHOLD: f64 = 0.5;

/// Extra fraction of steps granted when the step count is derived from dt
pub const AUTO_MAX_MARGIN: f64 = 0.05;

/// Default Δt/t_blow above which the exponential removal fraction is used
pub const FAST_BLOWOUT_THRESHOLD: f64 = 0.1;

/// Default engagement threshold in strict mode
pub const FAST_BLOWOUT_STRICT_THRESHOLD: f64 = 0.01;

/// Optical depth separating the thin skin from the thick cascade
pub const TAU_SKIN: f64 = 1.0;
