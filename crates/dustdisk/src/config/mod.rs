//! Run configuration.
//!
//! A run is described by one immutable [`RunConfig`]. Every section carries
//! serde defaults, so a JSON document only needs to name what differs from
//! the baseline run. Loading always finishes with [`RunConfig::validate`],
//! which is the only place configuration errors are raised.
//!
//! ```json
//! {
//!   "geometry": { "r_mars_radii": 2.0 },
//!   "temperature": { "driver": { "mode": "hyodo_linear", "t0_k": 4000.0 } },
//!   "blowout": { "gate_mode": "collision_competition" },
//!   "numerics": { "t_end_years": 1.0, "dt": { "mode": "auto" } }
//! }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};
use units::{AngularVelocity, Length, Time};

use crate::blowout::{BlowoutLayer, GateMode, TargetPhase};
use crate::constants::{
    BLOWOUT_BETA_THRESHOLD, DEFAULT_SEED, FAST_BLOWOUT_STRICT_THRESHOLD, FAST_BLOWOUT_THRESHOLD,
    MASS_BUDGET_TOLERANCE_PERCENT, R_MARS,
};
use crate::error::ConfigError;
use crate::geometry::DiskGeometry;
use crate::particles::{SupplyMode, SurfaceEnergyConfig};
use crate::physics::{
    ChiBlow, ClausiusCoefficients, GasDragConfig, HydroEscapeConfig, LiquidBranch, LosGeometry,
    PsatModel, PsatRow, ShieldingOrder,
};
use crate::temperature::TemperatureDriverConfig;


/// Complete description of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub geometry: GeometryConfig,
    pub material: MaterialConfig,
    pub sizes: SizeGridConfig,
    pub initial: InitialConfig,
    pub temperature: TemperatureConfig,
    pub radiation: RadiationConfig,
    pub phase: PhaseConfig,
    pub sublimation: SublimationConfig,
    pub collisions: CollisionConfig,
    pub size_floor: SizeFloorConfig,
    pub shielding: ShieldingConfig,
    pub blowout: BlowoutConfig,
    pub sinks: SinksConfig,
    pub supply: SupplyConfig,
    pub numerics: NumericsConfig,
    pub budget: BudgetConfig,
    pub seed: Seed,
}

/// RNG seed for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u64);

impl Default for Seed {
    fn default() -> Self {
        Self(DEFAULT_SEED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Orbital radius in Mars radii, used when `r_m` is absent
    pub r_mars_radii: f64,
    /// Orbital radius in metres
    pub r_m: Option<f64>,
    /// Annulus width as a fraction of the radius
    pub width_fraction: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            r_mars_radii: 2.0,
            r_m: None,
            width_fraction: 0.1,
        }
    }
}

impl GeometryConfig {
    pub fn radius(&self) -> Length {
        match self.r_m {
            Some(r) => Length::from_m(r),
            None => Length::from_mars_radii(self.r_mars_radii),
        }
    }

    pub fn width(&self) -> Length {
        self.radius() * self.width_fraction
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Grain bulk density (kg/m³)
    pub density_kg_m3: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            density_kg_m3: 3000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeGridConfig {
    pub s_min_m: f64,
    pub s_max_m: f64,
    pub n_bins: usize,
}

impl Default for SizeGridConfig {
    fn default() -> Self {
        Self {
            s_min_m: 1.0e-7,
            s_max_m: 3.0,
            n_bins: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConfig {
    /// Total solid mass in Mars masses
    pub mass_total_mars_masses: f64,
    /// Slope q of dn/ds ∝ s^(-q)
    pub q: f64,
    /// Smallest initially populated size, defaults to the grid minimum
    pub s_min_m: Option<f64>,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            mass_total_mars_masses: 1.0e-5,
            q: 3.5,
            s_min_m: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    pub driver: TemperatureDriverConfig,
    /// Mean absorption efficiency of the grains
    pub q_abs_mean: f64,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            driver: TemperatureDriverConfig::default(),
            q_abs_mean: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiationConfig {
    pub use_mars_rp: bool,
    /// Accepted for compatibility and ignored
    pub use_solar_rp: bool,
    /// Radiation pressure efficiency Q_pr
    pub qpr: f64,
    pub beta_threshold: f64,
    pub chi_blow: ChiBlow,
    /// Fixed β for every bin
    pub beta_override: Option<f64>,
    pub tau_gate: TauGateConfig,
}

impl Default for RadiationConfig {
    fn default() -> Self {
        Self {
            use_mars_rp: true,
            use_solar_rp: false,
            qpr: 1.0,
            beta_threshold: BLOWOUT_BETA_THRESHOLD,
            chi_blow: ChiBlow::default(),
            beta_override: None,
            tau_gate: TauGateConfig::default(),
        }
    }
}

/// Suppresses blow-out while the line of sight is optically thick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TauGateConfig {
    pub enabled: bool,
    pub tau_max: f64,
}

impl Default for TauGateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tau_max: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    pub enabled: bool,
    pub t_condense_k: f64,
    pub t_vaporize_k: f64,
    pub p_ref_bar: f64,
    pub tau_ref: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            t_condense_k: 1700.0,
            t_vaporize_k: 2000.0,
            p_ref_bar: 1.0,
            tau_ref: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SublimationConfig {
    pub enabled: bool,
    pub psat_model: PsatModel,
    pub clausius: ClausiusCoefficients,
    pub liquid_branch: Option<LiquidBranch>,
    pub psat_table: Vec<PsatRow>,
    pub local_fit_window_k: f64,
    pub min_points_local_fit: usize,
    /// Evaporation coefficient α
    pub alpha_evap: f64,
    /// Molar mass of the vapor (kg/mol)
    pub mu_kg_mol: f64,
    /// Ambient gas pressure (Pa)
    pub p_gas_pa: f64,
}

impl Default for SublimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            psat_model: PsatModel::Auto,
            clausius: ClausiusCoefficients {
                a: 13.613,
                b: 17_850.0,
            },
            liquid_branch: None,
            psat_table: Vec::new(),
            local_fit_window_k: 300.0,
            min_points_local_fit: 3,
            alpha_evap: 0.007,
            mu_kg_mol: 0.044_084_9,
            p_gas_pa: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub enabled: bool,
    /// Fragment slope q_frag
    pub fragment_q: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fragment_q: 3.5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeFloorConfig {
    pub surface_energy: SurfaceEnergyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldingConfig {
    pub enabled: bool,
    pub order: ShieldingOrder,
    pub kappa_vapor_m2_kg: f64,
    pub los: LosGeometry,
}

impl Default for ShieldingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: ShieldingOrder::default(),
            kappa_vapor_m2_kg: 0.0,
            los: LosGeometry::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlowoutConfig {
    pub enabled: bool,
    pub gate_mode: GateMode,
    pub target_phase: TargetPhase,
    pub layer: BlowoutLayer,
    pub fast_blowout: FastBlowoutConfig,
}

impl Default for BlowoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gate_mode: GateMode::default(),
            target_phase: TargetPhase::default(),
            layer: BlowoutLayer::default(),
            fast_blowout: FastBlowoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastBlowoutConfig {
    pub enabled: bool,
    pub threshold: f64,
    pub strict: bool,
    pub strict_threshold: f64,
}

impl Default for FastBlowoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: FAST_BLOWOUT_THRESHOLD,
            strict: false,
            strict_threshold: FAST_BLOWOUT_STRICT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
    pub gas_drag: GasDragConfig,
    pub hydro_escape: HydroEscapeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyConfig {
    pub mode: SupplyMode,
    pub epsilon_mix: f64,
    /// Log-normal jitter width, zero for a deterministic rate
    pub jitter_sigma: f64,
    /// Injection slope q_inj
    pub q_inj: f64,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            mode: SupplyMode::None,
            epsilon_mix: 1.0,
            jitter_sigma: 0.0,
            q_inj: 3.5,
        }
    }
}

/// Step size policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StepSize {
    Fixed { seconds: f64 },
    /// Fraction of the fastest timescale at t = 0
    Auto,
}

impl Default for StepSize {
    fn default() -> Self {
        Self::Fixed { seconds: 60_000.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericsConfig {
    pub t_end_years: Option<f64>,
    pub t_end_orbits: Option<f64>,
    pub dt: StepSize,
    /// Fraction of the fastest timescale used by `auto` steps
    pub safety: f64,
    pub max_steps: Option<u64>,
    /// Run stops once mass falls below this fraction of the initial mass
    pub mass_floor_fraction: f64,
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            t_end_years: None,
            t_end_orbits: None,
            dt: StepSize::default(),
            safety: 0.1,
            max_steps: None,
            mass_floor_fraction: 1e-12,
        }
    }
}

impl NumericsConfig {
    const DEFAULT_T_END_YEARS: f64 = 2.0;

    /// Integration horizon. Orbits are counted at the disk's Ω.
    pub fn horizon(&self, omega: AngularVelocity) -> Result<Time, ConfigError> {
        let t_end = match (self.t_end_years, self.t_end_orbits) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::invalid(
                    "numerics.t_end_years",
                    "set either t_end_years or t_end_orbits, not both",
                ));
            }
            (Some(years), None) => Time::from_years(years),
            (None, Some(orbits)) => omega.period() * orbits,
            (None, None) => Time::from_years(Self::DEFAULT_T_END_YEARS),
        };
        let seconds = t_end.to_seconds();
        if !(seconds > 0.0 && seconds.is_finite()) {
            return Err(ConfigError::invalid(
                "numerics.t_end_years",
                format!("horizon must be positive and finite, got {seconds} s"),
            ));
        }
        Ok(t_end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub tolerance_percent: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            tolerance_percent: MASS_BUDGET_TOLERANCE_PERCENT,
        }
    }
}

fn require(ok: bool, field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, reason))
    }
}

fn positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

fn non_negative(value: f64) -> bool {
    value >= 0.0 && value.is_finite()
}

impl RunConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every cross-field constraint the integrator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.geometry.radius().to_m();
        require(
            radius > R_MARS && radius.is_finite(),
            "geometry.r_mars_radii",
            format!("orbit must lie outside Mars, got r = {radius} m"),
        )?;
        require(
            positive(self.geometry.width_fraction) && self.geometry.width_fraction <= 1.0,
            "geometry.width_fraction",
            "width fraction must lie in (0, 1]",
        )?;
        require(
            positive(self.material.density_kg_m3),
            "material.density_kg_m3",
            "grain density must be positive",
        )?;
        require(
            positive(self.sizes.s_min_m) && self.sizes.s_max_m > self.sizes.s_min_m,
            "sizes",
            format!(
                "need 0 < s_min < s_max, got [{}, {}] m",
                self.sizes.s_min_m, self.sizes.s_max_m
            ),
        )?;
        require(self.sizes.n_bins > 0, "sizes.n_bins", "need at least one bin")?;
        require(
            positive(self.initial.mass_total_mars_masses),
            "initial.mass_total_mars_masses",
            format!(
                "initial mass must be positive, got {}",
                self.initial.mass_total_mars_masses
            ),
        )?;
        if let Some(s) = self.initial.s_min_m {
            require(
                positive(s) && s < self.sizes.s_max_m,
                "initial.s_min_m",
                "initial lower size must lie below the grid maximum",
            )?;
        }

        self.temperature.driver.validate()?;
        require(
            positive(self.temperature.q_abs_mean),
            "temperature.q_abs_mean",
            "absorption efficiency must be positive",
        )?;

        let rad = &self.radiation;
        require(positive(rad.qpr), "radiation.qpr", "Q_pr must be positive")?;
        require(
            positive(rad.beta_threshold),
            "radiation.beta_threshold",
            "β threshold must be positive",
        )?;
        if let ChiBlow::Fixed(chi) = rad.chi_blow {
            require(positive(chi), "radiation.chi_blow", "χ must be positive")?;
        }
        if let Some(beta) = rad.beta_override {
            require(non_negative(beta), "radiation.beta_override", "β must be >= 0")?;
        }
        require(
            positive(rad.tau_gate.tau_max),
            "radiation.tau_gate.tau_max",
            "τ_max must be positive",
        )?;

        let phase = &self.phase;
        require(
            positive(phase.t_condense_k) && phase.t_vaporize_k > phase.t_condense_k,
            "phase.t_vaporize_k",
            format!(
                "need 0 < T_condense < T_vaporize, got {} K and {} K",
                phase.t_condense_k, phase.t_vaporize_k
            ),
        )?;

        let sub = &self.sublimation;
        require(
            positive(sub.alpha_evap) && sub.alpha_evap <= 1.0,
            "sublimation.alpha_evap",
            "evaporation coefficient must lie in (0, 1]",
        )?;
        require(positive(sub.mu_kg_mol), "sublimation.mu_kg_mol", "molar mass must be positive")?;
        require(non_negative(sub.p_gas_pa), "sublimation.p_gas_pa", "gas pressure must be >= 0")?;

        require(
            self.collisions.fragment_q < 4.0 && self.collisions.fragment_q.is_finite(),
            "collisions.fragment_q",
            format!(
                "fragment slope must be finite and below 4, got {}",
                self.collisions.fragment_q
            ),
        )?;
        require(
            non_negative(self.shielding.kappa_vapor_m2_kg),
            "shielding.kappa_vapor_m2_kg",
            "vapor opacity must be >= 0",
        )?;

        let fast = &self.blowout.fast_blowout;
        require(
            non_negative(fast.threshold),
            "blowout.fast_blowout.threshold",
            format!("threshold must be finite and non-negative, got {}", fast.threshold),
        )?;
        require(
            non_negative(fast.strict_threshold),
            "blowout.fast_blowout.strict_threshold",
            format!(
                "strict threshold must be finite and non-negative, got {}",
                fast.strict_threshold
            ),
        )?;

        let drag = &self.sinks.gas_drag;
        if drag.enabled {
            require(
                positive(drag.rho_gas_kg_m3) && positive(drag.sound_speed_m_s),
                "sinks.gas_drag",
                "gas density and sound speed must be positive",
            )?;
        }
        let escape = &self.sinks.hydro_escape;
        if escape.enabled {
            require(
                non_negative(escape.strength_per_s)
                    && positive(escape.t_ref_k)
                    && escape.temp_power.is_finite()
                    && non_negative(escape.f_vap_floor),
                "sinks.hydro_escape",
                "escape parameters must be finite with positive T_ref",
            )?;
        }

        self.supply.mode.validate()?;
        require(non_negative(self.supply.epsilon_mix), "supply.epsilon_mix", "must be >= 0")?;
        require(non_negative(self.supply.jitter_sigma), "supply.jitter_sigma", "must be >= 0")?;
        require(
            self.supply.q_inj < 4.0 && self.supply.q_inj.is_finite(),
            "supply.q_inj",
            "injection slope must be finite and below 4",
        )?;

        let numerics = &self.numerics;
        if let StepSize::Fixed { seconds } = numerics.dt {
            require(positive(seconds), "numerics.dt", "fixed step must be positive")?;
        }
        require(
            positive(numerics.safety) && numerics.safety <= 1.0,
            "numerics.safety",
            "safety factor must lie in (0, 1]",
        )?;
        if let Some(max_steps) = numerics.max_steps {
            require(max_steps > 0, "numerics.max_steps", "need at least one step")?;
        }
        require(
            non_negative(numerics.mass_floor_fraction) && numerics.mass_floor_fraction < 1.0,
            "numerics.mass_floor_fraction",
            "must lie in [0, 1)",
        )?;
        let geometry = DiskGeometry::new(self.geometry.radius(), self.geometry.width());
        numerics.horizon(geometry.omega())?;

        require(
            positive(self.budget.tolerance_percent),
            "budget.tolerance_percent",
            "tolerance must be positive",
        )?;
        Ok(())
    }
}
