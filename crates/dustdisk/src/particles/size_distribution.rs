//! Binned particle-size distribution.
//!
//! Bins are logarithmically spaced between `s_min` and `s_max`. Each bin
//! carries a mass; the total solid mass of the disk is always the sum of the
//! bins and is never stored separately.
//!
//! # Physics
//!
//! For a number distribution dn/ds ∝ s^(-q), the mass between sizes a and b
//! scales as ∫ s^(3-q) ds. With q = 3.5 (Dohnanyi 1969) most mass sits in the
//! largest grains while most cross-section sits in the smallest.
//!
//! The geometric opacity of a bin is its cross-section per unit mass:
//!
//! ```text
//! κ_i = π s² / (4/3 π ρ s³) = 3 / (4 ρ s)
//! ```

use serde::{Deserialize, Serialize};
use units::{Density, Length, Mass};

use crate::constants::PI;
use crate::error::ConfigError;

/// Integral ∫_a^b s^(3-q) ds, the mass weight of a power-law slice.
pub fn power_law_mass_integral(a: f64, b: f64, q: f64) -> f64 {
    if b <= a {
        return 0.0;
    }
    let k = 4.0 - q;
    if k.abs() < 1e-12 {
        (b / a).ln()
    } else {
        (b.powf(k) - a.powf(k)) / k
    }
}

/// Mass and opacity of the part of the distribution above the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveSummary {
    /// Mass above the floor (kg)
    pub mass_kg: f64,
    /// Geometric mass opacity κ (m²/kg)
    pub kappa_m2_kg: f64,
}

/// Mass per logarithmic size bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBins {
    /// Bin edges (m), length N+1
    edges: Vec<f64>,
    /// Geometric bin centres (m), length N
    centres: Vec<f64>,
    /// Mass per bin (kg), length N
    mass: Vec<f64>,
    /// Grain bulk density (kg/m³)
    material_density: f64,
}

impl SizeBins {
    /// Creates empty, logarithmically spaced bins.
    pub fn log_spaced(
        s_min: Length,
        s_max: Length,
        n_bins: usize,
        material_density: Density,
    ) -> Result<Self, ConfigError> {
        let (lo, hi) = (s_min.to_m(), s_max.to_m());
        if !(lo > 0.0 && hi > lo && hi.is_finite()) {
            return Err(ConfigError::invalid(
                "sizes",
                format!("need 0 < s_min < s_max, got [{lo}, {hi}] m"),
            ));
        }
        if n_bins == 0 {
            return Err(ConfigError::invalid("sizes.n_bins", "need at least one bin"));
        }
        let rho = material_density.to_kg_per_m3();
        if !(rho > 0.0 && rho.is_finite()) {
            return Err(ConfigError::invalid(
                "material.density_kg_m3",
                "grain density must be positive",
            ));
        }

        let (log_min, log_max) = (lo.ln(), hi.ln());
        let edges: Vec<f64> = (0..=n_bins)
            .map(|i| {
                let frac = i as f64 / n_bins as f64;
                (log_min + frac * (log_max - log_min)).exp()
            })
            .collect();
        let centres = edges.windows(2).map(|pair| (pair[0] * pair[1]).sqrt()).collect();

        Ok(Self {
            edges,
            centres,
            mass: vec![0.0; n_bins],
            material_density: rho,
        })
    }

    /// Fills the bins with a power-law population of total mass `total`
    /// starting at `lower`.
    pub fn with_power_law(mut self, total: Mass, q: f64, lower: Length) -> Result<Self, ConfigError> {
        let weights = self.power_law_weights(lower.to_m(), q);
        if weights.iter().all(|&w| w == 0.0) {
            return Err(ConfigError::invalid(
                "initial.s_min_m",
                "initial population lies entirely outside the size grid",
            ));
        }
        let total_kg = total.to_kg();
        for (m, w) in self.mass.iter_mut().zip(weights) {
            *m = total_kg * w;
        }
        Ok(self)
    }

    /// Normalised power-law mass weights of the bins above `floor`.
    ///
    /// Returns all zeros when no bin reaches above the floor.
    pub fn power_law_weights(&self, floor: f64, q: f64) -> Vec<f64> {
        let raw: Vec<f64> = self
            .edges
            .windows(2)
            .map(|pair| power_law_mass_integral(pair[0].max(floor), pair[1], q))
            .collect();
        let sum: f64 = raw.iter().sum();
        if sum > 0.0 && sum.is_finite() {
            raw.into_iter().map(|w| w / sum).collect()
        } else {
            vec![0.0; raw.len()]
        }
    }

    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn centres(&self) -> &[f64] {
        &self.centres
    }

    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    pub fn material_density(&self) -> Density {
        Density::from_kg_per_m3(self.material_density)
    }

    pub fn min_size(&self) -> Length {
        Length::from_m(self.edges[0])
    }

    pub fn max_size(&self) -> Length {
        Length::from_m(self.edges[self.edges.len() - 1])
    }

    /// Total solid mass, the sum over all bins.
    pub fn total_mass(&self) -> Mass {
        Mass::from_kg(self.mass.iter().sum())
    }

    /// Mass of a single grain at the bin centre (kg).
    pub fn grain_mass(&self, bin: usize) -> f64 {
        let s = self.centres[bin];
        4.0 / 3.0 * PI * self.material_density * s * s * s
    }

    /// Cross-section per unit mass of the grains in a bin (m²/kg).
    pub fn bin_opacity(&self, bin: usize) -> f64 {
        3.0 / (4.0 * self.material_density * self.centres[bin])
    }

    pub fn add_mass(&mut self, bin: usize, kg: f64) {
        self.mass[bin] += kg;
    }

    /// Removes up to `kg` from a bin and returns what was actually removed.
    pub fn remove_mass(&mut self, bin: usize, kg: f64) -> f64 {
        let taken = kg.clamp(0.0, self.mass[bin]);
        self.mass[bin] -= taken;
        taken
    }

    /// Fraction of a bin's log-width lying above `floor`.
    pub fn active_weight(&self, bin: usize, floor: f64) -> f64 {
        let (lo, hi) = (self.edges[bin], self.edges[bin + 1]);
        if hi <= floor {
            0.0
        } else if lo >= floor {
            1.0
        } else {
            (hi / floor).ln() / (hi / lo).ln()
        }
    }

    /// Mass and opacity integrated from `floor` upward.
    pub fn active_summary(&self, floor: f64) -> ActiveSummary {
        let mut mass = 0.0;
        let mut area = 0.0;
        for bin in 0..self.len() {
            let m = self.mass[bin] * self.active_weight(bin, floor);
            mass += m;
            area += m * self.bin_opacity(bin);
        }
        let kappa = if mass > 0.0 { area / mass } else { 0.0 };
        ActiveSummary {
            mass_kg: mass,
            kappa_m2_kg: kappa,
        }
    }

    /// Empties every bin lying wholly below `floor` and returns the mass taken.
    pub fn retire_below(&mut self, floor: f64) -> f64 {
        let mut retired = 0.0;
        for bin in 0..self.len() {
            if self.edges[bin + 1] <= floor {
                retired += self.mass[bin];
                self.mass[bin] = 0.0;
            }
        }
        retired
    }
}
