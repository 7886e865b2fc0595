//! Single-zone disk geometry around Mars.

use serde::{Deserialize, Serialize};
use units::{AngularVelocity, Length, Mass, SurfaceDensity, Velocity};

use crate::constants::{G, M_MARS, PI};

/// Annulus representing the whole disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskGeometry {
    /// Orbital radius of the annulus centre
    pub radius: Length,
    /// Radial width of the annulus
    pub width: Length,
}

impl DiskGeometry {
    pub fn new(radius: Length, width: Length) -> Self {
        Self { radius, width }
    }

    /// Keplerian angular velocity Ω = sqrt(G M / r³)
    pub fn omega(&self) -> AngularVelocity {
        let r = self.radius.to_m();
        AngularVelocity::from_rad_per_sec((G * M_MARS / (r * r * r)).sqrt())
    }

    /// Keplerian orbital speed v_K = Ω r
    pub fn keplerian_velocity(&self) -> Velocity {
        Velocity::from_m_per_sec(self.omega().to_rad_per_sec() * self.radius.to_m())
    }

    /// Annulus area 2π r Δr (m²)
    pub fn area_m2(&self) -> f64 {
        2.0 * PI * self.radius.to_m() * self.width.to_m()
    }

    pub fn surface_density(&self, mass: Mass) -> SurfaceDensity {
        SurfaceDensity::from_mass_over_area(mass, self.area_m2())
    }
}
