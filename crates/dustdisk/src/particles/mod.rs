//! Particle populations of the single-zone disk.
//!
//! Solids are tracked as mass per logarithmic size bin. The size floor sets
//! the lower bound of every integral over the distribution, and the supply
//! module injects fresh material into the active bins.

mod size_distribution;
mod size_floor;
mod supply;


pub use size_distribution::{ActiveSummary, SizeBins, power_law_mass_integral};
pub use size_floor::{
    FloorSource, SizeFloor, SizeFloorModel, SurfaceEnergyConfig, relative_velocity,
    surface_energy_floor,
};
pub use supply::{SupplyMode, SupplyRow, SupplySegment, SupplySource};
