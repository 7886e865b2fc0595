pub mod angular_velocity;
pub mod density;
pub mod length;
pub mod mass;
pub mod pressure;
pub mod surface_density;
pub mod temperature;
pub mod time;
pub mod velocity;

#[cfg(test)]
mod angular_velocity_test;
#[cfg(test)]
mod mass_test;
#[cfg(test)]
mod surface_density_test;

pub use angular_velocity::AngularVelocity;
pub use density::Density;
pub use length::{Length, MARS_RADIUS_M};
pub use mass::{MARS_MASS_KG, Mass};
pub use pressure::Pressure;
pub use surface_density::SurfaceDensity;
pub use temperature::Temperature;
pub use time::{SECONDS_PER_DAY, SECONDS_PER_YEAR, Time};
pub use velocity::Velocity;
