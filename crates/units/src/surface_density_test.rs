use approx::assert_relative_eq;

use crate::mass::Mass;
use crate::surface_density::SurfaceDensity;

#[test]
fn test_surface_density_conversions() {
    let sigma = SurfaceDensity::from_grams_per_cm2(1.0);
    assert_relative_eq!(sigma.to_kg_per_m2(), 10.0);
    assert_relative_eq!(SurfaceDensity::from_kg_per_m2(25.0).to_grams_per_cm2(), 2.5);
}

#[test]
fn test_surface_density_from_mass_over_area() {
    let sigma = SurfaceDensity::from_mass_over_area(Mass::from_kg(1e6), 2e3);
    assert_relative_eq!(sigma.to_kg_per_m2(), 500.0);

    let skin = SurfaceDensity::from_kg_per_m2(100.0);
    assert_eq!(sigma.min(skin), skin);
    assert_relative_eq!(skin / sigma, 0.2);
}
