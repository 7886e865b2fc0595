use approx::assert_relative_eq;

use crate::mass::{MARS_MASS_KG, Mass};

#[test]
fn test_mass_conversions() {
    let disk = Mass::from_mars_masses(1e-6);
    assert_relative_eq!(disk.to_kg(), 1e-6 * MARS_MASS_KG);
    assert_relative_eq!(disk.to_mars_masses(), 1e-6);

    let grams = Mass::from_grams(2_500.0);
    assert_relative_eq!(grams.to_kg(), 2.5);
    assert_relative_eq!(grams.to_grams(), 2_500.0);
}

#[test]
fn test_mass_sum_and_ratio() {
    let bins = [Mass::from_kg(1.0), Mass::from_kg(2.0), Mass::from_kg(3.5)];
    let total: Mass = bins.iter().copied().sum();
    assert_relative_eq!(total.to_kg(), 6.5);
    assert_relative_eq!(bins[1] / total, 2.0 / 6.5);
    assert!(Mass::zero().is_zero());
}
