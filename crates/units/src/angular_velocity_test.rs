use approx::assert_relative_eq;

use crate::angular_velocity::AngularVelocity;

#[test]
fn test_period_from_angular_velocity() {
    let omega = AngularVelocity::from_rad_per_sec(std::f64::consts::TAU / 3600.0);
    assert_relative_eq!(omega.period().to_hours(), 1.0, epsilon = 1e-12);
}
