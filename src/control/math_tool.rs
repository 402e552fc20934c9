// This file is part of run_joint_controller.
//
// Developed for the Vera Rubin Observatory Systems.
// This product includes software developed by the LSST Project
// (https://www.lsst.org).
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::constants::DEGREE_PER_ROTATION;

/// Clip the value between the lower and upper bounds.
///
/// # Arguments
/// * `value` - The value to be clipped.
/// * `lower` - The lower bound.
/// * `upper` - The upper bound.
///
/// # Returns
/// The clipped value.
pub fn clip<T>(value: T, lower: T, upper: T) -> T
where
    T: PartialOrd,
{
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}

/// Convert the angle from degree to radian.
///
/// # Arguments
/// * `degree` - Angle in degree.
/// * `full_rotation` - One full rotation in radian.
///
/// # Returns
/// Angle in radian.
pub fn degree_to_radian(degree: f64, full_rotation: f64) -> f64 {
    degree * full_rotation / DEGREE_PER_ROTATION
}

/// Convert the angle from radian to degree.
///
/// # Arguments
/// * `radian` - Angle in radian.
/// * `full_rotation` - One full rotation in radian.
///
/// # Returns
/// Angle in degree.
pub fn radian_to_degree(radian: f64, full_rotation: f64) -> f64 {
    radian * DEGREE_PER_ROTATION / full_rotation
}

/// Convert the angle from rotation to radian.
///
/// # Arguments
/// * `rotation` - Angle in rotation.
/// * `full_rotation` - One full rotation in radian.
///
/// # Returns
/// Angle in radian.
pub fn rotation_to_radian(rotation: f64, full_rotation: f64) -> f64 {
    rotation * full_rotation
}

/// Convert the angle from radian to rotation.
///
/// # Arguments
/// * `radian` - Angle in radian.
/// * `full_rotation` - One full rotation in radian.
///
/// # Returns
/// Angle in rotation.
pub fn radian_to_rotation(radian: f64, full_rotation: f64) -> f64 {
    radian / full_rotation
}

/// Wrap the angle into [0, full_rotation).
///
/// # Arguments
/// * `radian` - Angle in radian.
/// * `full_rotation` - One full rotation in radian.
///
/// # Returns
/// Wrapped angle in radian.
pub fn wrap_radian(radian: f64, full_rotation: f64) -> f64 {
    radian.rem_euclid(full_rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::constants::{FULL_ROTATION, LEGACY_FULL_ROTATION};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_clip() {
        assert_eq!(clip(10.0, -3.0, 5.0), 5.0);
        assert_eq!(clip(-10.0, -3.0, 5.0), -3.0);
        assert_eq!(clip(3.0, -3.0, 5.0), 3.0);
    }

    #[test]
    fn test_degree_to_radian() {
        assert_relative_eq!(
            degree_to_radian(180.0, FULL_ROTATION),
            std::f64::consts::PI,
            epsilon = EPSILON
        );
        assert_relative_eq!(
            degree_to_radian(23.0, LEGACY_FULL_ROTATION),
            23.0 * 6.28318 / 360.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_radian_to_degree() {
        assert_relative_eq!(
            radian_to_degree(std::f64::consts::FRAC_PI_2, FULL_ROTATION),
            90.0,
            epsilon = EPSILON
        );
        assert_relative_eq!(
            radian_to_degree(LEGACY_FULL_ROTATION, LEGACY_FULL_ROTATION),
            360.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_degree_radian_round_trip() {
        for full_rotation in [FULL_ROTATION, LEGACY_FULL_ROTATION] {
            for degree in [-720.0, -153.0, 0.0, 2.0, 23.0, 144.0, 236.0, 359.0, 1000.5] {
                assert_relative_eq!(
                    radian_to_degree(degree_to_radian(degree, full_rotation), full_rotation),
                    degree,
                    epsilon = EPSILON
                );
            }
        }
    }

    #[test]
    fn test_rotation_and_radian() {
        assert_relative_eq!(rotation_to_radian(1.5, FULL_ROTATION), 3.0 * std::f64::consts::PI);
        assert_relative_eq!(radian_to_rotation(3.0 * std::f64::consts::PI, FULL_ROTATION), 1.5);
    }

    #[test]
    fn test_wrap_radian() {
        assert_relative_eq!(
            wrap_radian(FULL_ROTATION + 1.0, FULL_ROTATION),
            1.0,
            epsilon = EPSILON
        );
        assert_relative_eq!(
            wrap_radian(-1.0, FULL_ROTATION),
            FULL_ROTATION - 1.0,
            epsilon = EPSILON
        );
        assert_eq!(wrap_radian(0.0, FULL_ROTATION), 0.0);
    }
}
