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

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{FULL_ROTATION, LEGACY_FULL_ROTATION};
use crate::control::axis::AxisSettings;
use crate::control::convergence::ConvergenceController;
use crate::control::profile_generator::ProfileParameters;
use crate::control::waypoint::Waypoint;
use crate::enums::MotionMode;
use crate::interface::actuator_port::AxisId;
use crate::utility::{
    get_parameter, get_parameter_array, get_parameter_duration, get_parameter_matrix,
};

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Config {
    // Configuration filename.
    pub filename: String,
    // Actuators on the field bus. The order is the column order of the
    // waypoint positions.
    pub axis_ids: Vec<AxisId>,
    // One full rotation in radian.
    pub full_rotation: f64,
    // Gains and velocity limit applied at startup.
    pub axis_settings: AxisSettings,
    // Settle time after zeroing each actuator.
    pub settle_time_zeroing: Duration,
    // Settle time after zeroing all the actuators.
    pub settle_time_startup: Duration,
    // Convergence controller of the waypoint moves.
    pub convergence: ConvergenceController,
    pub motion_mode: MotionMode,
    pub waypoints: Vec<Waypoint>,
    // Profile of the profile mode. The start position is the reference
    // position of each actuator after zeroing.
    pub profile: ProfileParameters,
}

impl Config {
    /// Create a new config object.
    ///
    /// # Arguments
    /// * `filepath` - The path to the application parameters file.
    ///
    /// # Returns
    /// A new config object.
    ///
    /// # Panics
    /// If a parameter is missing or invalid.
    pub fn new(filepath: &Path) -> Self {
        let axis_ids: Vec<AxisId> = get_parameter_array(filepath, "axis_ids");

        let use_legacy_full_rotation: bool = get_parameter(filepath, "use_legacy_full_rotation");
        let full_rotation = if use_legacy_full_rotation {
            LEGACY_FULL_ROTATION
        } else {
            FULL_ROTATION
        };

        let polling_interval = get_parameter_duration(filepath, "polling_interval");
        assert!(
            !polling_interval.is_zero(),
            "polling_interval should be positive."
        );

        Self {
            filename: String::from(filepath.to_str().expect(&format!(
                "Should be able to convert {:?} to a string",
                filepath
            ))),

            waypoints: Self::read_waypoints(filepath, &axis_ids),
            axis_ids: axis_ids,

            full_rotation: full_rotation,

            axis_settings: AxisSettings {
                velocity_limit: get_parameter(filepath, "velocity_limit"),
                gain_position_loop: get_parameter(filepath, "gain_position_loop"),
                gain_velocity_loop: get_parameter(filepath, "gain_velocity_loop"),
            },

            settle_time_zeroing: get_parameter_duration(filepath, "settle_time_zeroing"),
            settle_time_startup: get_parameter_duration(filepath, "settle_time_startup"),

            convergence: ConvergenceController::new(
                get_parameter(filepath, "tolerance"),
                get_parameter_duration(filepath, "timeout"),
                polling_interval,
                full_rotation,
            ),

            motion_mode: get_parameter(filepath, "motion_mode"),

            profile: ProfileParameters::new(
                0.0,
                get_parameter(filepath, "cruise_velocity"),
                get_parameter(filepath, "ramp_time"),
                get_parameter(filepath, "sample_rate"),
            )
            .with_cruise_time(get_parameter(filepath, "cruise_time")),
        }
    }

    /// Read the waypoints from the configuration file.
    ///
    /// # Arguments
    /// * `filepath` - The path to the application parameters file.
    /// * `axis_ids` - Actuator identifiers.
    ///
    /// # Returns
    /// Waypoints in order.
    fn read_waypoints(filepath: &Path, axis_ids: &[AxisId]) -> Vec<Waypoint> {
        let positions: Vec<Vec<f64>> = get_parameter_matrix(filepath, "waypoint_positions");
        let dwell_times: Vec<f64> = get_parameter_array(filepath, "waypoint_dwell_times");
        assert_eq!(
            positions.len(),
            dwell_times.len(),
            "Each waypoint should have one dwell time."
        );

        positions
            .iter()
            .zip(dwell_times.iter())
            .map(|(degrees, dwell_time)| {
                assert!(
                    dwell_time.is_finite() && (*dwell_time >= 0.0),
                    "Dwell time should be non-negative."
                );
                Waypoint::new(axis_ids, degrees, Duration::from_secs_f64(*dwell_time))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use tempfile::Builder;

    fn write_config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("Should create the temporary file.");
        file.write_all(content.as_bytes())
            .expect("Should write the temporary file.");

        file
    }

    fn replace_key(key: &str, value: &str) -> String {
        std::fs::read_to_string("config/parameters_app.yaml")
            .expect("Should read the default configuration.")
            .lines()
            .map(|line| {
                if line.starts_with(&format!("{key}:")) {
                    format!("{key}: {value}")
                } else {
                    String::from(line)
                }
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    #[test]
    fn test_new() {
        let config = Config::new(Path::new("config/parameters_app.yaml"));

        assert_eq!(config.filename, "config/parameters_app.yaml");
        assert_eq!(config.axis_ids, vec![127, 17]);
        assert_eq!(config.full_rotation, FULL_ROTATION);

        assert_eq!(config.axis_settings, AxisSettings::default());

        assert_eq!(config.settle_time_zeroing, Duration::from_millis(100));
        assert_eq!(config.settle_time_startup, Duration::from_millis(500));

        assert_eq!(config.convergence, ConvergenceController::default());

        assert_eq!(config.motion_mode, MotionMode::Waypoint);

        assert_eq!(
            config.waypoints,
            vec![
                Waypoint::new(&[127, 17], &[236.0, 144.0], Duration::from_millis(100)),
                Waypoint::new(&[127, 17], &[359.0, 240.0], Duration::from_millis(100)),
            ]
        );

        assert_eq!(
            config.profile,
            ProfileParameters::new(0.0, 8.0, 1.0, 100.0)
        );
    }

    #[test]
    fn test_new_legacy_full_rotation() {
        let file = write_config_file(&replace_key("use_legacy_full_rotation", "true"));
        let config = Config::new(file.path());

        assert_eq!(config.full_rotation, LEGACY_FULL_ROTATION);
        assert_eq!(config.convergence.full_rotation, LEGACY_FULL_ROTATION);
    }

    #[test]
    fn test_new_profile_mode() {
        let file = write_config_file(&replace_key("motion_mode", "profile"));

        assert_eq!(Config::new(file.path()).motion_mode, MotionMode::Profile);
    }

    #[test]
    #[should_panic(expected = "Each waypoint should have one dwell time.")]
    fn test_new_panic_dwell_time() {
        let file = write_config_file(&replace_key("waypoint_dwell_times", "[0.1]"));

        Config::new(file.path());
    }

    #[test]
    #[should_panic(expected = "polling_interval should be positive.")]
    fn test_new_panic_polling_interval() {
        let file = write_config_file(&replace_key("polling_interval", "0.0"));

        Config::new(file.path());
    }
}
