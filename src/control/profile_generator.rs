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

use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::MAX_PROFILE_SAMPLE;
use crate::control::math_tool::rotation_to_radian;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ProfileParameters {
    // Start position in rotation.
    pub start_position: f64,
    // Cruise velocity in rotation/s. The sign is the direction.
    pub cruise_velocity: f64,
    // Time to ramp up from rest to the cruise velocity in second. The ramp
    // down takes the same time.
    pub ramp_time: f64,
    // Time at the cruise velocity in second.
    pub cruise_time: f64,
    // Sample rate of the setpoints in Hz.
    pub sample_rate: f64,
}

impl ProfileParameters {
    /// Create the parameters of a profile without the cruise phase.
    ///
    /// # Arguments
    /// * `start_position` - Start position in rotation.
    /// * `cruise_velocity` - Cruise velocity in rotation/s.
    /// * `ramp_time` - Ramp time in second.
    /// * `sample_rate` - Sample rate in Hz.
    ///
    /// # Returns
    /// New profile parameters.
    pub fn new(
        start_position: f64,
        cruise_velocity: f64,
        ramp_time: f64,
        sample_rate: f64,
    ) -> Self {
        Self {
            start_position,
            cruise_velocity,
            ramp_time,
            cruise_time: 0.0,
            sample_rate,
        }
    }

    /// Set the cruise time.
    ///
    /// # Arguments
    /// * `cruise_time` - Cruise time in second.
    ///
    /// # Returns
    /// Updated profile parameters.
    pub fn with_cruise_time(mut self, cruise_time: f64) -> Self {
        self.cruise_time = cruise_time;
        self
    }

    /// The parameters can generate a profile or not.
    ///
    /// # Returns
    /// True if the parameters are usable. Otherwise, false.
    pub fn is_valid(&self) -> bool {
        self.start_position.is_finite()
            && self.cruise_velocity.is_finite()
            && self.ramp_time.is_finite()
            && (self.ramp_time >= 0.0)
            && self.cruise_time.is_finite()
            && (self.cruise_time >= 0.0)
            && self.sample_rate.is_finite()
            && (self.sample_rate > 0.0)
    }

    /// Number of samples in a phase.
    ///
    /// # Arguments
    /// * `duration` - Duration of the phase in second.
    ///
    /// # Returns
    /// Number of samples. None if it is more than the maximum samples of a
    /// profile.
    fn number_of_samples(&self, duration: f64) -> Option<usize> {
        let num_sample = (duration * self.sample_rate).round();
        if num_sample.is_finite() && (num_sample <= MAX_PROFILE_SAMPLE as f64) {
            Some(num_sample as usize)
        } else {
            None
        }
    }

    /// Number of samples in the ramp and cruise phases.
    ///
    /// # Returns
    /// Numbers of samples of the ramp and cruise phases. None if the whole
    /// profile is more than the maximum samples of a profile.
    fn number_of_samples_phases(&self) -> Option<(usize, usize)> {
        let num_sample_ramp = self.number_of_samples(self.ramp_time)?;
        let num_sample_cruise = self.number_of_samples(self.cruise_time)?;

        num_sample_ramp
            .checked_mul(2)
            .and_then(|num| num.checked_add(num_sample_cruise))
            .filter(|num| *num <= MAX_PROFILE_SAMPLE)
            .map(|_| (num_sample_ramp, num_sample_cruise))
    }
}

/// Setpoints of a single axis sampled at a fixed interval. The profile is
/// consumed once in order.
#[derive(Clone, PartialEq, Debug)]
pub struct MotionProfile {
    // Absolute position setpoints in radian.
    _setpoints: Vec<f64>,
    _sample_interval: Duration,
    pub num_sample_acceleration: usize,
    pub num_sample_cruise: usize,
    pub num_sample_deceleration: usize,
}

impl MotionProfile {
    /// Create an empty profile, which means no motion.
    ///
    /// # Arguments
    /// * `sample_interval` - Sample interval.
    ///
    /// # Returns
    /// Empty profile.
    pub fn empty(sample_interval: Duration) -> Self {
        Self {
            _setpoints: Vec::new(),
            _sample_interval: sample_interval,
            num_sample_acceleration: 0,
            num_sample_cruise: 0,
            num_sample_deceleration: 0,
        }
    }

    /// Get the number of setpoints.
    pub fn len(&self) -> usize {
        self._setpoints.len()
    }

    /// The profile has no setpoint or not.
    pub fn is_empty(&self) -> bool {
        self._setpoints.is_empty()
    }

    /// Get the sample interval.
    pub fn sample_interval(&self) -> Duration {
        self._sample_interval
    }

    /// Get the setpoints in radian.
    pub fn setpoints(&self) -> &[f64] {
        &self._setpoints
    }

    /// Get the final setpoint in radian.
    ///
    /// # Returns
    /// Final setpoint. None if the profile is empty.
    pub fn last_setpoint(&self) -> Option<f64> {
        self._setpoints.last().copied()
    }
}

impl IntoIterator for MotionProfile {
    type Item = f64;
    type IntoIter = std::vec::IntoIter<f64>;

    fn into_iter(self) -> Self::IntoIter {
        self._setpoints.into_iter()
    }
}

/// Generate the trapezoidal position profile: uniform acceleration from rest
/// to the cruise velocity, optional constant velocity, and the symmetric
/// deceleration back to rest.
///
/// # Arguments
/// * `parameters` - Profile parameters.
/// * `full_rotation` - One full rotation in radian.
///
/// # Returns
/// Motion profile in radian. It is empty if there is no motion or the
/// parameters are degenerate.
pub fn generate_profile(parameters: &ProfileParameters, full_rotation: f64) -> MotionProfile {
    if !parameters.is_valid() {
        warn!("Degenerate profile parameters: {parameters:?}. No motion is generated.");
        return MotionProfile::empty(Duration::ZERO);
    }

    let (num_sample_ramp, num_sample_cruise) = match parameters.number_of_samples_phases() {
        Some(num_samples) => num_samples,
        None => {
            warn!(
                "Profile is longer than {MAX_PROFILE_SAMPLE} samples: {parameters:?}. No motion is generated."
            );
            return MotionProfile::empty(Duration::ZERO);
        }
    };

    let sample_interval = 1.0 / parameters.sample_rate;

    // Ramp samples only exist when the ramp time is positive.
    let acceleration = if num_sample_ramp > 0 {
        parameters.cruise_velocity / parameters.ramp_time
    } else {
        0.0
    };

    let start = parameters.start_position;
    let velocity = parameters.cruise_velocity;

    let mut positions: Vec<f64> = Vec::with_capacity(2 * num_sample_ramp + num_sample_cruise);

    // Acceleration phase
    for idx in 0..num_sample_ramp {
        let t = (idx as f64) * sample_interval;
        positions.push(start + 0.5 * acceleration * t.powi(2));
    }

    // Constant velocity phase
    let distance_ramp = 0.5 * velocity * parameters.ramp_time;
    for idx in 0..num_sample_cruise {
        let t = (idx as f64) * sample_interval;
        positions.push(start + distance_ramp + velocity * t);
    }

    // Deceleration phase, mirrored from the acceleration
    let position_anchor = positions.last().copied().unwrap_or(start);
    for idx in 0..num_sample_ramp {
        let t = (idx as f64) * sample_interval;
        positions.push(position_anchor + velocity * t - 0.5 * acceleration * t.powi(2));
    }

    MotionProfile {
        _setpoints: positions
            .iter()
            .map(|position| rotation_to_radian(*position, full_rotation))
            .collect(),
        _sample_interval: Duration::from_secs_f64(sample_interval),
        num_sample_acceleration: num_sample_ramp,
        num_sample_cruise,
        num_sample_deceleration: num_sample_ramp,
    }
}
