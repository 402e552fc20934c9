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

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::clock::Clock;
use crate::constants::{
    DEFAULT_POLLING_INTERVAL_SECOND, DEFAULT_TIMEOUT_SECOND, DEFAULT_TOLERANCE_DEGREE,
    FULL_ROTATION,
};
use crate::control::math_tool::{degree_to_radian, radian_to_degree};
use crate::enums::ParameterName;
use crate::interface::actuator_port::{ActuatorPort, AxisId, BusError};

/// Target positions in degree of the actuators for a single move. Each
/// actuator appears once.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct ConvergenceTarget {
    _targets: BTreeMap<AxisId, f64>,
}

impl ConvergenceTarget {
    /// Create an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target of the actuator. The previous target of the same
    /// actuator is replaced.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    /// * `degree` - Target position in degree.
    ///
    /// # Returns
    /// Previous target in degree if any.
    pub fn insert(&mut self, axis_id: AxisId, degree: f64) -> Option<f64> {
        self._targets.insert(axis_id, degree)
    }

    /// Get the target of the actuator in degree.
    pub fn get(&self, axis_id: AxisId) -> Option<f64> {
        self._targets.get(&axis_id).copied()
    }

    /// Get the number of actuators.
    pub fn len(&self) -> usize {
        self._targets.len()
    }

    /// The target has no actuator or not.
    pub fn is_empty(&self) -> bool {
        self._targets.is_empty()
    }

    /// Iterate the pairs of the actuator identifier and target in degree.
    pub fn iter(&self) -> impl Iterator<Item = (AxisId, f64)> + '_ {
        self._targets.iter().map(|(id, degree)| (*id, *degree))
    }
}

impl FromIterator<(AxisId, f64)> for ConvergenceTarget {
    fn from_iter<I: IntoIterator<Item = (AxisId, f64)>>(iter: I) -> Self {
        Self {
            _targets: iter.into_iter().collect(),
        }
    }
}

/// Outcome of a move. Reaching the timeout is a normal outcome so that the
/// cyclic motion keeps going, but it is reported here.
#[derive(Clone, PartialEq, Debug)]
pub struct ConvergenceResult {
    // All the actuators were in tolerance on the same poll or not.
    pub converged: bool,
    // Time since the first command.
    pub elapsed: Duration,
    pub number_of_polls: usize,
    // Measured positions in degree on the last poll.
    pub measured_degrees: BTreeMap<AxisId, f64>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ConvergenceController {
    // Tolerance of the position error in degree.
    pub tolerance: f64,
    // Maximum time to wait for the convergence.
    pub timeout: Duration,
    // Time between two polls of the positions.
    pub polling_interval: Duration,
    // One full rotation in radian.
    pub full_rotation: f64,
}

impl Default for ConvergenceController {
    fn default() -> Self {
        Self::new(
            DEFAULT_TOLERANCE_DEGREE,
            Duration::from_secs_f64(DEFAULT_TIMEOUT_SECOND),
            Duration::from_secs_f64(DEFAULT_POLLING_INTERVAL_SECOND),
            FULL_ROTATION,
        )
    }
}

impl ConvergenceController {
    /// Create a new convergence controller.
    ///
    /// # Arguments
    /// * `tolerance` - Tolerance of the position error in degree.
    /// * `timeout` - Maximum time to wait for the convergence.
    /// * `polling_interval` - Time between two polls.
    /// * `full_rotation` - One full rotation in radian.
    ///
    /// # Returns
    /// A new convergence controller.
    pub fn new(
        tolerance: f64,
        timeout: Duration,
        polling_interval: Duration,
        full_rotation: f64,
    ) -> Self {
        Self {
            tolerance,
            timeout,
            polling_interval,
            full_rotation,
        }
    }

    /// Move the actuators to the targets and wait until all of them are in
    /// tolerance on the same poll or the timeout is reached.
    ///
    /// # Notes
    /// All the commands are sent before the first poll. Nothing is written
    /// while polling. The total wait is bounded by the timeout plus one
    /// polling interval.
    ///
    /// # Arguments
    /// * `port` - Actuator port.
    /// * `clock` - Clock to time and pace the polls.
    /// * `target` - Target positions in degree.
    ///
    /// # Returns
    /// Outcome of the move.
    ///
    /// # Errors
    /// The first fault of the port. There is no retry.
    pub fn move_to<P: ActuatorPort + ?Sized, C: Clock + ?Sized>(
        &self,
        port: &mut P,
        clock: &mut C,
        target: &ConvergenceTarget,
    ) -> Result<ConvergenceResult, BusError> {
        if target.is_empty() {
            return Ok(ConvergenceResult {
                converged: true,
                elapsed: Duration::ZERO,
                number_of_polls: 0,
                measured_degrees: BTreeMap::new(),
            });
        }

        let start = clock.now();
        for (axis_id, degree) in target.iter() {
            port.write_param(
                axis_id,
                ParameterName::ReferencePosition,
                degree_to_radian(degree, self.full_rotation),
            )?;
        }

        let mut number_of_polls = 0;
        loop {
            let mut measured_degrees = BTreeMap::new();
            let mut is_all_reached = true;
            for (axis_id, degree_target) in target.iter() {
                let degree = radian_to_degree(
                    port.read_param(axis_id, ParameterName::MechanicalPosition)?,
                    self.full_rotation,
                );
                debug!("Actuator {axis_id} position: {degree:.1} degree.");

                // A non-finite reading is never in tolerance.
                if !((degree - degree_target).abs() <= self.tolerance) {
                    is_all_reached = false;
                }

                measured_degrees.insert(axis_id, degree);
            }
            number_of_polls += 1;

            let elapsed = clock.now().saturating_sub(start);
            if is_all_reached || (elapsed > self.timeout) {
                if !is_all_reached {
                    warn!(
                        "Timeout of the convergence after {:.2} second: {measured_degrees:?}.",
                        elapsed.as_secs_f64()
                    );
                }

                return Ok(ConvergenceResult {
                    converged: is_all_reached,
                    elapsed,
                    number_of_polls,
                    measured_degrees,
                });
            }

            clock.sleep(self.polling_interval);
        }
    }
}
