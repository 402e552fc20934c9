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

use crate::control::math_tool::clip;
use crate::enums::{ParameterName, RunMode};
use crate::mock::mock_constants::{
    MOCK_GAIN_POSITION_LOOP, MOCK_GAIN_VELOCITY_LOOP, MOCK_VELOCITY_LIMIT,
};

#[derive(Clone, Debug)]
pub struct MockActuator {
    pub is_enabled: bool,
    pub run_mode: RunMode,
    // Mechanical position in radian.
    pub mechanical_position: f64,
    // Reference position in radian.
    pub reference_position: f64,
    // Velocity limit in rad/s.
    pub velocity_limit: f64,
    pub gain_position_loop: f64,
    pub gain_velocity_loop: f64,
    // Stalled actuator never moves.
    pub is_stalled: bool,
    // Time step in second.
    _time_step: f64,
}

impl MockActuator {
    /// Mock actuator to simulate the rotary joint in the position mode. The
    /// joint moves toward the reference position at the velocity limit.
    ///
    /// # Arguments
    /// * `position` - Initial mechanical position in radian.
    /// * `time_step` - Simulated time in second of each update.
    ///
    /// # Returns
    /// A new mock actuator.
    pub fn new(position: f64, time_step: f64) -> Self {
        Self {
            is_enabled: false,
            run_mode: RunMode::Operation,

            mechanical_position: position,
            reference_position: position,

            velocity_limit: MOCK_VELOCITY_LIMIT,
            gain_position_loop: MOCK_GAIN_POSITION_LOOP,
            gain_velocity_loop: MOCK_GAIN_VELOCITY_LOOP,

            is_stalled: false,

            _time_step: time_step,
        }
    }

    /// Read the parameter. Reading the mechanical position advances the
    /// simulation by one time step.
    ///
    /// # Arguments
    /// * `name` - Parameter name.
    ///
    /// # Returns
    /// Parameter value.
    pub fn read_param(&mut self, name: ParameterName) -> f64 {
        match name {
            ParameterName::MechanicalPosition => {
                // Cache the position before updating it.
                let position = self.mechanical_position;
                self.step();

                position
            }
            ParameterName::ReferencePosition => self.reference_position,
            ParameterName::VelocityLimit => self.velocity_limit,
            ParameterName::GainPositionLoop => self.gain_position_loop,
            ParameterName::GainVelocityLoop => self.gain_velocity_loop,
            ParameterName::RunMode => self.run_mode.value(),
        }
    }

    /// Write the parameter.
    ///
    /// # Arguments
    /// * `name` - Parameter name.
    /// * `value` - Parameter value.
    ///
    /// # Returns
    /// True if the drive accepts the value. Otherwise, false.
    pub fn write_param(&mut self, name: ParameterName, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }

        match name {
            ParameterName::MechanicalPosition => return false,
            ParameterName::ReferencePosition => self.reference_position = value,
            ParameterName::VelocityLimit => {
                if value < 0.0 {
                    return false;
                }
                self.velocity_limit = value;
            }
            ParameterName::GainPositionLoop => self.gain_position_loop = value,
            ParameterName::GainVelocityLoop => self.gain_velocity_loop = value,
            ParameterName::RunMode => match RunMode::from_value(value) {
                Some(run_mode) => self.run_mode = run_mode,
                None => return false,
            },
        }

        true
    }

    /// Move the joint by one time step.
    fn step(&mut self) {
        if !self.is_enabled || self.is_stalled || (self.run_mode != RunMode::Position) {
            return;
        }

        let max_step = self.velocity_limit * self._time_step;
        self.mechanical_position += clip(
            self.reference_position - self.mechanical_position,
            -max_step,
            max_step,
        );
    }
}
