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

use thiserror::Error;

use crate::enums::ParameterName;

/// Identifier of the actuator on the field bus.
pub type AxisId = u8;

/// Fault of the command/feedback channel. The control loop never retries on
/// these and treats them as fatal to the current run.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum BusError {
    #[error("field bus is unreachable")]
    Unreachable,

    #[error("actuator {axis_id} does not respond")]
    NoResponse { axis_id: AxisId },

    #[error("malformed reply from actuator {axis_id} for parameter {name}")]
    MalformedReply { axis_id: AxisId, name: String },
}

/// Command and feedback port of the actuators on the shared field bus.
///
/// The wire protocol is owned by the implementation. All the actuators share
/// the same port and are addressed one after another.
pub trait ActuatorPort {
    /// Read a parameter of the actuator.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    /// * `name` - Parameter name.
    ///
    /// # Returns
    /// Parameter value.
    ///
    /// # Errors
    /// If the bus is unreachable or the actuator does not respond.
    fn read_param(&mut self, axis_id: AxisId, name: ParameterName) -> Result<f64, BusError>;

    /// Write a parameter of the actuator.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    /// * `name` - Parameter name.
    /// * `value` - Parameter value.
    ///
    /// # Errors
    /// If the bus is unreachable or the actuator does not respond.
    fn write_param(
        &mut self,
        axis_id: AxisId,
        name: ParameterName,
        value: f64,
    ) -> Result<(), BusError>;

    /// Enable the actuator.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    fn enable(&mut self, axis_id: AxisId) -> Result<(), BusError>;

    /// Disable the actuator. This is safe to call on an actuator that was
    /// never enabled or is already disabled.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    fn disable(&mut self, axis_id: AxisId) -> Result<(), BusError>;
}
