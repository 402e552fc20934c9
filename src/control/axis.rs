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

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::constants::{
    DEFAULT_GAIN_POSITION_LOOP, DEFAULT_GAIN_VELOCITY_LOOP, DEFAULT_VELOCITY_LIMIT,
};
use crate::enums::{ParameterName, RunMode};
use crate::interface::actuator_port::{ActuatorPort, AxisId, BusError};

/// State of an actuator known by the control loop.
#[derive(Clone, PartialEq, Debug)]
pub struct Axis {
    pub id: AxisId,
    // Position in radian recorded by the zeroing at startup.
    _zero_offset: f64,
}

impl Axis {
    /// Create a new axis anchored at the zero offset.
    ///
    /// # Arguments
    /// * `id` - Actuator identifier.
    /// * `zero_offset` - Zero offset in radian.
    ///
    /// # Returns
    /// A new axis.
    pub fn new(id: AxisId, zero_offset: f64) -> Self {
        Self {
            id,
            _zero_offset: zero_offset,
        }
    }

    /// Get the zero offset in radian.
    pub fn zero_offset(&self) -> f64 {
        self._zero_offset
    }
}

/// Gains and limits applied to every actuator at startup.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AxisSettings {
    // Velocity limit in rad/s.
    pub velocity_limit: f64,
    // Proportional gain of the position loop.
    pub gain_position_loop: f64,
    // Proportional gain of the velocity loop.
    pub gain_velocity_loop: f64,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            velocity_limit: DEFAULT_VELOCITY_LIMIT,
            gain_position_loop: DEFAULT_GAIN_POSITION_LOOP,
            gain_velocity_loop: DEFAULT_GAIN_VELOCITY_LOOP,
        }
    }
}

/// Put the actuators into the position mode, enable them, and apply the
/// gains and velocity limit.
///
/// # Arguments
/// * `port` - Actuator port.
/// * `axis_ids` - Actuator identifiers.
/// * `settings` - Settings to apply.
///
/// # Errors
/// The first fault of the port.
pub fn configure_axes<P: ActuatorPort + ?Sized>(
    port: &mut P,
    axis_ids: &[AxisId],
    settings: &AxisSettings,
) -> Result<(), BusError> {
    info!("Setting the actuators to the position mode...");
    for axis_id in axis_ids {
        port.write_param(
            *axis_id,
            ParameterName::RunMode,
            RunMode::Position.value(),
        )?;
    }

    info!("Enabling the actuators...");
    for axis_id in axis_ids {
        port.enable(*axis_id)?;

        port.write_param(
            *axis_id,
            ParameterName::VelocityLimit,
            settings.velocity_limit,
        )?;
        port.write_param(
            *axis_id,
            ParameterName::GainPositionLoop,
            settings.gain_position_loop,
        )?;
        port.write_param(
            *axis_id,
            ParameterName::GainVelocityLoop,
            settings.gain_velocity_loop,
        )?;
    }

    Ok(())
}

/// Disable the actuators one by one. A failure does not stop the others from
/// being disabled.
///
/// # Arguments
/// * `port` - Actuator port.
/// * `axis_ids` - Actuator identifiers.
///
/// # Returns
/// Number of actuators that failed to disable.
pub fn disable_axes<P: ActuatorPort + ?Sized>(port: &mut P, axis_ids: &[AxisId]) -> usize {
    info!("Disabling the actuators...");

    let mut num_failure = 0;
    for axis_id in axis_ids {
        if let Err(error) = port.disable(*axis_id) {
            error!("Failed to disable the actuator {axis_id}: {error}.");
            num_failure += 1;
        }
    }

    num_failure
}

/// Port whose actuators are disabled when this goes out of scope. This covers
/// the normal completion, the stop request, the bus fault, and the panic.
pub struct EnabledAxes<'a, P: ActuatorPort> {
    _port: &'a mut P,
    _axis_ids: Vec<AxisId>,
}

impl<'a, P: ActuatorPort> EnabledAxes<'a, P> {
    /// Guard the actuators of the port.
    ///
    /// # Arguments
    /// * `port` - Actuator port.
    /// * `axis_ids` - Actuators to disable at the end.
    ///
    /// # Returns
    /// A new guard.
    pub fn new(port: &'a mut P, axis_ids: &[AxisId]) -> Self {
        Self {
            _port: port,
            _axis_ids: axis_ids.to_vec(),
        }
    }
}

impl<P: ActuatorPort> Deref for EnabledAxes<'_, P> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        &*self._port
    }
}

impl<P: ActuatorPort> DerefMut for EnabledAxes<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self._port
    }
}

impl<P: ActuatorPort> Drop for EnabledAxes<'_, P> {
    fn drop(&mut self) {
        disable_axes(&mut *self._port, &self._axis_ids);
    }
}
