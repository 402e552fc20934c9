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

use log::info;
use std::time::Duration;

use crate::clock::Clock;
use crate::control::axis::Axis;
use crate::enums::ParameterName;
use crate::interface::actuator_port::{ActuatorPort, AxisId, BusError};

/// Anchor each actuator at its current pose. The measured position is written
/// back as the reference position and the velocity limit is applied for the
/// following moves. The actuators are handled one by one with a settle time
/// after each.
///
/// # Arguments
/// * `port` - Actuator port.
/// * `clock` - Clock to wait the settle time.
/// * `axis_ids` - Actuator identifiers.
/// * `velocity_limit` - Velocity limit in rad/s.
/// * `settle_time` - Settle time after each actuator.
///
/// # Returns
/// Zeroed axes in the same order as the identifiers.
///
/// # Errors
/// The first fault of the port. The remaining actuators are not zeroed.
pub fn zero_axes<P: ActuatorPort + ?Sized, C: Clock + ?Sized>(
    port: &mut P,
    clock: &mut C,
    axis_ids: &[AxisId],
    velocity_limit: f64,
    settle_time: Duration,
) -> Result<Vec<Axis>, BusError> {
    let mut axes = Vec::with_capacity(axis_ids.len());
    for axis_id in axis_ids {
        let position = port.read_param(*axis_id, ParameterName::MechanicalPosition)?;

        port.write_param(*axis_id, ParameterName::ReferencePosition, position)?;
        port.write_param(*axis_id, ParameterName::VelocityLimit, velocity_limit)?;

        info!("Actuator {axis_id} is zeroed at the angle: {position:.2} radian.");
        axes.push(Axis::new(*axis_id, position));

        clock.sleep(settle_time);
    }

    Ok(axes)
}
