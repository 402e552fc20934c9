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
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::clock::Clock;
use crate::constants::DWELL_SLICE_SECOND;
use crate::control::convergence::{ConvergenceController, ConvergenceTarget};
use crate::interface::actuator_port::{ActuatorPort, AxisId, BusError};

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Waypoint {
    // Target positions in degree.
    pub target: ConvergenceTarget,
    // Time to stay at the targets after the move.
    pub dwell: Duration,
}

impl Waypoint {
    /// Create a waypoint from the positions of the actuators.
    ///
    /// # Arguments
    /// * `axis_ids` - Actuator identifiers.
    /// * `degrees` - Target positions in degree in the same order as the
    /// identifiers.
    /// * `dwell` - Dwell time.
    ///
    /// # Returns
    /// A new waypoint.
    ///
    /// # Panics
    /// If the numbers of identifiers and positions are different.
    pub fn new(axis_ids: &[AxisId], degrees: &[f64], dwell: Duration) -> Self {
        assert_eq!(
            axis_ids.len(),
            degrees.len(),
            "Each actuator should have one position in the waypoint."
        );

        Self {
            target: axis_ids
                .iter()
                .copied()
                .zip(degrees.iter().copied())
                .collect(),
            dwell,
        }
    }

    /// Describe the targets for the log.
    ///
    /// # Returns
    /// Description.
    fn describe(&self) -> String {
        self.target
            .iter()
            .map(|(axis_id, degree)| format!("actuator {axis_id} to {degree}°"))
            .collect::<Vec<String>>()
            .join(", ")
    }
}

/// Summary of the waypoint cycles.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CycleSummary {
    pub num_cycle: usize,
    pub num_move: usize,
    // Moves that ended at the timeout.
    pub num_timeout: usize,
}

/// Cycle through the waypoints until the stop request or the maximum number
/// of cycles.
///
/// # Arguments
/// * `port` - Actuator port.
/// * `clock` - Clock to pace the polls and the dwells.
/// * `controller` - Convergence controller.
/// * `waypoints` - Waypoints in order.
/// * `stop` - Stop request checked between the moves and during the dwells.
/// * `max_cycle` - Maximum number of cycles. None means no limit.
///
/// # Returns
/// Summary of the cycles.
///
/// # Errors
/// The first fault of the port.
pub fn run_waypoint_cycle<P: ActuatorPort + ?Sized, C: Clock + ?Sized>(
    port: &mut P,
    clock: &mut C,
    controller: &ConvergenceController,
    waypoints: &[Waypoint],
    stop: &AtomicBool,
    max_cycle: Option<usize>,
) -> Result<CycleSummary, BusError> {
    let mut summary = CycleSummary::default();
    if waypoints.is_empty() {
        info!("No waypoint to move.");
        return Ok(summary);
    }

    while max_cycle.map_or(true, |max| summary.num_cycle < max) {
        for waypoint in waypoints {
            if stop.load(Ordering::Relaxed) {
                return Ok(summary);
            }

            info!("Moving {}...", waypoint.describe());
            let result = controller.move_to(port, clock, &waypoint.target)?;

            summary.num_move += 1;
            if !result.converged {
                summary.num_timeout += 1;
            }

            info!(
                "Reached the positions, waiting for {:.2} second...",
                waypoint.dwell.as_secs_f64()
            );
            sleep_unless_stopped(clock, waypoint.dwell, stop);
        }

        summary.num_cycle += 1;
    }

    Ok(summary)
}

/// Sleep in short slices so that the stop request is honored in time.
///
/// # Arguments
/// * `clock` - Clock to sleep.
/// * `duration` - Total sleep time.
/// * `stop` - Stop request.
pub fn sleep_unless_stopped<C: Clock + ?Sized>(
    clock: &mut C,
    duration: Duration,
    stop: &AtomicBool,
) {
    let slice = Duration::from_secs_f64(DWELL_SLICE_SECOND);

    let mut remaining = duration;
    while !remaining.is_zero() && !stop.load(Ordering::Relaxed) {
        let sleep_time = remaining.min(slice);
        clock.sleep(sleep_time);

        remaining -= sleep_time;
    }
}
