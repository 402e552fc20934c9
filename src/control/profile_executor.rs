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

use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::clock::Clock;
use crate::control::math_tool::{radian_to_rotation, wrap_radian};
use crate::control::profile_generator::{generate_profile, MotionProfile, ProfileParameters};
use crate::enums::ParameterName;
use crate::interface::actuator_port::{ActuatorPort, AxisId, BusError};

/// Generate the profile of each actuator starting from its current reference
/// position.
///
/// # Arguments
/// * `port` - Actuator port.
/// * `axis_ids` - Actuator identifiers.
/// * `parameters` - Profile parameters. The start position is replaced by the
/// reference position of each actuator.
/// * `full_rotation` - One full rotation in radian.
///
/// # Returns
/// Pairs of the actuator identifier and its profile.
///
/// # Errors
/// The first fault of the port.
pub fn generate_profiles_from_reference<P: ActuatorPort + ?Sized>(
    port: &mut P,
    axis_ids: &[AxisId],
    parameters: &ProfileParameters,
    full_rotation: f64,
) -> Result<Vec<(AxisId, MotionProfile)>, BusError> {
    let mut profiles = Vec::with_capacity(axis_ids.len());
    for axis_id in axis_ids {
        let reference = port.read_param(*axis_id, ParameterName::ReferencePosition)?;

        let mut parameters_axis = parameters.clone();
        parameters_axis.start_position = radian_to_rotation(reference, full_rotation);

        profiles.push((*axis_id, generate_profile(&parameters_axis, full_rotation)));
    }

    Ok(profiles)
}

/// Step through the profiles at the sample interval. At each step, every
/// actuator with a remaining setpoint gets it as the reference position and
/// its position is read back. An actuator with a shorter profile holds its
/// last setpoint.
///
/// # Arguments
/// * `port` - Actuator port.
/// * `clock` - Clock to pace the steps.
/// * `profiles` - Pairs of the actuator identifier and its profile. The sample
/// interval of the first non-empty profile paces all of them.
/// * `full_rotation` - One full rotation in radian.
/// * `stop` - Stop request checked before each step.
///
/// # Returns
/// Number of executed steps.
///
/// # Errors
/// The first fault of the port.
pub fn execute_profiles<P: ActuatorPort + ?Sized, C: Clock + ?Sized>(
    port: &mut P,
    clock: &mut C,
    profiles: Vec<(AxisId, MotionProfile)>,
    full_rotation: f64,
    stop: &AtomicBool,
) -> Result<usize, BusError> {
    let sample_interval = match profiles.iter().find(|(_, profile)| !profile.is_empty()) {
        Some((_, profile)) => profile.sample_interval(),
        None => {
            info!("No motion in the profiles.");
            return Ok(0);
        }
    };

    let num_step = profiles
        .iter()
        .map(|(_, profile)| profile.len())
        .max()
        .unwrap_or(0);

    let mut setpoints: Vec<(AxisId, std::vec::IntoIter<f64>)> = profiles
        .into_iter()
        .map(|(axis_id, profile)| (axis_id, profile.into_iter()))
        .collect();

    for step in 0..num_step {
        if stop.load(Ordering::Relaxed) {
            info!("Stop the profile at the step {step} of {num_step}.");
            return Ok(step);
        }

        for (axis_id, remaining) in setpoints.iter_mut() {
            if let Some(setpoint) = remaining.next() {
                port.write_param(*axis_id, ParameterName::ReferencePosition, setpoint)?;

                let angle = port.read_param(*axis_id, ParameterName::MechanicalPosition)?;
                let angle_wrapped = wrap_radian(angle, full_rotation);
                debug!(
                    "Actuator {axis_id} position: {:.3} rotation ({angle_wrapped:.2} radian) [Total: {:.3} rotation].",
                    radian_to_rotation(angle_wrapped, full_rotation),
                    radian_to_rotation(angle, full_rotation),
                );
            }
        }

        clock.sleep(sample_interval);
    }

    Ok(num_step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    use crate::constants::FULL_ROTATION;
    use crate::mock::mock_bus::{BusTransaction, MockBus};
    use crate::mock::mock_clock::MockClock;

    fn create_profile(ramp_time: f64) -> MotionProfile {
        generate_profile(
            &ProfileParameters::new(0.0, 1.0, ramp_time, 100.0),
            FULL_ROTATION,
        )
    }

    #[test]
    fn test_generate_profiles_from_reference() {
        let mut bus = MockBus::new(&[16, 17]).with_recording();
        bus.actuator_mut(17).unwrap().reference_position = FULL_ROTATION;

        let profiles = generate_profiles_from_reference(
            &mut bus,
            &[16, 17],
            &ProfileParameters::new(0.0, 8.0, 1.0, 100.0),
            FULL_ROTATION,
        )
        .unwrap();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].0, 16);
        assert_relative_eq!(profiles[0].1.setpoints()[0], 0.0);
        assert_eq!(profiles[1].0, 17);
        assert_relative_eq!(profiles[1].1.setpoints()[0], FULL_ROTATION);

        assert_eq!(
            bus.get_transactions_and_clear(),
            vec![
                BusTransaction::Read(16, ParameterName::ReferencePosition),
                BusTransaction::Read(17, ParameterName::ReferencePosition),
            ]
        );
    }

    #[test]
    fn test_execute_profiles() {
        let mut bus = MockBus::new(&[16, 17]).with_recording();
        let mut clock = MockClock::new();

        let profile_long = create_profile(0.05);
        let profile_short = create_profile(0.02);
        let setpoints_short = profile_short.setpoints().to_vec();

        let num_step = execute_profiles(
            &mut bus,
            &mut clock,
            vec![(16, profile_long), (17, profile_short)],
            FULL_ROTATION,
            &AtomicBool::new(false),
        )
        .unwrap();

        assert_eq!(num_step, 10);
        assert_eq!(clock.sleeps, vec![Duration::from_millis(10); 10]);

        // Each setpoint is followed by a read back.
        let transactions = bus.get_transactions_and_clear();
        assert_eq!(transactions.len(), 2 * (10 + 4));
        assert_eq!(
            transactions[..4],
            [
                BusTransaction::Write(16, ParameterName::ReferencePosition, 0.0),
                BusTransaction::Read(16, ParameterName::MechanicalPosition),
                BusTransaction::Write(17, ParameterName::ReferencePosition, 0.0),
                BusTransaction::Read(17, ParameterName::MechanicalPosition),
            ]
        );

        // The short one holds its last setpoint.
        assert_eq!(
            bus.actuator(17).unwrap().reference_position,
            *setpoints_short.last().unwrap()
        );
    }

    #[test]
    fn test_execute_profiles_empty() {
        let mut bus = MockBus::new(&[16]).with_recording();
        let mut clock = MockClock::new();

        let num_step = execute_profiles(
            &mut bus,
            &mut clock,
            vec![(16, create_profile(0.0))],
            FULL_ROTATION,
            &AtomicBool::new(false),
        )
        .unwrap();

        assert_eq!(num_step, 0);
        assert!(bus.transactions().is_empty());
        assert!(clock.sleeps.is_empty());
    }

    #[test]
    fn test_execute_profiles_stop() {
        let mut bus = MockBus::new(&[16]).with_recording();
        let mut clock = MockClock::new();

        let num_step = execute_profiles(
            &mut bus,
            &mut clock,
            vec![(16, create_profile(1.0))],
            FULL_ROTATION,
            &AtomicBool::new(true),
        )
        .unwrap();

        assert_eq!(num_step, 0);
        assert!(bus.transactions().is_empty());
    }

    #[test]
    fn test_execute_profiles_fault() {
        let mut bus = MockBus::new(&[16]).with_recording();
        bus.set_reachable(false);
        let mut clock = MockClock::new();

        assert_eq!(
            execute_profiles(
                &mut bus,
                &mut clock,
                vec![(16, create_profile(1.0))],
                FULL_ROTATION,
                &AtomicBool::new(false),
            ),
            Err(BusError::Unreachable)
        );
        assert!(clock.sleeps.is_empty());
    }
}
