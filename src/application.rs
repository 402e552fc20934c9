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

use log::{info, warn};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag::register,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::Config;
use crate::control::axis::{configure_axes, EnabledAxes};
use crate::control::math_tool::radian_to_degree;
use crate::control::profile_executor::{execute_profiles, generate_profiles_from_reference};
use crate::control::waypoint::run_waypoint_cycle;
use crate::control::zeroing::zero_axes;
use crate::enums::MotionMode;
use crate::interface::actuator_port::{ActuatorPort, BusError};

/// Register the signals that stop the application.
///
/// # Arguments
/// * `stop` - Stop flag set by the signals.
pub fn register_stop_signals(stop: &Arc<AtomicBool>) {
    for signal in [SIGTERM, SIGINT].iter() {
        if let Err(error) = register(*signal, stop.clone()) {
            warn!("Failed to register the signal {signal}: {error}.");
        }
    }
}

/// Run the application. The actuators are configured and zeroed, then moved
/// in the motion mode of the configuration. All the actuators are disabled at
/// the end no matter how the run ends.
///
/// # Arguments
/// * `config` - Configuration.
/// * `port` - Actuator port.
/// * `clock` - Clock to pace the moves.
/// * `stop` - Stop request.
/// * `max_cycle` - Maximum number of waypoint cycles. None means no limit.
///
/// # Errors
/// The first fault of the port.
pub fn run<P: ActuatorPort, C: Clock + ?Sized>(
    config: &Config,
    port: &mut P,
    clock: &mut C,
    stop: &AtomicBool,
    max_cycle: Option<usize>,
) -> Result<(), BusError> {
    info!(
        "Run the joint controller in the {} mode with the actuators: {:?}.",
        config.motion_mode.as_ref(),
        config.axis_ids
    );

    let mut port = EnabledAxes::new(port, &config.axis_ids);

    configure_axes(&mut *port, &config.axis_ids, &config.axis_settings)?;

    let axes = zero_axes(
        &mut *port,
        clock,
        &config.axis_ids,
        config.axis_settings.velocity_limit,
        config.settle_time_zeroing,
    )?;
    for axis in axes.iter() {
        info!(
            "Zero offset of the actuator {}: {:.2}°.",
            axis.id,
            radian_to_degree(axis.zero_offset(), config.full_rotation)
        );
    }

    clock.sleep(config.settle_time_startup);

    match config.motion_mode {
        MotionMode::Waypoint => {
            let summary = run_waypoint_cycle(
                &mut *port,
                clock,
                &config.convergence,
                &config.waypoints,
                stop,
                max_cycle,
            )?;
            info!(
                "Done {} cycles with {} moves ({} timeouts).",
                summary.num_cycle, summary.num_move, summary.num_timeout
            );
        }
        MotionMode::Profile => {
            let profiles = generate_profiles_from_reference(
                &mut *port,
                &config.axis_ids,
                &config.profile,
                config.full_rotation,
            )?;
            let num_step =
                execute_profiles(&mut *port, clock, profiles, config.full_rotation, stop)?;
            info!("Done the profile in {num_step} steps.");
        }
    }

    info!("Joint controller is done.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::enums::ParameterName;
    use crate::interface::actuator_port::AxisId;
    use crate::mock::mock_bus::{BusTransaction, MockBus};
    use crate::mock::mock_clock::MockClock;

    fn create_config(motion_mode: MotionMode) -> Config {
        let mut config = Config::new(Path::new("config/parameters_app.yaml"));
        config.motion_mode = motion_mode;

        config
    }

    fn count_reference_writes(bus: &MockBus, axis_id: AxisId) -> usize {
        bus.transactions()
            .iter()
            .filter(|transaction| {
                matches!(
                    transaction,
                    BusTransaction::Write(id, ParameterName::ReferencePosition, _) if *id == axis_id
                )
            })
            .count()
    }

    #[test]
    fn test_run_waypoint() {
        let config = create_config(MotionMode::Waypoint);
        let mut bus = MockBus::new(&config.axis_ids).with_recording();
        let mut clock = MockClock::new();

        assert!(run(&config, &mut bus, &mut clock, &AtomicBool::new(false), Some(1)).is_ok());

        // Zeroing and two waypoints
        assert_eq!(count_reference_writes(&bus, 127), 3);
        assert_eq!(count_reference_writes(&bus, 17), 3);

        assert_relative_eq_degree(&bus, 127, 359.0);
        assert_relative_eq_degree(&bus, 17, 240.0);

        assert!(!bus.actuator(127).unwrap().is_enabled);
        assert!(!bus.actuator(17).unwrap().is_enabled);
        assert_eq!(
            bus.transactions()[bus.transactions().len() - 2..],
            [BusTransaction::Disable(127), BusTransaction::Disable(17)]
        );
    }

    fn assert_relative_eq_degree(bus: &MockBus, axis_id: AxisId, degree: f64) {
        let reference = bus.actuator(axis_id).unwrap().reference_position;
        approx::assert_relative_eq!(reference.to_degrees(), degree, epsilon = 1e-9);
    }

    #[test]
    fn test_run_profile() {
        let config = create_config(MotionMode::Profile);
        let mut bus = MockBus::new(&config.axis_ids).with_recording();
        let mut clock = MockClock::new();

        assert!(run(&config, &mut bus, &mut clock, &AtomicBool::new(false), None).is_ok());

        // Zeroing and the 100 + 100 setpoints
        assert_eq!(count_reference_writes(&bus, 127), 201);
        assert_eq!(count_reference_writes(&bus, 17), 201);

        assert!(!bus.actuator(127).unwrap().is_enabled);
        assert!(!bus.actuator(17).unwrap().is_enabled);
    }

    #[test]
    fn test_run_stop() {
        let config = create_config(MotionMode::Waypoint);
        let mut bus = MockBus::new(&config.axis_ids).with_recording();
        let mut clock = MockClock::new();

        assert!(run(&config, &mut bus, &mut clock, &AtomicBool::new(true), None).is_ok());

        // Only the zeroing
        assert_eq!(count_reference_writes(&bus, 127), 1);
        assert!(!bus.actuator(127).unwrap().is_enabled);
        assert!(!bus.actuator(17).unwrap().is_enabled);
    }

    #[test]
    fn test_run_fault() {
        let config = create_config(MotionMode::Waypoint);
        let mut bus = MockBus::new(&config.axis_ids).with_recording();
        bus.set_offline(17, true);
        let mut clock = MockClock::new();

        assert_eq!(
            run(&config, &mut bus, &mut clock, &AtomicBool::new(false), None),
            Err(BusError::NoResponse { axis_id: 17 })
        );

        // The reachable actuator is still disabled
        assert_eq!(
            bus.get_transactions_and_clear(),
            vec![
                BusTransaction::Write(127, ParameterName::RunMode, 1.0),
                BusTransaction::Disable(127),
            ]
        );
    }
}
