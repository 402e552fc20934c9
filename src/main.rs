use clap::{value_parser, Arg, Command};
use log::{error, info};
use simplelog::{
    format_description, ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use run_joint_controller::application::{register_stop_signals, run};
use run_joint_controller::clock::SystemClock;
use run_joint_controller::config::Config;
use run_joint_controller::constants::{FILE_CONFIG_APP, FILE_LOG};
use run_joint_controller::enums::MotionMode;
use run_joint_controller::interface::actuator_port::AxisId;
use run_joint_controller::mock::mock_bus::MockBus;

fn main() {
    // Parse the command line arguments
    let matches = Command::new("joint controller")
        .about("Synchronized rotary-joint motion controller.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Application parameters file")
                .default_value(FILE_CONFIG_APP),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("log-level")
                .help("Log level: 0 (Off), 1 (Error), 2 (Warn), 3 (Info), 4 (Debug), 5 (Trace)")
                .default_value("3")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("motion-mode")
                .help("Motion mode to override the configuration file: waypoint or profile")
                .value_parser(["waypoint", "profile"]),
        )
        .arg(
            Arg::new("cycles")
                .long("cycles")
                .help("Maximum number of waypoint cycles. Default is no limit.")
                .value_parser(value_parser!(usize)),
        )
        .get_matches();

    // Check the log filter
    let log_filter = get_log_filter(matches.get_one::<u32>("level"));

    // Initiate the logger
    initiate_logger(log_filter, FILE_LOG);
    info!("Log level: {log_filter}.");

    // Read the configuration
    let filepath = matches
        .get_one::<String>("config")
        .expect("Should have the configuration file.");
    let mut config = Config::new(Path::new(filepath));
    if let Some(mode) = matches.get_one::<String>("mode") {
        config.motion_mode =
            MotionMode::from_str(mode).expect("Should be a validated motion mode.");
    }

    let max_cycle = matches.get_one::<usize>("cycles").copied();

    // Register the signals that stop the application
    let stop = Arc::new(AtomicBool::new(false));
    register_stop_signals(&stop);

    // Run on the simulated field bus
    let mut bus = create_simulated_bus(&config);
    let mut clock = SystemClock::new();
    if let Err(error) = run(&config, &mut bus, &mut clock, &stop, max_cycle) {
        error!("Joint controller failed: {error}.");
        exit(1);
    }
}

/// Create the simulated field bus. The simulated time of each position read
/// matches the pace of the motion mode.
///
/// # Arguments
/// * `config` - Configuration.
///
/// # Returns
/// Simulated field bus.
fn create_simulated_bus(config: &Config) -> MockBus {
    let positions: Vec<(AxisId, f64)> = config.axis_ids.iter().map(|id| (*id, 0.0)).collect();
    let time_step = match config.motion_mode {
        MotionMode::Waypoint => config.convergence.polling_interval.as_secs_f64(),
        MotionMode::Profile => 1.0 / config.profile.sample_rate,
    };

    MockBus::with_positions(&positions, time_step)
}

/// Get the log filter.
///
/// # Arguments
/// * `log_level` - Log level.
///
/// # Returns
/// Log filter.
fn get_log_filter(log_level: Option<&u32>) -> LevelFilter {
    match log_level {
        Some(level) => match level {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5 => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
        None => LevelFilter::Info,
    }
}

/// Initiate the logger.
///
/// # Arguments
/// * `level` - Log level.
/// * `filepath` - Log file path.
fn initiate_logger(level: LevelFilter, filepath: &str) {
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond]"
        ))
        .build();

    // Log to the terminal
    let logger_terminal = TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    // Log to the file
    let logger_file: Option<Box<WriteLogger<File>>>;
    match File::create(filepath) {
        Ok(file) => {
            logger_file = Some(WriteLogger::new(level, config.clone(), file));
        }
        Err(error) => {
            logger_file = None;
            eprintln!("Failed to create the log file: {error}.");
        }
    }

    if logger_file.is_some() {
        let _ = CombinedLogger::init(vec![logger_terminal, logger_file.unwrap()]);
    } else {
        let _ = CombinedLogger::init(vec![logger_terminal]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use run_joint_controller::mock::mock_clock::MockClock;

    #[test]
    fn test_get_log_filter() {
        assert_eq!(get_log_filter(Some(&0)), LevelFilter::Off);
        assert_eq!(get_log_filter(Some(&1)), LevelFilter::Error);
        assert_eq!(get_log_filter(Some(&2)), LevelFilter::Warn);
        assert_eq!(get_log_filter(Some(&3)), LevelFilter::Info);
        assert_eq!(get_log_filter(Some(&4)), LevelFilter::Debug);
        assert_eq!(get_log_filter(Some(&5)), LevelFilter::Trace);

        assert_eq!(get_log_filter(Some(&6)), LevelFilter::Info);

        assert_eq!(get_log_filter(None), LevelFilter::Info);
    }

    #[test]
    fn test_create_simulated_bus() {
        let mut config = Config::new(Path::new(FILE_CONFIG_APP));

        let bus = create_simulated_bus(&config);
        assert_eq!(bus.actuator(127).unwrap().mechanical_position, 0.0);
        assert_eq!(bus.actuator(17).unwrap().mechanical_position, 0.0);
        assert!(bus.actuator(16).is_none());

        config.motion_mode = MotionMode::Profile;
        assert!(create_simulated_bus(&config).actuator(17).is_some());
    }

    #[test]
    fn test_create_simulated_bus_no_recording() {
        let config = Config::new(Path::new(FILE_CONFIG_APP));
        let mut bus = create_simulated_bus(&config);
        let mut clock = MockClock::new();

        assert!(run(&config, &mut bus, &mut clock, &AtomicBool::new(false), Some(3)).is_ok());

        assert!(bus.transactions().is_empty());
        assert!(!bus.actuator(127).unwrap().is_enabled);
    }
}
