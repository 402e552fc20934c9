use std::f64::consts::TAU;

// One full rotation in radian.
pub const FULL_ROTATION: f64 = TAU;

// Truncated constant that the earlier calibration of the joints was done with.
// Only use it when the bit compatibility with that calibration is needed.
pub const LEGACY_FULL_ROTATION: f64 = 2.0 * 3.14159;

pub const DEGREE_PER_ROTATION: f64 = 360.0;

// Default motion parameters of the position mode
pub const DEFAULT_TOLERANCE_DEGREE: f64 = 2.0;
pub const DEFAULT_TIMEOUT_SECOND: f64 = 1.5;
pub const DEFAULT_POLLING_INTERVAL_SECOND: f64 = 0.05;

// Velocity limit in rad/s applied during the zeroing and the moves.
pub const DEFAULT_VELOCITY_LIMIT: f64 = 50.0;

// Gains of the position and velocity loops on the drive
pub const DEFAULT_GAIN_POSITION_LOOP: f64 = 20.0;
pub const DEFAULT_GAIN_VELOCITY_LOOP: f64 = 5.0;

// Maximum number of setpoints in a profile of a single axis.
pub const MAX_PROFILE_SAMPLE: usize = 10_000_000;

// Slice of the dwell time to check the stop request in second.
pub const DWELL_SLICE_SECOND: f64 = 0.05;

pub const FILE_CONFIG_APP: &str = "config/parameters_app.yaml";
pub const FILE_LOG: &str = "application.log";
