// Simulated time in second that passes on the actuator every time its
// mechanical position is read.
pub const MOCK_TIME_STEP: f64 = 0.05;

// Velocity limit in rad/s of the drive before it is configured.
pub const MOCK_VELOCITY_LIMIT: f64 = 2.0;

// Default gains of the drive
pub const MOCK_GAIN_POSITION_LOOP: f64 = 30.0;
pub const MOCK_GAIN_VELOCITY_LOOP: f64 = 2.0;
