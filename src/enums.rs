use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString, FromRepr, VariantNames};

/// Parameter of the actuator that can be read or written on the field bus.
/// The string representation is the name used by the drive.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, AsRefStr, EnumIter, EnumString)]
pub enum ParameterName {
    // Measured mechanical position in radian.
    #[strum(serialize = "mechpos")]
    MechanicalPosition,
    // Commanded reference position in radian.
    #[strum(serialize = "loc_ref")]
    ReferencePosition,
    // Velocity limit in rad/s.
    #[strum(serialize = "limit_spd")]
    VelocityLimit,
    // Proportional gain of the position loop.
    #[strum(serialize = "loc_kp")]
    GainPositionLoop,
    // Proportional gain of the velocity loop.
    #[strum(serialize = "spd_kp")]
    GainVelocityLoop,
    #[strum(serialize = "run_mode")]
    RunMode,
}

/// Run mode of the actuator.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, AsRefStr)]
#[repr(u8)]
pub enum RunMode {
    Operation = 0,
    Position = 1,
    Speed = 2,
    Current = 3,
}

impl RunMode {
    /// Value to write to the run mode parameter.
    ///
    /// # Returns
    /// Value of the run mode.
    pub fn value(&self) -> f64 {
        *self as u8 as f64
    }

    /// Decode the run mode from the parameter value.
    ///
    /// # Arguments
    /// * `value` - Value read from the run mode parameter.
    ///
    /// # Returns
    /// Run mode. None if the value is not a known mode.
    pub fn from_value(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || value < 0.0 || value > (u8::MAX as f64) {
            return None;
        }

        Self::from_repr(value as u8)
    }
}

/// Motion mode of the application.
#[derive(
    Debug, PartialEq, Clone, Copy, AsRefStr, EnumString, VariantNames, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    // Cycle through the waypoints with the convergence controller.
    Waypoint,
    // Step through the trapezoidal position profile once.
    Profile,
}
