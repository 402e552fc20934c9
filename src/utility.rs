use config::Config;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::enums::MotionMode;

/// Trait for parsing the configuration value.
///
/// # Parameters
/// * `Self` - Type of the configuration value.
pub trait ConfigValue: Sized {
    /// Parse the configuration value.
    ///
    /// # Parameters
    /// * `s` - String to parse.
    ///
    /// # Returns
    /// The parsed configuration value.
    fn parse_value(s: &str) -> Self;
}

/// Implement the trait ConfigValue for String.
///
/// # Parameters
/// * `String` - Type of the configuration value.
impl ConfigValue for String {
    fn parse_value(s: &str) -> Self {
        s.to_string()
    }
}

/// Implement the trait ConfigValue for f64.
///
/// # Parameters
/// * `f64` - Type of the configuration value.
impl ConfigValue for f64 {
    fn parse_value(s: &str) -> Self {
        s.parse::<f64>().expect(&format!("{s} should parse as f64"))
    }
}

/// Implement the trait ConfigValue for usize.
///
/// # Parameters
/// * `usize` - Type of the configuration value.
impl ConfigValue for usize {
    fn parse_value(s: &str) -> Self {
        s.parse::<usize>()
            .expect(&format!("{s} should parse as usize"))
    }
}

/// Implement the trait ConfigValue for u8. This is the type of the actuator
/// identifier.
///
/// # Parameters
/// * `u8` - Type of the configuration value.
impl ConfigValue for u8 {
    fn parse_value(s: &str) -> Self {
        s.parse::<u8>().expect(&format!("{s} should parse as u8"))
    }
}

/// Implement the trait ConfigValue for bool.
///
/// # Parameters
/// * `bool` - Type of the configuration value.
impl ConfigValue for bool {
    fn parse_value(s: &str) -> Self {
        s.parse::<bool>()
            .expect(&format!("{s} should parse as bool"))
    }
}

/// Implement the trait ConfigValue for MotionMode.
///
/// # Parameters
/// * `MotionMode` - Type of the configuration value.
impl ConfigValue for MotionMode {
    fn parse_value(s: &str) -> Self {
        MotionMode::from_str(s).expect(&format!("{s} should be a motion mode"))
    }
}

/// Get the configuation from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
///
/// # Returns
/// The configuration.
pub fn get_config(filepath: &Path) -> Config {
    let name = filepath
        .to_str()
        .expect(&format!("Should have the file name in the {:?}", filepath));

    Config::builder()
        .add_source(config::File::with_name(name))
        .build()
        .expect(&format!("Should be able to read the {name}"))
}

/// Get the parameter from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
/// * `key` - Key to find the parameter in the config file.
///
/// # Returns
/// The parameter.
pub fn get_parameter<T: ConfigValue>(filepath: &Path, key: &str) -> T {
    let config = get_config(filepath);

    config
        .get_string(key)
        .map(|v| T::parse_value(&v))
        .expect(&format!("Should find the {key} in the {:?}", filepath))
}

/// Get the array parameter from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
/// * `key` - Key to find the parameter in the config file.
///
/// # Returns
/// The array parameter.
pub fn get_parameter_array<T: ConfigValue>(filepath: &Path, key: &str) -> Vec<T> {
    let config = get_config(filepath);
    let config_array = config
        .get_array(key)
        .expect(&format!("Should find the {key} in the {:?}", filepath));

    config_array
        .iter()
        .map(|x| T::parse_value(&x.clone().into_string().expect("Should be a string")))
        .collect()
}

/// Get the matrix parameter from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
/// * `key` - Key to find the parameter in the config file.
///
/// # Returns
/// The matrix parameter.
pub fn get_parameter_matrix<T: ConfigValue>(filepath: &Path, key: &str) -> Vec<Vec<T>> {
    let config = get_config(filepath);
    let config_array = config
        .get_array(key)
        .expect(&format!("Should find the {key} in the {:?}", filepath));

    config_array
        .iter()
        .map(|x| {
            x.clone()
                .into_array()
                .expect("Should be an array")
                .iter()
                .map(|y| T::parse_value(&y.clone().into_string().expect("Should be a string")))
                .collect()
        })
        .collect()
}

/// Get the duration parameter from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
/// * `key` - Key to find the parameter in second in the config file.
///
/// # Returns
/// The duration.
///
/// # Panics
/// If the value is negative or not finite.
pub fn get_parameter_duration(filepath: &Path, key: &str) -> Duration {
    let second: f64 = get_parameter(filepath, key);
    assert!(
        second.is_finite() && (second >= 0.0),
        "{key} should be a non-negative time in second."
    );

    Duration::from_secs_f64(second)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use tempfile::Builder;

    fn create_config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("Should create the temporary file.");
        file.write_all(content.as_bytes())
            .expect("Should write the temporary file.");

        file
    }

    #[test]
    fn test_get_config() {
        let filepath = Path::new("config/parameters_app.yaml");
        let timeout = get_config(filepath).get_float("timeout").unwrap();

        assert_eq!(timeout, 1.5);
    }

    #[test]
    fn test_get_parameter() {
        let filepath = Path::new("config/parameters_app.yaml");

        let tolerance: f64 = get_parameter(filepath, "tolerance");
        assert_eq!(tolerance, 2.0);

        let use_legacy_full_rotation: bool = get_parameter(filepath, "use_legacy_full_rotation");
        assert!(!use_legacy_full_rotation);

        let motion_mode: MotionMode = get_parameter(filepath, "motion_mode");
        assert_eq!(motion_mode, MotionMode::Waypoint);
    }

    #[test]
    #[should_panic(expected = "Should be able to read the wrong.yaml")]
    fn test_get_config_panic() {
        get_config(Path::new("wrong.yaml"));
    }

    #[test]
    fn test_get_parameter_array() {
        let axis_ids: Vec<u8> =
            get_parameter_array(Path::new("config/parameters_app.yaml"), "axis_ids");

        assert_eq!(axis_ids, vec![127, 17]);
    }

    #[test]
    fn test_get_parameter_matrix() {
        let file = create_config_file("positions:\n  - [23, 153.5]\n  - [-1, 0]\n");

        let positions: Vec<Vec<f64>> = get_parameter_matrix(file.path(), "positions");

        assert_eq!(positions, vec![vec![23.0, 153.5], vec![-1.0, 0.0]]);
    }

    #[test]
    fn test_get_parameter_duration() {
        let file = create_config_file("dwell: 0.25\nnegative: -1.0\n");

        assert_eq!(
            get_parameter_duration(file.path(), "dwell"),
            Duration::from_millis(250)
        );
    }

    #[test]
    #[should_panic(expected = "negative should be a non-negative time in second.")]
    fn test_get_parameter_duration_panic() {
        let file = create_config_file("negative: -1.0\n");

        get_parameter_duration(file.path(), "negative");
    }

    #[test]
    #[should_panic(expected = "value should parse as u8")]
    fn test_parse_value_panic() {
        u8::parse_value("value");
    }
}
