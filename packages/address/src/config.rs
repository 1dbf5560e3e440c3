//! Matcher configuration, embedded at compile time via [`include_str!`] and
//! optionally overridden by a TOML file on disk.

use std::path::Path;

use flets_area_address_models::MatchConfig;

use crate::AddressError;

/// The reference tuning shipped with the crate.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/matching.toml");

/// Parses a [`MatchConfig`] from TOML. Keys that are absent keep their
/// defaults.
///
/// # Errors
///
/// * [`AddressError::Config`] if the TOML is malformed or a value has the
///   wrong type
pub fn from_toml_str(toml_str: &str) -> Result<MatchConfig, AddressError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Returns the embedded default configuration.
///
/// # Errors
///
/// * [`AddressError::Config`] if the embedded TOML is malformed
pub fn default_config() -> Result<MatchConfig, AddressError> {
    from_toml_str(DEFAULT_CONFIG_TOML)
}

/// Reads a configuration file from `path`.
///
/// # Errors
///
/// * [`AddressError::Io`] if the file cannot be read
/// * [`AddressError::Config`] if its contents are not a valid config
pub fn load_config(path: &Path) -> Result<MatchConfig, AddressError> {
    log::debug!("Loading match config from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_builtin_defaults() {
        assert_eq!(default_config().unwrap(), MatchConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config = from_toml_str("min_similarity = 0.7\nlcs_min_length = 6\n").unwrap();
        assert!((config.min_similarity - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.lcs_min_length, 6);
        assert!((config.aza_exact_bonus - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.position_bonus_window, 10);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        assert_eq!(from_toml_str("").unwrap(), MatchConfig::default());
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        assert!(matches!(
            from_toml_str("min_similarity = \"high\""),
            Err(AddressError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/matching.toml")),
            Err(AddressError::Io(_))
        ));
    }
}
