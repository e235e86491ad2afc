use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Output suffix is non-empty and a plain name fragment
/// - Converter timeout, when set, is not 0
/// - Placer buffer size is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let suffix = &config.output.suffix;
    if suffix.is_empty() {
        return Err(ConfigError::ValidationError(
            "output.suffix cannot be empty".to_string(),
        ));
    }
    if suffix.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "output.suffix cannot contain path separators: {suffix:?}"
        )));
    }

    if config.converter.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0 (omit it to disable the timeout)".to_string(),
        ));
    }

    if config.placer.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "placer.buffer_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_suffix_fails() {
        let mut config = Config::default();
        config.output.suffix = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_suffix_with_separator_fails() {
        let mut config = Config::default();
        config.output.suffix = "/wav".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.converter.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_buffer_fails() {
        let mut config = Config::default();
        config.placer.buffer_size = 0;
        assert!(validate_config(&config).is_err());
    }
}
