use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Roster seed ids are positive and unique
/// - Roster seed names are not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for doctor in &config.roster.seed {
        if doctor.id <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "roster.seed id must be positive, got {}",
                doctor.id
            )));
        }
        if doctor.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "roster.seed entry {} has a blank name",
                doctor.id
            )));
        }
        if !seen.insert(doctor.id) {
            return Err(ConfigError::ValidationError(format!(
                "roster.seed id {} appears more than once",
                doctor.id
            )));
        }
    }

    Ok(())
}
