use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Progress buffer is not 0
/// - Selected backends have their section present
/// - Engine poll interval is not 0
/// - Engine listen port leaves room for an exclusive port range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.orchestrator.progress_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.progress_buffer cannot be 0".to_string(),
        ));
    }

    if let Some(searcher) = &config.searcher {
        if searcher.jackett.is_none() {
            return Err(ConfigError::ValidationError(
                "searcher.jackett section is required for the jackett backend".to_string(),
            ));
        }
    }

    if let Some(tc) = &config.torrent_client {
        match &tc.librqbit {
            None => {
                return Err(ConfigError::ValidationError(
                    "torrent_client.librqbit section is required for the librqbit backend"
                        .to_string(),
                ))
            }
            Some(librqbit) if librqbit.poll_interval_ms == 0 => {
                return Err(ConfigError::ValidationError(
                    "torrent_client.librqbit.poll_interval_ms cannot be 0".to_string(),
                ))
            }
            Some(librqbit) if librqbit.listen_port == Some(u16::MAX) => {
                return Err(ConfigError::ValidationError(
                    "torrent_client.librqbit.listen_port must be below 65535".to_string(),
                ))
            }
            Some(_) => {}
        }
    }

    Ok(())
}
