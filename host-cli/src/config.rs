use std::fs;
use std::path::Path;

use firmware::DeviceConfig;
use log::debug;
use shared::error::SharedError;

/// Load the device configuration from an optional JSON file.
///
/// Missing keys fall back to the device defaults; the result is validated before use.
pub fn load_device_config(path: Option<&Path>) -> Result<DeviceConfig, SharedError> {
    let config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|err| {
                SharedError::Input(format!(
                    "failed to read config from '{}': {err}",
                    path.display()
                ))
            })?;
            debug!("loaded config from {}", path.display());
            serde_json::from_str(&raw)
                .map_err(|err| SharedError::Input(format!("invalid config file: {err}")))?
        }
        None => DeviceConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
