//! Runtime configuration for the device core.
use serde::{Deserialize, Serialize};
use shared::config::ConfigError;
use shared::gesture::{Direction, Gesture};
use shared::kdf::{self, DEFAULT_ITERATIONS};

use crate::ui::PinPolarity;

pub const DEFAULT_MAX_FIELD_LEN: usize = 32;
pub const DEFAULT_MAX_REAUTH_FAILURES: u8 = 3;
pub const DEFAULT_LOCK_PRESS_COUNT: u8 = 3;

/// Settings consumed by [`VaultStore`](crate::storage::VaultStore) and the access state machine.
///
/// Every field has a default matching the reference device so partial JSON documents load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Gesture that unlocks the vault. Its length is the capture length on the lock screen.
    pub expected_gesture: Gesture,
    pub iterations: u32,
    /// Longest value accepted per field on the add-record screen.
    pub max_field_len: usize,
    /// Consecutive failed re-authentications tolerated before the device locks.
    pub max_reauth_failures: u8,
    /// Consecutive RESET presses on the main menu that lock the device.
    pub lock_press_count: u8,
    pub polarity: PinPolarity,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            expected_gesture: Gesture::from_directions([
                Direction::Up,
                Direction::Down,
                Direction::Up,
                Direction::Down,
                Direction::Up,
            ]),
            iterations: DEFAULT_ITERATIONS,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
            max_reauth_failures: DEFAULT_MAX_REAUTH_FAILURES,
            lock_press_count: DEFAULT_LOCK_PRESS_COUNT,
            polarity: PinPolarity::default(),
        }
    }
}

impl DeviceConfig {
    pub fn gesture_len(&self) -> usize {
        self.expected_gesture.len()
    }

    /// Reject settings that would make the vault unusable. Called before any key material exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        kdf::check_parameters(&self.expected_gesture, self.iterations)?;
        if self.max_field_len == 0 {
            return Err(ConfigError::FieldLength);
        }
        if self.max_reauth_failures == 0 {
            return Err(ConfigError::ReauthLimit);
        }
        if self.lock_press_count == 0 {
            return Err(ConfigError::LockPresses);
        }
        Ok(())
    }

    /// Check that a gesture supplied out of band has the configured length.
    pub fn check_gesture(&self, gesture: &Gesture) -> Result<(), ConfigError> {
        if gesture.len() != self.gesture_len() {
            return Err(ConfigError::GestureLength {
                expected: self.gesture_len(),
                actual: gesture.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = DeviceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gesture_len(), 5);
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut config = DeviceConfig {
            iterations: 0,
            ..DeviceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidIterations(0)));

        config.iterations = 1;
        config.expected_gesture = Gesture::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyGesture));

        config = DeviceConfig {
            max_field_len: 0,
            ..DeviceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FieldLength));

        config = DeviceConfig {
            max_reauth_failures: 0,
            ..DeviceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ReauthLimit));
    }

    #[test]
    fn foreign_gesture_length_is_checked() {
        let config = DeviceConfig::default();
        let short: Gesture = "up,down".parse().unwrap();

        assert_eq!(
            config.check_gesture(&short),
            Err(ConfigError::GestureLength {
                expected: 5,
                actual: 2
            })
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DeviceConfig =
            serde_json::from_str(r#"{"expected_gesture":["left","click","right"],"iterations":8}"#)
                .unwrap();

        assert_eq!(config.gesture_len(), 3);
        assert_eq!(config.iterations, 8);
        assert_eq!(config.max_field_len, DEFAULT_MAX_FIELD_LEN);
        assert_eq!(config.polarity, PinPolarity::ActiveLow);
    }
}
