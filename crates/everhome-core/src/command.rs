// ── Entity commands ──
//
// Typed intents resolved against a device into the action name and
// parameters the execute endpoint expects.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{Category, Device, brightness_to_device};

// Action names understood by the Everhome cloud.
pub const ACTION_UP: &str = "up";
pub const ACTION_DOWN: &str = "down";
pub const ACTION_STOP: &str = "stop";
pub const ACTION_SET_POSITION: &str = "set_position";
pub const ACTION_ON: &str = "on";
pub const ACTION_OFF: &str = "off";
pub const ACTION_SET_BRIGHTNESS: &str = "set_brightness";

/// A command aimed at one device.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Covers ───────────────────────────────────────────────────────
    Open,
    Close,
    Stop,
    /// Target position, 0 (closed) to 100 (open).
    SetPosition(u8),

    // ── Switches and lights ──────────────────────────────────────────
    TurnOn,
    TurnOff,
    /// Target brightness on the 0..=255 presentation scale.
    SetBrightness(u8),

    /// Send an arbitrary action without validation.
    Custom {
        action: String,
        params: Map<String, Value>,
    },
}

/// Action name plus parameters, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    pub action: String,
    pub params: Map<String, Value>,
}

impl ResolvedAction {
    fn bare(action: &str) -> Self {
        Self {
            action: action.to_owned(),
            params: Map::new(),
        }
    }

    fn with_param(action: &str, key: &str, value: impl Into<Value>) -> Self {
        let mut params = Map::new();
        params.insert(key.to_owned(), value.into());
        Self {
            action: action.to_owned(),
            params,
        }
    }
}

impl Command {
    /// Short name for logs and errors.
    pub fn name(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Stop => "stop",
            Self::SetPosition(_) => "set position",
            Self::TurnOn => "turn on",
            Self::TurnOff => "turn off",
            Self::SetBrightness(_) => "set brightness",
            Self::Custom { action, .. } => action,
        }
    }

    /// Resolve this command against `device`.
    ///
    /// Fails when the command does not apply to the device's category or
    /// carries an out-of-range value.
    pub fn resolve(&self, device: &Device) -> Result<ResolvedAction, CoreError> {
        if let Self::Custom { action, params } = self {
            return Ok(ResolvedAction {
                action: action.clone(),
                params: params.clone(),
            });
        }

        let category = device.category().ok_or_else(|| {
            CoreError::validation(format!(
                "device {} has unsupported subtype {:?}",
                device.id,
                device.subtype.as_deref().unwrap_or_default()
            ))
        })?;

        match (category, self) {
            (Category::Cover, Self::Open) => Ok(ResolvedAction::bare(ACTION_UP)),
            (Category::Cover, Self::Close) => Ok(ResolvedAction::bare(ACTION_DOWN)),
            (Category::Cover, Self::Stop) => Ok(ResolvedAction::bare(ACTION_STOP)),
            (Category::Cover, Self::SetPosition(position)) => {
                if *position > 100 {
                    return Err(CoreError::validation(format!(
                        "position {position} is outside 0-100"
                    )));
                }
                if device.has_capability(ACTION_SET_POSITION) {
                    Ok(ResolvedAction::with_param(
                        ACTION_SET_POSITION,
                        "position",
                        *position,
                    ))
                } else if *position > 50 {
                    Ok(ResolvedAction::bare(ACTION_UP))
                } else {
                    Ok(ResolvedAction::bare(ACTION_DOWN))
                }
            }
            (Category::Switch | Category::Light, Self::TurnOn) => Ok(ResolvedAction::bare(ACTION_ON)),
            (Category::Switch | Category::Light, Self::TurnOff) => {
                Ok(ResolvedAction::bare(ACTION_OFF))
            }
            (Category::Light, Self::SetBrightness(level)) => {
                if device.has_capability(ACTION_SET_BRIGHTNESS) || device.has_capability("brightness") {
                    Ok(ResolvedAction::with_param(
                        ACTION_SET_BRIGHTNESS,
                        "brightness",
                        brightness_to_device(*level),
                    ))
                } else {
                    Ok(ResolvedAction::bare(ACTION_ON))
                }
            }
            (category, command) => Err(CoreError::validation(format!(
                "cannot {} a {category} device ({})",
                command.name(),
                device.id
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceId, DeviceState};
    use serde_json::json;

    fn device(subtype: &str, capabilities: &[&str]) -> Device {
        Device {
            id: DeviceId::from("d1"),
            subtype: Some(subtype.into()),
            name: None,
            model: None,
            firmware_version: None,
            position: None,
            capabilities: capabilities.iter().map(|c| (*c).to_owned()).collect(),
            state: DeviceState::default(),
            attributes: Map::new(),
        }
    }

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn cover_directions() {
        let blind = device("blind", &[]);
        assert_eq!(Command::Open.resolve(&blind).unwrap().action, "up");
        assert_eq!(Command::Close.resolve(&blind).unwrap().action, "down");
        assert_eq!(Command::Stop.resolve(&blind).unwrap().action, "stop");
    }

    #[test]
    fn set_position_with_capability() {
        let shutter = device("shutter", &["set_position"]);
        let resolved = Command::SetPosition(40).resolve(&shutter).unwrap();
        assert_eq!(resolved.action, "set_position");
        assert_eq!(resolved.params, params(json!({ "position": 40 })));
    }

    #[test]
    fn set_position_falls_back_to_direction() {
        let shutter = device("shutter", &[]);
        assert_eq!(Command::SetPosition(51).resolve(&shutter).unwrap().action, "up");
        assert_eq!(Command::SetPosition(50).resolve(&shutter).unwrap().action, "down");
        assert!(Command::SetPosition(0).resolve(&shutter).unwrap().params.is_empty());
    }

    #[test]
    fn set_position_out_of_range() {
        let shutter = device("shutter", &["set_position"]);
        assert!(matches!(
            Command::SetPosition(101).resolve(&shutter),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn switch_on_off() {
        let socket = device("socket", &[]);
        assert_eq!(Command::TurnOn.resolve(&socket).unwrap().action, "on");
        assert_eq!(Command::TurnOff.resolve(&socket).unwrap().action, "off");
    }

    #[test]
    fn light_brightness_is_rescaled() {
        let light = device("light", &["set_brightness"]);
        let resolved = Command::SetBrightness(255).resolve(&light).unwrap();
        assert_eq!(resolved.action, "set_brightness");
        assert_eq!(resolved.params, params(json!({ "brightness": 100 })));

        let resolved = Command::SetBrightness(128).resolve(&light).unwrap();
        assert_eq!(resolved.params, params(json!({ "brightness": 50 })));
    }

    #[test]
    fn light_without_dimmer_just_turns_on() {
        let light = device("light", &[]);
        let resolved = Command::SetBrightness(10).resolve(&light).unwrap();
        assert_eq!(resolved, ResolvedAction::bare("on"));
    }

    #[test]
    fn category_mismatch_is_rejected() {
        let err = Command::Open.resolve(&device("socket", &[])).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(Command::TurnOn.resolve(&device("door", &[])).is_err());
        assert!(Command::SetBrightness(5).resolve(&device("socket", &[])).is_err());
        assert!(Command::TurnOn.resolve(&device("thermostat", &[])).is_err());
    }

    #[test]
    fn custom_passes_through() {
        let command = Command::Custom {
            action: "toggle".into(),
            params: params(json!({ "duration": 5 })),
        };
        let resolved = command.resolve(&device("thermostat", &[])).unwrap();
        assert_eq!(resolved.action, "toggle");
        assert_eq!(resolved.params, params(json!({ "duration": 5 })));
    }
}
