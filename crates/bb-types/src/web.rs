use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which side primary action buttons are aligned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandMode {
    Left,
    #[default]
    Right,
}

impl fmt::Display for HandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandMode::Left => write!(f, "left"),
            HandMode::Right => write!(f, "right"),
        }
    }
}

impl FromStr for HandMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(HandMode::Left),
            "right" => Ok(HandMode::Right),
            _ => Err(format!("Invalid hand mode: {}", s)),
        }
    }
}

/// Small UI preference flags persisted next to the session token.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPreferences {
    pub dark_mode: bool,
    pub colorblind_mode: bool,
    pub hand_mode: HandMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_defaults_fill_missing_fields() {
        let prefs: UiPreferences = serde_json::from_str(r#"{"darkMode":true}"#).unwrap();
        assert!(prefs.dark_mode);
        assert!(!prefs.colorblind_mode);
        assert_eq!(prefs.hand_mode, HandMode::Right);

        let json = serde_json::to_string(&UiPreferences {
            hand_mode: HandMode::Left,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json, r#"{"darkMode":false,"colorblindMode":false,"handMode":"left"}"#);
    }

    #[test]
    fn hand_mode_parse() {
        assert_eq!("LEFT".parse::<HandMode>().unwrap(), HandMode::Left);
        assert!("middle".parse::<HandMode>().is_err());
    }
}
