use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label used when no session label has been stored yet, or a blank one is set.
pub const DEFAULT_SESSION_LABEL: &str = "Untitled inventory";

pub const DEFAULT_COOLDOWN_MS: u64 = 1200;

/// One committed scan: the trimmed decoded payload and when it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub code: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// Scanner behaviour, persisted as a camelCase JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub unique_only: bool,
    pub cooldown_ms: u64,
    pub beep_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unique_only: true,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            beep_enabled: true,
        }
    }
}

impl Settings {
    /// Merge a stored record over the defaults one field at a time.
    ///
    /// Fields that are missing or hold a value of the wrong type keep their
    /// default; the rest are kept. The legacy names `ignoreSameCodeCooldownMs`
    /// and `beep` are read when the current name is absent or unusable.
    /// Anything other than a JSON object yields the defaults.
    pub fn merge_stored(stored: &Value) -> Self {
        let mut settings = Self::default();
        let Some(fields) = stored.as_object() else {
            return settings;
        };

        if let Some(unique_only) = bool_field(fields, &["uniqueOnly"]) {
            settings.unique_only = unique_only;
        }
        if let Some(cooldown_ms) = fields
            .get("cooldownMs")
            .and_then(Value::as_u64)
            .or_else(|| fields.get("ignoreSameCodeCooldownMs").and_then(Value::as_u64))
        {
            settings.cooldown_ms = cooldown_ms;
        }
        if let Some(beep_enabled) = bool_field(fields, &["beepEnabled", "beep"]) {
            settings.beep_enabled = beep_enabled;
        }
        settings
    }
}

fn bool_field(fields: &Map<String, Value>, names: &[&str]) -> Option<bool> {
    names
        .iter()
        .find_map(|name| fields.get(*name).and_then(Value::as_bool))
}

/// The most recently processed decode. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastScanMarker {
    pub last_code: String,
    pub last_timestamp: i64,
}

/// Outcome of feeding one non-blank decode through the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The entry was appended. `seen_before` is set when the code was already
    /// in the log, which only happens with `unique_only` turned off.
    Accept { entry: ScanEntry, seen_before: bool },
    SuppressDuplicate { code: String },
    SuppressCooldown { code: String },
}

/// Audible cue tag requested by a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Ok,
    Dup,
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept { .. })
    }

    /// Whether the code had been logged before this decode, independent of
    /// whether it was appended.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Decision::Accept { seen_before, .. } => *seen_before,
            Decision::SuppressDuplicate { .. } => true,
            Decision::SuppressCooldown { .. } => false,
        }
    }

    /// Cooldown suppressions are silent.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Decision::SuppressCooldown { .. } => None,
            _ if self.is_duplicate() => Some(Cue::Dup),
            _ => Some(Cue::Ok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let s = Settings::default();
        assert!(s.unique_only);
        assert_eq!(s.cooldown_ms, 1200);
        assert!(s.beep_enabled);
    }

    fn merged(json: &str) -> Settings {
        Settings::merge_stored(&serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_settings_merge_missing_fields_over_defaults() {
        let s = merged(r#"{"uniqueOnly":false}"#);
        assert!(!s.unique_only);
        assert_eq!(s.cooldown_ms, 1200);
        assert!(s.beep_enabled);
    }

    #[test]
    fn test_settings_accepts_legacy_field_names() {
        let s = merged(r#"{"ignoreSameCodeCooldownMs":500,"beep":false}"#);
        assert_eq!(s.cooldown_ms, 500);
        assert!(!s.beep_enabled);
        assert!(s.unique_only);
    }

    #[test]
    fn test_settings_bad_field_keeps_the_others() {
        let s = merged(r#"{"uniqueOnly":false,"cooldownMs":null,"beepEnabled":"yes"}"#);
        assert!(!s.unique_only);
        assert_eq!(s.cooldown_ms, 1200);
        assert!(s.beep_enabled);

        let s = merged(r#"{"uniqueOnly":false,"cooldownMs":-5}"#);
        assert!(!s.unique_only);
        assert_eq!(s.cooldown_ms, 1200);
    }

    #[test]
    fn test_settings_current_name_wins_over_legacy() {
        let s = merged(r#"{"uniqueOnly":false,"ignoreSameCodeCooldownMs":800,"cooldownMs":900}"#);
        assert!(!s.unique_only);
        assert_eq!(s.cooldown_ms, 900);

        let s = merged(r#"{"ignoreSameCodeCooldownMs":800,"cooldownMs":"fast"}"#);
        assert_eq!(s.cooldown_ms, 800);
    }

    #[test]
    fn test_settings_non_object_yields_defaults() {
        assert_eq!(merged("[1,2]"), Settings::default());
        assert_eq!(merged("null"), Settings::default());
    }

    #[test]
    fn test_decision_cues() {
        let entry = ScanEntry {
            code: "A".to_string(),
            timestamp: 0,
        };
        let fresh = Decision::Accept {
            entry: entry.clone(),
            seen_before: false,
        };
        let repeat = Decision::Accept {
            entry,
            seen_before: true,
        };
        assert_eq!(fresh.cue(), Some(Cue::Ok));
        assert_eq!(repeat.cue(), Some(Cue::Dup));
        assert_eq!(
            Decision::SuppressDuplicate { code: "A".into() }.cue(),
            Some(Cue::Dup)
        );
        assert_eq!(Decision::SuppressCooldown { code: "A".into() }.cue(), None);
    }
}
