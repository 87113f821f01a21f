//! Saving and sharing session configurations
//!
//! A configuration is the triple (system, parameters, state). It round-trips
//! exactly through JSON, and the share token is the same JSON wrapped in
//! base64url.

use crate::error::SimulationError;
use crate::physics::math::Scalar;
use crate::physics::systems::{Parameters, SystemKind, SystemState};
use crate::session::SimulationSession;
use bevy::log::info;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod share;

/// Query parameter carrying the share token in a URL
pub const SHARE_QUERY_KEY: &str = "config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfiguration {
    /// Display name of the system, e.g. `"Lorenz Attractor"`
    pub system: String,
    pub parameters: BTreeMap<String, Scalar>,
    pub state: Vec<Scalar>,
}

impl SessionConfiguration {
    pub fn capture(session: &SimulationSession) -> Self {
        Self {
            system: session.system().display_name().to_string(),
            parameters: session.parameters().to_map(),
            state: session.state().as_slice().to_vec(),
        }
    }

    /// Validates the configuration against its system
    ///
    /// `system` may be a display name or a key. Parameters missing from the
    /// map keep their defaults; unknown ones are an error.
    pub fn resolve(&self) -> Result<(Parameters, SystemState), SimulationError> {
        let kind = SystemKind::from_display_name(&self.system)
            .or_else(|| SystemKind::from_key(&self.system))
            .ok_or_else(|| {
                SimulationError::configuration(format!("unknown system '{}'", self.system))
            })?;

        let mut parameters = kind.default_parameters();
        parameters.merge(&self.parameters)?;
        let state = SystemState::from_components(kind, &self.state)?;

        Ok((parameters, state))
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::configuration(format!("could not encode JSON: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::configuration(format!("malformed JSON: {e}")))
    }

    /// Compact JSON as a base64url token
    pub fn to_share_token(&self) -> Result<String, SimulationError> {
        let json = serde_json::to_string(self)
            .map_err(|e| SimulationError::configuration(format!("could not encode JSON: {e}")))?;
        Ok(share::encode(json.as_bytes()))
    }

    pub fn from_share_token(token: &str) -> Result<Self, SimulationError> {
        let bytes = share::decode(token.trim())
            .map_err(|e| SimulationError::configuration(format!("malformed share token: {e}")))?;
        let json = String::from_utf8(bytes).map_err(|_| {
            SimulationError::configuration("malformed share token: payload is not UTF-8")
        })?;
        Self::from_json(&json)
    }

    /// `base` with the share token appended as `?config=<token>`
    pub fn share_url(&self, base: &str) -> Result<String, SimulationError> {
        let separator = if base.contains('?') { '&' } else { '?' };
        Ok(format!(
            "{base}{separator}{SHARE_QUERY_KEY}={}",
            self.to_share_token()?
        ))
    }

    /// Reads a configuration file written by [`Self::write_to`]
    pub fn read_from(path: &Path) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::configuration(format!("could not read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
    }

    /// Writes into `directory` under [`default_file_name`], returning the path
    pub fn save_in(&self, directory: &Path, kind: SystemKind) -> std::io::Result<PathBuf> {
        let path = directory.join(default_file_name(kind, Local::now()));
        self.write_to(&path)?;
        info!("Saved configuration to {}", path.display());
        Ok(path)
    }
}

/// Extracts the share token from a URL's query string
pub fn token_from_url(url: &str) -> Option<&str> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == SHARE_QUERY_KEY && !value.is_empty()).then_some(value)
    })
}

/// `<system-key>-<timestamp>.json`
pub fn default_file_name(kind: SystemKind, now: DateTime<Local>) -> String {
    format!("{}-{}.json", kind.key(), now.format("%Y%m%d_%H%M%S_%3f"))
}

impl SimulationSession {
    pub fn save(&self) -> SessionConfiguration {
        SessionConfiguration::capture(self)
    }

    /// Replaces system, parameters and state from `config`
    ///
    /// On error the session is left exactly as it was. On success the
    /// history is cleared and time restarts at zero.
    pub fn load(&mut self, config: &SessionConfiguration) -> Result<(), SimulationError> {
        let (parameters, state) = config.resolve()?;
        info!("Loading {} configuration", parameters.kind().display_name());
        self.install(parameters, state);
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), SimulationError> {
        self.load(&SessionConfiguration::from_json(json)?)
    }

    pub fn load_share_token(&mut self, token: &str) -> Result<(), SimulationError> {
        self.load(&SessionConfiguration::from_share_token(token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_capture_uses_display_name() {
        let session = SimulationSession::new(SystemKind::Rossler);
        let config = session.save();
        assert_eq!(config.system, "Rössler Attractor");
        assert_eq!(config.state, vec![1.0, 1.0, 1.0]);
        assert_eq!(config.parameters.len(), 3);
    }

    #[test]
    fn test_json_shape() {
        let config = SimulationSession::new(SystemKind::VanDerPol).save();
        let value: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(value["system"], "Van der Pol Oscillator");
        assert_eq!(value["parameters"]["mu"], 1.0);
        assert_eq!(value["state"], serde_json::json!([1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_missing_parameters_fall_back_to_defaults() {
        let config = SessionConfiguration::from_json(
            r#"{"system": "Lorenz Attractor", "parameters": {"rho": 20.0}, "state": [0.0, 1.0, 2.0]}"#,
        )
        .unwrap();
        let (parameters, state) = config.resolve().unwrap();
        assert_eq!(parameters.get("rho"), Some(20.0));
        assert_eq!(parameters.get("sigma"), Some(10.0));
        assert_eq!(state, SystemState::Attractor([0.0, 1.0, 2.0]));
    }

    #[test]
    fn test_system_key_is_accepted() {
        let config = SessionConfiguration {
            system: "pendulum".into(),
            parameters: BTreeMap::new(),
            state: vec![0.1, 0.0, 0.2, 0.0],
        };
        let (parameters, _) = config.resolve().unwrap();
        assert_eq!(parameters.kind(), SystemKind::DoublePendulum);
    }

    #[test]
    fn test_invalid_configurations_leave_session_untouched() {
        let invalid = [
            r#"{"system": "Henon Map", "parameters": {}, "state": [0, 0, 0]}"#,
            r#"{"system": "Lorenz Attractor", "parameters": {"zeta": 1}, "state": [0, 0, 0]}"#,
            r#"{"system": "Lorenz Attractor", "parameters": {}, "state": [0, 0]}"#,
            r#"{"system": "Lorenz Attractor", "parameters": {}}"#,
            r#"not json"#,
        ];

        let mut session = SimulationSession::new(SystemKind::PointAttractor);
        session.step(0.01).unwrap();
        let before = session.save();

        for json in invalid {
            let error = session.load_json(json).unwrap_err();
            assert!(
                matches!(error, SimulationError::InvalidConfiguration(_)),
                "{json}: {error}"
            );
            assert_eq!(session.save(), before);
            assert_eq!(session.trajectory().len(), 1);
        }
    }

    #[test]
    fn test_share_token_round_trip() {
        let mut session = SimulationSession::new(SystemKind::DoublePendulum);
        session.step(0.01).unwrap();
        let config = session.save();

        let token = config.to_share_token().unwrap();
        assert!(token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        assert_eq!(SessionConfiguration::from_share_token(&token).unwrap(), config);
    }

    #[test]
    fn test_bad_share_tokens() {
        let not_json = share::encode(b"hello");
        let not_utf8 = share::encode(&[0xff, 0xfe, 0xfd]);
        for token in ["%%%", "abcde", not_json.as_str(), not_utf8.as_str()] {
            assert!(matches!(
                SessionConfiguration::from_share_token(token),
                Err(SimulationError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_share_url() {
        let config = SimulationSession::default().save();
        let url = config.share_url("https://example.org/phasedrift").unwrap();
        let token = token_from_url(&url).unwrap();
        assert_eq!(SessionConfiguration::from_share_token(token).unwrap(), config);

        let with_query = config.share_url("https://example.org/?theme=dark").unwrap();
        assert!(with_query.contains("?theme=dark&config="));
    }

    #[test]
    fn test_token_from_url() {
        assert_eq!(token_from_url("https://x.org/?a=1&config=abc#top"), Some("abc"));
        assert_eq!(token_from_url("https://x.org/?config="), None);
        assert_eq!(token_from_url("https://x.org/"), None);
    }

    #[test]
    fn test_default_file_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            default_file_name(SystemKind::Lorenz, now),
            "lorenz-20240309_140507_000.json"
        );
    }

    #[test]
    fn test_file_round_trip() {
        let directory =
            std::env::temp_dir().join(format!("phasedrift-test-{}", std::process::id()));
        let config = SimulationSession::new(SystemKind::Rossler).save();

        let path = config.save_in(&directory, SystemKind::Rossler).unwrap();
        assert_eq!(SessionConfiguration::read_from(&path).unwrap(), config);

        std::fs::remove_dir_all(&directory).unwrap();
        assert!(SessionConfiguration::read_from(&path).is_err());
    }
}
