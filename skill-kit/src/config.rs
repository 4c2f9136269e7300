//! Skill configuration loaded from environment variables.

use std::env;

use crate::{Error, Result};

/// Expected application ID for incoming events
pub const ENV_APPLICATION_ID: &str = "ALEXA_APPLICATION_ID";
/// `true`/`false`, defaults to `true`
pub const ENV_VERIFY_APPLICATION_ID: &str = "ALEXA_VERIFY_APPLICATION_ID";
/// `true`/`false`, defaults to `false`
pub const ENV_ECHO_SESSION_ATTRIBUTES: &str = "ALEXA_ECHO_SESSION_ATTRIBUTES";

/// Process-wide skill settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillConfig {
    /// Application ID assigned to the skill in the developer console
    pub application_id: Option<String>,
    /// Reject events whose application ID differs from `application_id`
    pub verify_application_id: bool,
    /// Carry incoming session attributes into responses that never set their own
    pub echo_session_attributes: bool,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            verify_application_id: true,
            echo_session_attributes: false,
        }
    }
}

impl SkillConfig {
    /// Config that verifies every event against `application_id`.
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: Some(application_id.into()),
            ..Self::default()
        }
    }

    /// Config that accepts events from any application.
    pub fn unverified() -> Self {
        Self {
            verify_application_id: false,
            ..Self::default()
        }
    }

    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_application_id = verify;
        self
    }

    pub fn with_session_echo(mut self, echo: bool) -> Self {
        self.echo_session_attributes = echo;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let application_id = lookup(ENV_APPLICATION_ID).filter(|id| !id.trim().is_empty());
        let verify_application_id = parse_flag(
            ENV_VERIFY_APPLICATION_ID,
            lookup(ENV_VERIFY_APPLICATION_ID),
            true,
        )?;
        let echo_session_attributes = parse_flag(
            ENV_ECHO_SESSION_ATTRIBUTES,
            lookup(ENV_ECHO_SESSION_ATTRIBUTES),
            false,
        )?;

        if verify_application_id && application_id.is_none() {
            return Err(Error::Config(format!(
                "{} must be set when {} is enabled",
                ENV_APPLICATION_ID, ENV_VERIFY_APPLICATION_ID
            )));
        }

        Ok(Self {
            application_id,
            verify_application_id,
            echo_session_attributes,
        })
    }
}

fn parse_flag(name: &str, raw: Option<String>, default: bool) -> Result<bool> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(Error::Config(format!("{} must be a boolean, got '{}'", name, value))),
        },
    }
}
