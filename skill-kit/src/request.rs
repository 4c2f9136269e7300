//! Models of the inbound event sent by the voice service.
//!
//! An [`Event`] is parsed once per invocation. The `request.type` string picks
//! exactly one [`Request`] variant; nested optional objects are populated only
//! when present on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::config::SkillConfig;
use crate::{Error, Result};

/// Wire names of every request type this crate understands.
pub mod request_types {
    pub const LAUNCH: &str = "LaunchRequest";
    pub const INTENT: &str = "IntentRequest";
    pub const SESSION_ENDED: &str = "SessionEndedRequest";
    pub const PLAYBACK_STARTED: &str = "AudioPlayer.PlaybackStarted";
    pub const PLAYBACK_FINISHED: &str = "AudioPlayer.PlaybackFinished";
    pub const PLAYBACK_STOPPED: &str = "AudioPlayer.PlaybackStopped";
    pub const PLAYBACK_NEARLY_FINISHED: &str = "AudioPlayer.PlaybackNearlyFinished";
    pub const PLAYBACK_FAILED: &str = "AudioPlayer.PlaybackFailed";
    pub const EXCEPTION_ENCOUNTERED: &str = "System.ExceptionEncountered";
    pub const NEXT_COMMAND_ISSUED: &str = "PlaybackController.NextCommandIssued";
    pub const PAUSE_COMMAND_ISSUED: &str = "PlaybackController.PauseCommandIssued";
    pub const PLAY_COMMAND_ISSUED: &str = "PlaybackController.PlayCommandIssued";
    pub const PREVIOUS_COMMAND_ISSUED: &str = "PlaybackController.PreviousCommandIssued";

    pub const ALL: &[&str] = &[
        LAUNCH,
        INTENT,
        SESSION_ENDED,
        PLAYBACK_STARTED,
        PLAYBACK_FINISHED,
        PLAYBACK_STOPPED,
        PLAYBACK_NEARLY_FINISHED,
        PLAYBACK_FAILED,
        EXCEPTION_ENCOUNTERED,
        NEXT_COMMAND_ISSUED,
        PAUSE_COMMAND_ISSUED,
        PLAY_COMMAND_ISSUED,
        PREVIOUS_COMMAND_ISSUED,
    ];
}

fn default_version() -> String {
    "1.0".to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Root inbound event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    #[serde(default = "default_version")]
    pub version: String,
    /// Absent for audio player and playback controller requests
    pub session: Option<Session>,
    pub context: Option<Context>,
    pub request: Request,
}

impl Event {
    /// Parse an inbound event mapping.
    ///
    /// Fails with [`Error::Schema`] when `request.type` is missing or unknown,
    /// or when a required field of the selected variant is absent.
    pub fn parse(event: Value) -> Result<Self> {
        match event.get("request").and_then(|request| request.get("type")) {
            None => return Err(Error::Schema("missing field 'request.type'".to_string())),
            Some(Value::String(request_type)) => {
                if !request_types::ALL.contains(&request_type.as_str()) {
                    return Err(Error::Schema(format!(
                        "unrecognized request type '{}'",
                        request_type
                    )));
                }
            }
            Some(other) => {
                return Err(Error::Schema(format!(
                    "'request.type' must be a string, got {}",
                    other
                )))
            }
        }

        serde_json::from_value(event).map_err(|e| Error::Schema(e.to_string()))
    }

    /// Application ID carried by the event, from the session or else the device context.
    pub fn application_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|session| session.application.application_id.as_str())
            .or_else(|| {
                self.context
                    .as_ref()
                    .and_then(|context| context.system.as_ref())
                    .and_then(|system| system.application.as_ref())
                    .map(|application| application.application_id.as_str())
            })
    }

    /// Check the event's application ID against the configured one.
    pub fn verify(&self, config: &SkillConfig) -> Result<()> {
        if !config.verify_application_id {
            return Ok(());
        }

        let expected = config.application_id.as_deref().unwrap_or_default();
        let received = self.application_id().unwrap_or_default();
        if expected.is_empty() || expected != received {
            return Err(Error::Authentication {
                expected: expected.to_string(),
                received: received.to_string(),
            });
        }
        Ok(())
    }

    pub fn intent(&self) -> Option<&Intent> {
        self.request.intent()
    }

    /// Value of a slot on the event's intent, if both exist and the slot is filled.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.intent().and_then(|intent| intent.slot_value(name))
    }

    pub fn session_attributes(&self) -> Option<&Map<String, Value>> {
        self.session.as_ref().map(|session| &session.attributes)
    }
}

/// Conversation session, present on standard requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    #[serde(rename = "new")]
    pub is_new: bool,
    /// Caller-defined attributes, never interpreted
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
    pub application: Application,
    pub user: User,
}

impl Session {
    pub fn application_id(&self) -> &str {
        &self.application.application_id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    /// Token from account linking
    pub access_token: Option<String>,
    pub permissions: Option<Permissions>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub consent_token: Option<String>,
}

/// State of the device and service at request time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: Option<SystemState>,
    #[serde(rename = "AudioPlayer")]
    pub audio_player: Option<PlaybackState>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    pub application: Option<Application>,
    pub user: Option<User>,
    pub device: Option<Device>,
    pub api_endpoint: Option<String>,
    pub api_access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supported_interfaces: Map<String, Value>,
}

impl Device {
    pub fn supports(&self, interface: &str) -> bool {
        self.supported_interfaces.contains_key(interface)
    }
}

/// Audio player state, reported in the context and on failed playback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub token: Option<String>,
    pub offset_in_milliseconds: Option<u64>,
    pub player_activity: Option<PlayerActivity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerActivity {
    Idle,
    Paused,
    Playing,
    BufferUnderrun,
    Finished,
    Stopped,
}

/// Request body, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
    #[serde(rename = "AudioPlayer.PlaybackStarted")]
    PlaybackStarted(AudioPlayerRequest),
    #[serde(rename = "AudioPlayer.PlaybackFinished")]
    PlaybackFinished(AudioPlayerRequest),
    #[serde(rename = "AudioPlayer.PlaybackStopped")]
    PlaybackStopped(AudioPlayerRequest),
    #[serde(rename = "AudioPlayer.PlaybackNearlyFinished")]
    PlaybackNearlyFinished(AudioPlayerRequest),
    #[serde(rename = "AudioPlayer.PlaybackFailed")]
    PlaybackFailed(PlaybackFailedRequest),
    #[serde(rename = "System.ExceptionEncountered")]
    ExceptionEncountered(ExceptionEncounteredRequest),
    #[serde(rename = "PlaybackController.NextCommandIssued")]
    NextCommandIssued(PlaybackControllerRequest),
    #[serde(rename = "PlaybackController.PauseCommandIssued")]
    PauseCommandIssued(PlaybackControllerRequest),
    #[serde(rename = "PlaybackController.PlayCommandIssued")]
    PlayCommandIssued(PlaybackControllerRequest),
    #[serde(rename = "PlaybackController.PreviousCommandIssued")]
    PreviousCommandIssued(PlaybackControllerRequest),
}

impl Request {
    /// Wire `type` of this request.
    pub fn type_name(&self) -> &'static str {
        use request_types::*;
        match self {
            Request::LaunchRequest(_) => LAUNCH,
            Request::IntentRequest(_) => INTENT,
            Request::SessionEndedRequest(_) => SESSION_ENDED,
            Request::PlaybackStarted(_) => PLAYBACK_STARTED,
            Request::PlaybackFinished(_) => PLAYBACK_FINISHED,
            Request::PlaybackStopped(_) => PLAYBACK_STOPPED,
            Request::PlaybackNearlyFinished(_) => PLAYBACK_NEARLY_FINISHED,
            Request::PlaybackFailed(_) => PLAYBACK_FAILED,
            Request::ExceptionEncountered(_) => EXCEPTION_ENCOUNTERED,
            Request::NextCommandIssued(_) => NEXT_COMMAND_ISSUED,
            Request::PauseCommandIssued(_) => PAUSE_COMMAND_ISSUED,
            Request::PlayCommandIssued(_) => PLAY_COMMAND_ISSUED,
            Request::PreviousCommandIssued(_) => PREVIOUS_COMMAND_ISSUED,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            Request::LaunchRequest(r) => &r.request_id,
            Request::IntentRequest(r) => &r.request_id,
            Request::SessionEndedRequest(r) => &r.request_id,
            Request::PlaybackStarted(r)
            | Request::PlaybackFinished(r)
            | Request::PlaybackStopped(r)
            | Request::PlaybackNearlyFinished(r) => &r.request_id,
            Request::PlaybackFailed(r) => &r.request_id,
            Request::ExceptionEncountered(r) => &r.request_id,
            Request::NextCommandIssued(r)
            | Request::PauseCommandIssued(r)
            | Request::PlayCommandIssued(r)
            | Request::PreviousCommandIssued(r) => &r.request_id,
        }
    }

    pub fn intent(&self) -> Option<&Intent> {
        match self {
            Request::IntentRequest(r) => Some(&r.intent),
            _ => None,
        }
    }

    pub fn is_audio_player(&self) -> bool {
        self.type_name().starts_with("AudioPlayer.")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub request_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub locale: Option<String>,
    pub dialog_state: Option<DialogState>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogState {
    Started,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ConfirmationStatus {
    #[serde(rename = "NONE")]
    Unconfirmed,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "DENIED")]
    Denied,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    pub confirmation_status: Option<ConfirmationStatus>,
    /// Every slot in the intent schema, filled or not
    #[serde(default, deserialize_with = "null_as_default")]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slot(name).and_then(|slot| slot.value.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    pub value: Option<String>,
    pub confirmation_status: Option<ConfirmationStatus>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub locale: Option<String>,
    pub reason: Option<SessionEndedReason>,
    pub error: Option<RequestError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEndedReason {
    UserInitiated,
    Error,
    ExceededMaxReprompts,
}

/// Error details reported by the voice service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlayerRequest {
    pub request_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub locale: Option<String>,
    pub token: Option<String>,
    pub offset_in_milliseconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackFailedRequest {
    pub request_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub locale: Option<String>,
    pub token: Option<String>,
    pub error: Option<RequestError>,
    pub current_playback_state: Option<PlaybackState>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionEncounteredRequest {
    pub request_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub locale: Option<String>,
    pub error: Option<RequestError>,
    pub cause: Option<Cause>,
}

/// Request that triggered a reported exception.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    pub request_id: Option<String>,
}

/// Hardware button press on the device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackControllerRequest {
    pub request_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub locale: Option<String>,
}
