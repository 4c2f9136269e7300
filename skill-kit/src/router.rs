//! Handler registry and dispatcher.
//!
//! A [`Skill`] maps request types and intent names to handler functions. It is
//! built once at cold start and then only read, so it can be shared behind an
//! `Arc` by the Lambda entry point.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::SkillConfig;
use crate::error::BoxError;
use crate::request::{request_types, Event, Request};
use crate::response::Response;
use crate::{Error, Result};

/// What a handler returns. `Ok(None)` means no response body, which is the
/// normal outcome for `SessionEndedRequest`.
pub type HandlerResult = std::result::Result<Option<Response>, BoxError>;

type Handler = Box<dyn Fn(&Event) -> HandlerResult + Send + Sync>;

/// Speech used when an intent has no handler and no fallback is registered.
pub const DEFAULT_FALLBACK_SPEECH: &str = "Sorry, I didn't understand your request";

/// A voice skill: configuration plus its handler registry.
pub struct Skill {
    config: SkillConfig,
    handlers: HashMap<String, Handler>,
    fallback: Option<Handler>,
}

impl fmt::Debug for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Skill")
            .field("config", &self.config)
            .field("handlers", &keys)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl Skill {
    pub fn new(config: SkillConfig) -> Self {
        if !config.verify_application_id {
            warn!("Application ID verification disabled, this skill will answer requests for any application");
        }
        Self {
            config,
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    fn register<F>(mut self, key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(key.into(), Box::new(handler));
        self
    }

    pub fn on_launch<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::LAUNCH, handler)
    }

    pub fn on_session_ended<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::SESSION_ENDED, handler)
    }

    pub fn on_intent<F>(self, intent_name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(intent_name, handler)
    }

    /// Handler for intents that have no handler of their own.
    pub fn on_fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }

    pub fn on_playback_started<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PLAYBACK_STARTED, handler)
    }

    pub fn on_playback_finished<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PLAYBACK_FINISHED, handler)
    }

    pub fn on_playback_stopped<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PLAYBACK_STOPPED, handler)
    }

    pub fn on_playback_nearly_finished<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PLAYBACK_NEARLY_FINISHED, handler)
    }

    pub fn on_playback_failed<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PLAYBACK_FAILED, handler)
    }

    pub fn on_exception_encountered<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::EXCEPTION_ENCOUNTERED, handler)
    }

    pub fn on_next_command<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::NEXT_COMMAND_ISSUED, handler)
    }

    pub fn on_pause_command<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PAUSE_COMMAND_ISSUED, handler)
    }

    pub fn on_play_command<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PLAY_COMMAND_ISSUED, handler)
    }

    pub fn on_previous_command<F>(self, handler: F) -> Self
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(request_types::PREVIOUS_COMMAND_ISSUED, handler)
    }

    /// Whether a request type or intent name has its own handler.
    pub fn has_handler(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Parse, verify, route and serialize one inbound event.
    ///
    /// Returns `Ok(None)` when the handler produced no response.
    pub fn dispatch(&self, event: Value) -> Result<Option<Value>> {
        let event = Event::parse(event)?;

        info!(
            request_type = event.request.type_name(),
            request_id = event.request.request_id(),
            intent = ?event.intent().map(|intent| intent.name.as_str()),
            "Dispatching request"
        );

        match self.handle(&event)? {
            Some(response) => {
                let value = response.serialize()?;
                debug!(response = %value, "Serialized response");
                Ok(Some(value))
            }
            None => {
                info!("Handler returned no response");
                Ok(None)
            }
        }
    }

    /// Verify and route an already parsed event, returning the handler's response.
    pub fn handle(&self, event: &Event) -> Result<Option<Response>> {
        event.verify(&self.config)?;

        let response = match self.select(&event.request)? {
            Some(handler) => handler(event).map_err(Error::Handler)?,
            None => Some(Response::tell(DEFAULT_FALLBACK_SPEECH)),
        };

        Ok(response.map(|response| self.echo_session_attributes(event, response)))
    }

    /// Intents resolve by name, then to the fallback; `Ok(None)` selects the
    /// built-in default. Every other request type must be registered.
    fn select(&self, request: &Request) -> Result<Option<&Handler>> {
        if let Some(intent) = request.intent() {
            if let Some(handler) = self.handlers.get(&intent.name) {
                return Ok(Some(handler));
            }
            if self.fallback.is_none() {
                warn!(intent = %intent.name, "Unhandled intent, using default fallback");
            }
            return Ok(self.fallback.as_ref());
        }

        self.handlers
            .get(request.type_name())
            .map(Some)
            .ok_or_else(|| Error::UnregisteredHandler(request.type_name().to_string()))
    }

    fn echo_session_attributes(&self, event: &Event, response: Response) -> Response {
        if !self.config.echo_session_attributes || response.attributes().is_some() {
            return response;
        }
        match event.session_attributes() {
            Some(attributes) if !attributes.is_empty() => response.session_attributes(attributes.clone()),
            _ => response,
        }
    }
}
