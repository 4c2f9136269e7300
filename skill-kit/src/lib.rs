//! Request routing and response building for voice-assistant skill webhooks.
//!
//! This crate parses the nested JSON event sent by the voice service, routes it
//! to a registered handler by request type or intent name, and serializes the
//! handler's [`Response`] back into the wire format.

pub mod case;
pub mod config;
pub mod directives;
pub mod error;
pub mod request;
pub mod response;
pub mod router;

#[cfg(test)]
mod fixtures;

pub use case::{to_camel, to_camel_case, to_snake, to_snake_case, SESSION_ATTRIBUTE_KEYS};
pub use config::SkillConfig;
pub use directives::{AudioItem, ClearBehavior, Directive, PlayBehavior, Stream};
pub use error::{BoxError, Error, Result};
pub use request::{
    request_types, Context, Event, Intent, Request, Session, SessionEndedReason, Slot,
};
pub use response::{Card, CardImage, OutputSpeech, Response};
pub use router::{HandlerResult, Skill, DEFAULT_FALLBACK_SPEECH};
