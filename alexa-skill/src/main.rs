//! Alexa Skill Lambda - Order Maker sample skill.
//!
//! Builds the handler registry once at cold start and routes every Alexa
//! event through it.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::{Map, Value};
use skill_kit::{
    Directive, Event, HandlerResult, PlayBehavior, Request, Response, Skill, SkillConfig, Stream,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const STREAM_URL: &str = "https://example.com/order-maker/hold-music.mp3";
const STREAM_TOKEN: &str = "hold-music";

fn launch(_event: &Event) -> HandlerResult {
    Ok(Some(
        Response::ask("Welcome to Order Maker! What would you like to order?")
            .reprompt("You can say, order spaghetti"),
    ))
}

fn session_ended(event: &Event) -> HandlerResult {
    if let Request::SessionEndedRequest(ended) = &event.request {
        info!(reason = ?ended.reason, error = ?ended.error, "Session ended");
    }
    Ok(None)
}

fn hours(_event: &Event) -> HandlerResult {
    Ok(Some(
        Response::tell("We're open 5AM to 8PM!").simple_card("Hours", "5AM-8PM"),
    ))
}

fn speed(_event: &Event) -> HandlerResult {
    Ok(Some(Response::tell("Gotta go fast").standard_card(
        "Speed",
        "Gotta go fast",
        None,
        Some("https://example.com/order-maker/speed.png"),
    )))
}

fn spell(_event: &Event) -> HandlerResult {
    Ok(Some(Response::new().speech_ssml(
        "<speak>Onomatopoeia: <say-as interpret-as=\"spell-out\">onomatopoeia</say-as>.</speak>",
    )))
}

fn order(event: &Event) -> HandlerResult {
    let Some(menu_item) = event.slot_value("MenuItem") else {
        return Ok(Some(
            Response::ask("I didn't catch that. What would you like to order?")
                .reprompt("You can say, order spaghetti"),
        ));
    };

    let mut attributes = Map::new();
    attributes.insert("last_order".to_string(), Value::String(menu_item.to_string()));

    Ok(Some(
        Response::tell(format!("You just ordered {}", menu_item))
            .simple_card("Previous order", menu_item)
            .session_attributes(attributes),
    ))
}

fn resume(_event: &Event) -> HandlerResult {
    Ok(Some(Response::empty().add_directive(Directive::play(
        PlayBehavior::ReplaceAll,
        Stream::new(STREAM_URL, STREAM_TOKEN),
    ))))
}

fn pause(_event: &Event) -> HandlerResult {
    Ok(Some(Response::empty().add_directive(Directive::stop())))
}

fn playback_event(event: &Event) -> HandlerResult {
    info!(request_type = event.request.type_name(), "Playback event");
    Ok(Some(Response::empty()))
}

fn playback_failed(event: &Event) -> HandlerResult {
    if let Request::PlaybackFailed(failure) = &event.request {
        warn!(token = ?failure.token, error = ?failure.error, "Playback failed");
    }
    Ok(Some(Response::empty().add_directive(Directive::stop())))
}

fn exception_encountered(event: &Event) -> HandlerResult {
    if let Request::ExceptionEncountered(exception) = &event.request {
        error!(error = ?exception.error, cause = ?exception.cause, "Device reported an exception");
    }
    Ok(None)
}

fn unimplemented_intent(event: &Event) -> HandlerResult {
    let name = event.intent().map(|intent| intent.name.as_str()).unwrap_or("That");
    Ok(Some(
        Response::ask(format!("Sorry, {} isn't implemented!", name)).reprompt("What would you like to order?"),
    ))
}

fn build_skill(config: SkillConfig) -> Skill {
    Skill::new(config)
        .on_launch(launch)
        .on_session_ended(session_ended)
        .on_intent("HoursIntent", hours)
        .on_intent("SpeedIntent", speed)
        .on_intent("SpellIntent", spell)
        .on_intent("OrderIntent", order)
        .on_intent("AMAZON.ResumeIntent", resume)
        .on_intent("AMAZON.PauseIntent", pause)
        .on_playback_started(playback_event)
        .on_playback_finished(playback_event)
        .on_playback_stopped(playback_event)
        .on_playback_nearly_finished(playback_event)
        .on_playback_failed(playback_failed)
        .on_exception_encountered(exception_encountered)
        .on_fallback(unimplemented_intent)
}

async fn handler(skill: Arc<Skill>, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let (payload, context) = event.into_parts();

    info!(
        request_id = %context.request_id,
        log_group = %context.env_config.log_group,
        log_stream = %context.env_config.log_stream,
        memory_limit_mb = context.env_config.memory,
        "Received Alexa event"
    );

    match skill.dispatch(payload) {
        Ok(response) => Ok(response.unwrap_or(Value::Null)),
        Err(e) => {
            error!(status = e.status_code(), "Failed to handle Alexa event: {}", e);
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let skill = Arc::new(build_skill(SkillConfig::from_env()?));

    run(service_fn(move |event| {
        let skill = Arc::clone(&skill);
        async move { handler(skill, event).await }
    }))
    .await
}
