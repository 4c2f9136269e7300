//! Sample events shared by unit tests.

use serde_json::{json, Value};

pub(crate) const APP_ID: &str = "amzn1.ask.skill.3c392942-8efb-48a1-89ff-05af9eaa9c5e";
const USER_ID: &str = "amzn1.ask.account.TESTUSER";

fn session(is_new: bool) -> Value {
    json!({
        "new": is_new,
        "sessionId": "amzn1.echo-api.session.0001",
        "attributes": {},
        "user": {"userId": USER_ID},
        "application": {"applicationId": APP_ID}
    })
}

fn context(player_activity: &str) -> Value {
    json!({
        "AudioPlayer": {"playerActivity": player_activity},
        "System": {
            "device": {
                "deviceId": "amzn1.ask.device.0001",
                "supportedInterfaces": {"AudioPlayer": {}}
            },
            "application": {"applicationId": APP_ID},
            "user": {"userId": USER_ID},
            "apiEndpoint": "https://api.amazonalexa.com"
        }
    })
}

pub(crate) fn launch_request() -> Value {
    json!({
        "version": "1.0",
        "session": session(true),
        "context": context("IDLE"),
        "request": {
            "type": "LaunchRequest",
            "requestId": "amzn1.echo-api.request.launch",
            "timestamp": "2016-10-27T18:21:44Z",
            "locale": "en-US"
        }
    })
}

pub(crate) fn intent_request(name: &str, slots: Value) -> Value {
    json!({
        "version": "1.0",
        "session": session(false),
        "context": context("IDLE"),
        "request": {
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.intent",
            "timestamp": "2016-10-27T21:06:28Z",
            "locale": "en-US",
            "dialogState": "COMPLETED",
            "intent": {"name": name, "confirmationStatus": "NONE", "slots": slots}
        }
    })
}

pub(crate) fn session_ended_request() -> Value {
    json!({
        "version": "1.0",
        "session": session(false),
        "context": context("IDLE"),
        "request": {
            "type": "SessionEndedRequest",
            "requestId": "amzn1.echo-api.request.ended",
            "timestamp": "2016-10-27T21:11:41Z",
            "locale": "en-US",
            "reason": "ERROR",
            "error": {"type": "INVALID_RESPONSE", "message": "bad response"}
        }
    })
}

pub(crate) fn playback_started_request() -> Value {
    json!({
        "version": "1.0",
        "context": context("PLAYING"),
        "request": {
            "type": "AudioPlayer.PlaybackStarted",
            "requestId": "amzn1.echo-api.request.started",
            "timestamp": "2017-04-24T14:49:11Z",
            "locale": "en-US",
            "token": "track-1",
            "offsetInMilliseconds": 0
        }
    })
}

pub(crate) fn playback_failed_request() -> Value {
    json!({
        "version": "1.0",
        "context": context("STOPPED"),
        "request": {
            "type": "AudioPlayer.PlaybackFailed",
            "requestId": "amzn1.echo-api.request.failed",
            "timestamp": "2017-04-24T14:49:11Z",
            "locale": "en-US",
            "token": "track-1",
            "error": {"type": "MEDIA_ERROR_UNKNOWN", "message": "stream unavailable"},
            "currentPlaybackState": {
                "token": "track-1",
                "offsetInMilliseconds": 5000,
                "playerActivity": "PLAYING"
            }
        }
    })
}

pub(crate) fn exception_encountered_request() -> Value {
    json!({
        "version": "1.0",
        "context": context("IDLE"),
        "request": {
            "type": "System.ExceptionEncountered",
            "requestId": "amzn1.echo-api.request.exception",
            "timestamp": "2017-04-24T14:49:11Z",
            "locale": "en-US",
            "error": {"type": "INVALID_RESPONSE", "message": "Invalid directive"},
            "cause": {"requestId": "amzn1.echo-api.request.cause"}
        }
    })
}

pub(crate) fn playback_controller_request(request_type: &str) -> Value {
    json!({
        "version": "1.0",
        "context": context("PLAYING"),
        "request": {
            "type": request_type,
            "requestId": "amzn1.echo-api.request.controller",
            "timestamp": "2017-04-24T14:49:11Z",
            "locale": "en-US"
        }
    })
}

pub(crate) fn serialized_play_response() -> Value {
    json!({
        "version": "1.0",
        "sessionAttributes": {"last_track": "track-1", "queuePosition": 2},
        "response": {
            "outputSpeech": {"type": "PlainText", "text": "Resuming"},
            "shouldEndSession": true,
            "directives": [{
                "type": "AudioPlayer.Play",
                "playBehavior": "REPLACE_ALL",
                "audioItem": {
                    "stream": {
                        "url": "https://example.com/track-1.mp3",
                        "token": "track-1",
                        "offsetInMilliseconds": 0,
                        "expectedPreviousToken": "track-0"
                    }
                }
            }]
        }
    })
}
