//! Audio player directives attached to a response.

use serde::Serialize;

/// Out-of-band device command. Order within a response is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "AudioPlayer.Play", rename_all = "camelCase")]
    Play {
        play_behavior: PlayBehavior,
        audio_item: AudioItem,
    },
    #[serde(rename = "AudioPlayer.Stop")]
    Stop,
    #[serde(rename = "AudioPlayer.ClearQueue", rename_all = "camelCase")]
    ClearQueue { clear_behavior: ClearBehavior },
}

impl Directive {
    pub fn play(play_behavior: PlayBehavior, stream: Stream) -> Self {
        Directive::Play {
            play_behavior,
            audio_item: AudioItem { stream },
        }
    }

    pub fn stop() -> Self {
        Directive::Stop
    }

    pub fn clear_queue(clear_behavior: ClearBehavior) -> Self {
        Directive::ClearQueue { clear_behavior }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    /// Add to the end of the queue
    Enqueue,
    /// Stop current playback and replace the whole queue
    ReplaceAll,
    /// Keep the current stream, replace everything queued after it
    ReplaceEnqueued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearBehavior {
    /// Clear the queue and stop the current stream
    ClearAll,
    /// Clear the queue, let the current stream finish
    ClearEnqueued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioItem {
    pub stream: Stream,
}

/// Audio stream to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub url: String,
    pub token: String,
    pub offset_in_milliseconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_previous_token: Option<String>,
}

impl Stream {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            offset_in_milliseconds: 0,
            expected_previous_token: None,
        }
    }

    pub fn offset(mut self, offset_in_milliseconds: u64) -> Self {
        self.offset_in_milliseconds = offset_in_milliseconds;
        self
    }

    /// Only valid with [`PlayBehavior::Enqueue`].
    pub fn expected_previous_token(mut self, token: impl Into<String>) -> Self {
        self.expected_previous_token = Some(token.into());
        self
    }
}
