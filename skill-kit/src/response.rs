//! Response builder returned by skill handlers.
//!
//! Handlers chain setters on a [`Response`] and the dispatcher serializes it
//! into the wire mapping. Unset optional parts are omitted from the output.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::directives::Directive;
use crate::Result;

const RESPONSE_VERSION: &str = "1.0";

/// Spoken output, either plain text or SSML markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

impl OutputSpeech {
    pub fn plain_text(text: impl Into<String>) -> Self {
        OutputSpeech::PlainText { text: text.into() }
    }

    pub fn ssml(ssml: impl Into<String>) -> Self {
        OutputSpeech::Ssml { ssml: ssml.into() }
    }
}

/// Card shown in the companion app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple {
        title: String,
        content: String,
    },
    Standard {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<CardImage>,
    },
    /// Prompts the user to link their account
    LinkAccount { content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image_url: Option<String>,
}

impl CardImage {
    fn from_urls(small_image_url: Option<&str>, large_image_url: Option<&str>) -> Option<Self> {
        let small_image_url = small_image_url.filter(|url| !url.is_empty());
        let large_image_url = large_image_url.filter(|url| !url.is_empty());
        if small_image_url.is_none() && large_image_url.is_none() {
            return None;
        }
        Some(Self {
            small_image_url: small_image_url.map(String::from),
            large_image_url: large_image_url.map(String::from),
        })
    }
}

/// Accumulates everything a handler wants to say back to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    version: String,
    output_speech: Option<OutputSpeech>,
    card: Option<Card>,
    reprompt: Option<OutputSpeech>,
    should_end_session: Option<bool>,
    directives: Vec<Directive>,
    session_attributes: Option<Map<String, Value>>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            output_speech: None,
            card: None,
            reprompt: None,
            should_end_session: Some(true),
            directives: Vec::new(),
            session_attributes: None,
        }
    }
}

impl Response {
    /// Empty response that ends the session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Say something and end the session.
    pub fn tell(text: impl Into<String>) -> Self {
        Self::new().speech(text)
    }

    /// Say something and keep the session open for the user's answer.
    pub fn ask(text: impl Into<String>) -> Self {
        Self::new().speech(text).end_session(false)
    }

    /// Response with no session flag, for directive-only audio player replies.
    pub fn empty() -> Self {
        Self {
            should_end_session: None,
            ..Self::default()
        }
    }

    pub fn speech(mut self, text: impl Into<String>) -> Self {
        self.output_speech = Some(OutputSpeech::plain_text(text));
        self
    }

    pub fn speech_ssml(mut self, ssml: impl Into<String>) -> Self {
        self.output_speech = Some(OutputSpeech::ssml(ssml));
        self
    }

    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(OutputSpeech::plain_text(text));
        self
    }

    pub fn reprompt_ssml(mut self, ssml: impl Into<String>) -> Self {
        self.reprompt = Some(OutputSpeech::ssml(ssml));
        self
    }

    pub fn simple_card(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.card = Some(Card::Simple {
            title: title.into(),
            content: content.into(),
        });
        self
    }

    /// Card with text and an optional image; the image is emitted only when a URL is given.
    pub fn standard_card(
        mut self,
        title: impl Into<String>,
        text: impl Into<String>,
        small_image_url: Option<&str>,
        large_image_url: Option<&str>,
    ) -> Self {
        let title: String = title.into();
        let text: String = text.into();
        self.card = Some(Card::Standard {
            title: Some(title).filter(|t| !t.is_empty()),
            text: Some(text).filter(|t| !t.is_empty()),
            image: CardImage::from_urls(small_image_url, large_image_url),
        });
        self
    }

    pub fn link_account_card(mut self, content: impl Into<String>) -> Self {
        self.card = Some(Card::LinkAccount {
            content: content.into(),
        });
        self
    }

    pub fn end_session(mut self, should_end_session: bool) -> Self {
        self.should_end_session = Some(should_end_session);
        self
    }

    pub fn add_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Replace the session attributes wholesale.
    pub fn session_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.session_attributes = Some(attributes);
        self
    }

    pub fn output_speech(&self) -> Option<&OutputSpeech> {
        self.output_speech.as_ref()
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn reprompt_speech(&self) -> Option<&OutputSpeech> {
        self.reprompt.as_ref()
    }

    pub fn should_end_session(&self) -> Option<bool> {
        self.should_end_session
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Attributes set by the handler, `None` if it never set any.
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.session_attributes.as_ref()
    }

    /// Wire mapping for this response.
    pub fn serialize(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    version: &'a str,
    session_attributes: &'a Map<String, Value>,
    response: Body<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Body<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_speech: Option<&'a OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<&'a Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reprompt: Option<Reprompt<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    should_end_session: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    directives: Option<&'a [Directive]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Reprompt<'a> {
    output_speech: &'a OutputSpeech,
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let no_attributes = Map::new();
        Envelope {
            version: &self.version,
            session_attributes: self.session_attributes.as_ref().unwrap_or(&no_attributes),
            response: Body {
                output_speech: self.output_speech.as_ref(),
                card: self.card.as_ref(),
                reprompt: self
                    .reprompt
                    .as_ref()
                    .map(|output_speech| Reprompt { output_speech }),
                should_end_session: self.should_end_session,
                directives: (!self.directives.is_empty()).then_some(self.directives.as_slice()),
            },
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directives::{ClearBehavior, PlayBehavior, Stream};
    use serde_json::json;

    #[test]
    fn test_speech_only_response_structure() {
        let value = Response::new().speech("Hi").serialize().unwrap();
        assert_eq!(
            value,
            json!({
                "version": "1.0",
                "sessionAttributes": {},
                "response": {
                    "outputSpeech": {"type": "PlainText", "text": "Hi"},
                    "shouldEndSession": true
                }
            })
        );
        let body = value["response"].as_object().unwrap();
        assert!(!body.contains_key("card"));
        assert!(!body.contains_key("reprompt"));
        assert!(!body.contains_key("directives"));
    }

    #[test]
    fn test_ssml_replaces_plain_text() {
        let ssml = "<speak>Hello <break time=\"1s\"/> there</speak>";
        let value = Response::tell("plain").speech_ssml(ssml).serialize().unwrap();
        assert_eq!(
            value["response"]["outputSpeech"],
            json!({"type": "SSML", "ssml": ssml})
        );
    }

    #[test]
    fn test_reprompt_nests_output_speech() {
        let value = Response::ask("What is your favorite color?")
            .reprompt("You can say, my favorite color is red")
            .serialize()
            .unwrap();
        assert_eq!(
            value["response"]["reprompt"],
            json!({"outputSpeech": {"type": "PlainText", "text": "You can say, my favorite color is red"}})
        );
        assert_eq!(value["response"]["shouldEndSession"], json!(false));

        let value = Response::ask("Spell it").reprompt_ssml("<speak>Again?</speak>").serialize().unwrap();
        assert_eq!(value["response"]["reprompt"]["outputSpeech"]["type"], json!("SSML"));
    }

    #[test]
    fn test_simple_card() {
        let value = Response::tell("ok").simple_card("Title!", "Some content!").serialize().unwrap();
        assert_eq!(
            value["response"]["card"],
            json!({"type": "Simple", "title": "Title!", "content": "Some content!"})
        );
    }

    #[test]
    fn test_standard_card_images() {
        let value = Response::tell("ok")
            .standard_card(
                "Title!",
                "Some text!",
                Some("https://example.com/small.png"),
                Some("https://example.com/large.png"),
            )
            .serialize()
            .unwrap();
        assert_eq!(
            value["response"]["card"],
            json!({
                "type": "Standard",
                "title": "Title!",
                "text": "Some text!",
                "image": {
                    "smallImageUrl": "https://example.com/small.png",
                    "largeImageUrl": "https://example.com/large.png"
                }
            })
        );

        let large_only = Response::tell("ok")
            .standard_card("Sanic", "Gotta go fast", None, Some("https://example.com/large.png"))
            .serialize()
            .unwrap();
        assert_eq!(
            large_only["response"]["card"]["image"],
            json!({"largeImageUrl": "https://example.com/large.png"})
        );

        let no_image = Response::tell("ok")
            .standard_card("Title", "Text", None, None)
            .serialize()
            .unwrap();
        assert!(no_image["response"]["card"].get("image").is_none());
    }

    #[test]
    fn test_cards_replace_each_other() {
        let response = Response::tell("ok")
            .simple_card("Hours", "5AM-8PM")
            .link_account_card("Link your account");
        assert_eq!(
            response.card(),
            Some(&Card::LinkAccount {
                content: "Link your account".to_string()
            })
        );
    }

    #[test]
    fn test_directive_order_is_preserved() {
        let value = Response::empty()
            .add_directive(Directive::stop())
            .add_directive(Directive::clear_queue(ClearBehavior::ClearAll))
            .add_directive(Directive::play(
                PlayBehavior::ReplaceAll,
                Stream::new("https://example.com/a.mp3", "a"),
            ))
            .serialize()
            .unwrap();
        let types: Vec<&str> = value["response"]["directives"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["type"].as_str().unwrap())
            .collect();
        assert_eq!(
            types,
            vec!["AudioPlayer.Stop", "AudioPlayer.ClearQueue", "AudioPlayer.Play"]
        );
        assert!(value["response"].get("shouldEndSession").is_none());
    }

    #[test]
    fn test_session_attributes_replace_not_merge() {
        let mut first = Map::new();
        first.insert("color".to_string(), json!("red"));
        let mut second = Map::new();
        second.insert("size".to_string(), json!("large"));

        let value = Response::tell("ok")
            .session_attributes(first)
            .session_attributes(second)
            .serialize()
            .unwrap();
        assert_eq!(value["sessionAttributes"], json!({"size": "large"}));
    }

    #[test]
    fn test_serialize_is_idempotent() {
        let response = Response::ask("Again?")
            .reprompt("Hello?")
            .simple_card("Previous order", "spaghetti");
        assert_eq!(response.serialize().unwrap(), response.serialize().unwrap());
    }

    #[test]
    fn test_end_session_flag() {
        assert_eq!(Response::new().should_end_session(), Some(true));
        let value = Response::tell("bye").end_session(false).serialize().unwrap();
        assert_eq!(value["response"]["shouldEndSession"], json!(false));
    }
}
