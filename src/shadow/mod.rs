pub mod controller;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Delta steps the panel can request. Anything else is rejected before a
/// patch is built.
pub const DELTA_STEPS: [u8; 6] = [5, 10, 15, 20, 25, 30];

#[derive(Debug, thiserror::Error)]
pub enum ShadowError {
    #[error("delta step {0} is not one of {DELTA_STEPS:?}")]
    InvalidDeltaStep(u8),
    #[error("unknown channel '{0}'")]
    UnknownChannel(String),
}

/// One of the four device channels mirrored in the shadow document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Light,
    Sound,
    Ultra,
    Rotary,
}

pub const CHANNELS: [Channel; 4] = [
    Channel::Light,
    Channel::Sound,
    Channel::Ultra,
    Channel::Rotary,
];

impl Channel {
    pub fn name(self) -> &'static str {
        match self {
            Channel::Light => "light",
            Channel::Sound => "sound",
            Channel::Ultra => "ultra",
            Channel::Rotary => "rotary",
        }
    }

    /// Desired-state field for on/off toggles, e.g. `lightStatus`.
    pub fn status_field(self) -> &'static str {
        match self {
            Channel::Light => "lightStatus",
            Channel::Sound => "soundStatus",
            Channel::Ultra => "ultraStatus",
            Channel::Rotary => "rotaryStatus",
        }
    }

    /// Desired-state field for step adjustments, e.g. `lightDelta`.
    pub fn delta_field(self) -> &'static str {
        match self {
            Channel::Light => "lightDelta",
            Channel::Sound => "soundDelta",
            Channel::Ultra => "ultraDelta",
            Channel::Rotary => "rotaryDelta",
        }
    }

    /// Reported-state field the device answers with, e.g. `lightValue`.
    pub fn value_field(self) -> &'static str {
        match self {
            Channel::Light => "lightValue",
            Channel::Sound => "soundValue",
            Channel::Ultra => "ultraValue",
            Channel::Rotary => "rotaryValue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Channel::Light),
            "sound" => Ok(Channel::Sound),
            "ultra" => Ok(Channel::Ultra),
            "rotary" => Ok(Channel::Rotary),
            other => Err(ShadowError::UnknownChannel(other.to_string())),
        }
    }
}

/// A validated delta step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaStep(u8);

impl DeltaStep {
    pub fn new(value: u8) -> Result<Self, ShadowError> {
        if DELTA_STEPS.contains(&value) {
            Ok(DeltaStep(value))
        } else {
            Err(ShadowError::InvalidDeltaStep(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// A panel action, decoupled from whatever input surface produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Toggle { channel: Channel, on: bool },
    Delta { channel: Channel, step: DeltaStep },
}

/// Build the desired-state patch for one panel action:
/// `{"state":{"desired":{"<field>": <int>}}}`.
pub fn desired_patch(event: &ControlEvent) -> Value {
    let (field, value) = match *event {
        ControlEvent::Toggle { channel, on } => (channel.status_field(), u8::from(on)),
        ControlEvent::Delta { channel, step } => (channel.delta_field(), step.value()),
    };
    json!({ "state": { "desired": { (field): value } } })
}

// Serde structs for the inbound shadow document. Parsed only far enough to
// pull one reported scalar out.
#[derive(Deserialize, Default)]
struct ShadowDocument {
    #[serde(default)]
    state: ShadowState,
}

#[derive(Deserialize, Default)]
struct ShadowState {
    #[serde(default)]
    reported: Map<String, Value>,
}

/// Extract `state.reported.<channel>Value` from an inbound shadow message.
/// Returns None when the payload is not JSON or the field is absent.
pub fn reported_value(payload: &str, channel: Channel) -> Option<String> {
    let doc: ShadowDocument = serde_json::from_str(payload).ok()?;
    doc.state
        .reported
        .get(channel.value_field())?
        .as_str()
        .map(String::from)
}
