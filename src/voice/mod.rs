pub mod controller;
pub mod scripted;

use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("interaction failed: {0}")]
    Interaction(String),
}

/// Where the bot left the conversation after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    ElicitIntent,
    ReadyForFulfillment,
    Failed,
}

/// One bot turn: what the user was heard to say and what the bot answered.
#[derive(Debug, Clone, PartialEq)]
pub struct BotResponse {
    pub text_response: String,
    pub input_transcript: String,
    pub intent: Option<String>,
    pub slots: HashMap<String, String>,
    pub dialog_state: DialogState,
}

/// Callbacks fired by a voice interaction capability.
pub trait VoiceListener {
    fn on_response(&mut self, response: &BotResponse);
    fn on_ready_for_fulfillment(&mut self, intent: &str, slots: &HashMap<String, String>);
    fn on_error(&mut self, response_text: &str, error: &VoiceError);
}

/// A voice/text interaction capability the dialog controller is wired to.
pub trait VoiceInteraction {
    fn submit_text(&mut self, utterance: &str, listener: &mut dyn VoiceListener);
}
