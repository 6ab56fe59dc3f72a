use std::collections::HashMap;

use crate::shadow::{CHANNELS, Channel};

use super::{BotResponse, DialogState, VoiceInteraction, VoiceListener};

/// Offline stand-in for the hosted bot. Recognizes "turn <channel> on/off"
/// style utterances and elicits again on anything else, firing the same
/// listener callbacks a real interaction client would.
#[derive(Default)]
pub struct ScriptedBot;

impl ScriptedBot {
    fn match_toggle(utterance: &str) -> Option<(Channel, bool)> {
        let lower = utterance.to_lowercase();
        let channel = CHANNELS
            .into_iter()
            .find(|c| lower.contains(c.name()))?;
        let power = if lower.contains("off") {
            false
        } else if lower.contains("on") {
            true
        } else {
            return None;
        };
        Some((channel, power))
    }
}

impl VoiceInteraction for ScriptedBot {
    fn submit_text(&mut self, utterance: &str, listener: &mut dyn VoiceListener) {
        let response = match Self::match_toggle(utterance) {
            Some((channel, power)) => {
                let power_text = if power { "on" } else { "off" };
                let slots = HashMap::from([
                    ("device".to_string(), channel.name().to_string()),
                    ("power".to_string(), power_text.to_string()),
                ]);
                listener.on_ready_for_fulfillment("ToggleDevice", &slots);
                BotResponse {
                    text_response: format!("Okay, turning the {channel} {power_text}."),
                    input_transcript: utterance.to_string(),
                    intent: Some("ToggleDevice".to_string()),
                    slots,
                    dialog_state: DialogState::ReadyForFulfillment,
                }
            }
            None => BotResponse {
                text_response: "Sorry, I didn't get that. Try 'turn the light on'.".to_string(),
                input_transcript: utterance.to_string(),
                intent: None,
                slots: HashMap::new(),
                dialog_state: DialogState::ElicitIntent,
            },
        };
        listener.on_response(&response);
    }
}
