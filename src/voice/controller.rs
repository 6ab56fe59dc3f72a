use std::collections::HashMap;

use tracing::{debug, error};

use super::{BotResponse, VoiceError, VoiceListener};

/// The two fields the dialog flow renders into.
pub trait DialogDisplay {
    fn set_response(&mut self, text: &str);
    fn set_transcript(&mut self, text: &str);
}

/// Renders bot callbacks into the display. Fulfillment is observed but not
/// acted on; errors are logged and the dialog stays usable.
pub struct DialogController<D> {
    display: D,
}

impl<D: DialogDisplay> DialogController<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }
}

impl<D: DialogDisplay> VoiceListener for DialogController<D> {
    fn on_response(&mut self, response: &BotResponse) {
        debug!("Bot response: {}", response.text_response);
        debug!("Transcript: {}", response.input_transcript);

        self.display.set_response(&response.text_response);
        self.display.set_transcript(&response.input_transcript);
    }

    fn on_ready_for_fulfillment(&mut self, intent: &str, slots: &HashMap<String, String>) {
        debug!(
            "Dialog ready for fulfillment: intent={}, slots={:?}",
            intent, slots
        );
    }

    fn on_error(&mut self, response_text: &str, error: &VoiceError) {
        error!("Dialog error: {} ({})", response_text, error);
    }
}
