use tracing::{debug, warn};

use super::{CHANNELS, Channel, ControlEvent, desired_patch, reported_value};

/// Best-effort publish of a desired-state patch. No acknowledgment, no retry.
pub trait ShadowPublisher {
    fn publish(&mut self, payload: String);
}

/// The fields the panel renders into.
pub trait PanelDisplay {
    fn set_channel_text(&mut self, channel: Channel, text: &str);
    fn set_last_message(&mut self, raw: &str);
    fn set_status(&mut self, status: &str);
}

/// Drives the device-shadow flow: panel events out, reported state back in.
///
/// Tracks which toggles are currently on so inbound reported values are only
/// rendered for active channels. Every failure is logged and swallowed; the
/// panel stays responsive.
pub struct ShadowController<P, D> {
    publisher: P,
    display: D,
    toggles: [bool; CHANNELS.len()],
}

fn slot(channel: Channel) -> usize {
    match channel {
        Channel::Light => 0,
        Channel::Sound => 1,
        Channel::Ultra => 2,
        Channel::Rotary => 3,
    }
}

impl<P: ShadowPublisher, D: PanelDisplay> ShadowController<P, D> {
    pub fn new(publisher: P, display: D) -> Self {
        Self {
            publisher,
            display,
            toggles: [false; CHANNELS.len()],
        }
    }

    /// Handle one panel action: update the local toggle state and display,
    /// then publish the desired-state patch.
    pub fn handle_event(&mut self, event: ControlEvent) {
        if let ControlEvent::Toggle { channel, on } = event {
            self.toggles[slot(channel)] = on;
            // Immediate feedback while the device catches up.
            let text = if on { "Waiting..." } else { "OFF" };
            self.display.set_channel_text(channel, text);
        }
        let patch = desired_patch(&event);
        debug!("Publishing patch: {}", patch);
        self.publisher.publish(patch.to_string());
    }

    /// Handle one inbound shadow message. The raw payload is always shown;
    /// a channel field only updates while its toggle is on.
    pub fn handle_message(&mut self, payload: &str) {
        for channel in CHANNELS {
            if !self.toggles[slot(channel)] {
                continue;
            }
            if let Some(value) = reported_value(payload, channel) {
                self.display.set_channel_text(channel, &value);
            }
        }
        self.display.set_last_message(payload);
    }

    pub fn set_status(&mut self, status: &str) {
        self.display.set_status(status);
    }
}

/// Publisher backed by the channel into the MQTT task. A closed channel means
/// the transport is gone; the event is dropped with a warning.
pub struct MqttPatchPublisher {
    tx: tokio::sync::mpsc::Sender<String>,
}

impl MqttPatchPublisher {
    pub fn new(tx: tokio::sync::mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

impl ShadowPublisher for MqttPatchPublisher {
    fn publish(&mut self, payload: String) {
        if self.tx.try_send(payload).is_err() {
            warn!("Patch channel closed or full, dropping publish");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::DeltaStep;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct RecordingPublisher {
        published: Rc<RefCell<Vec<String>>>,
    }

    impl ShadowPublisher for RecordingPublisher {
        fn publish(&mut self, payload: String) {
            self.published.borrow_mut().push(payload);
        }
    }

    #[derive(Default)]
    struct PanelState {
        channels: HashMap<&'static str, String>,
        last_message: Option<String>,
        status: Option<String>,
    }

    #[derive(Default, Clone)]
    struct RecordingPanel {
        state: Rc<RefCell<PanelState>>,
    }

    impl RecordingPanel {
        fn channel_text(&self, channel: Channel) -> Option<String> {
            self.state.borrow().channels.get(channel.name()).cloned()
        }

        fn last_message(&self) -> Option<String> {
            self.state.borrow().last_message.clone()
        }

        fn status(&self) -> Option<String> {
            self.state.borrow().status.clone()
        }
    }

    impl PanelDisplay for RecordingPanel {
        fn set_channel_text(&mut self, channel: Channel, text: &str) {
            self.state
                .borrow_mut()
                .channels
                .insert(channel.name(), text.to_string());
        }

        fn set_last_message(&mut self, raw: &str) {
            self.state.borrow_mut().last_message = Some(raw.to_string());
        }

        fn set_status(&mut self, status: &str) {
            self.state.borrow_mut().status = Some(status.to_string());
        }
    }

    fn harness() -> (
        RecordingPublisher,
        RecordingPanel,
        ShadowController<RecordingPublisher, RecordingPanel>,
    ) {
        let publisher = RecordingPublisher::default();
        let panel = RecordingPanel::default();
        let controller = ShadowController::new(publisher.clone(), panel.clone());
        (publisher, panel, controller)
    }

    #[test]
    fn toggle_publishes_status_patch_and_updates_display() {
        let (publisher, panel, mut controller) = harness();

        controller.handle_event(ControlEvent::Toggle {
            channel: Channel::Light,
            on: true,
        });
        controller.handle_event(ControlEvent::Toggle {
            channel: Channel::Light,
            on: false,
        });

        assert_eq!(
            *publisher.published.borrow(),
            vec![
                r#"{"state":{"desired":{"lightStatus":1}}}"#,
                r#"{"state":{"desired":{"lightStatus":0}}}"#,
            ]
        );
        assert_eq!(panel.channel_text(Channel::Light).as_deref(), Some("OFF"));
    }

    #[test]
    fn delta_publishes_selected_step_verbatim() {
        let (publisher, _panel, mut controller) = harness();

        controller.handle_event(ControlEvent::Delta {
            channel: Channel::Rotary,
            step: DeltaStep::new(15).unwrap(),
        });

        assert_eq!(
            *publisher.published.borrow(),
            vec![r#"{"state":{"desired":{"rotaryDelta":15}}}"#]
        );
    }

    #[test]
    fn reported_value_renders_only_while_toggle_is_on() {
        let (_publisher, panel, mut controller) = harness();
        let payload = r#"{"state":{"reported":{"lightValue":"42"}}}"#;

        // Toggle off: channel display untouched, raw message still shown.
        controller.handle_message(payload);
        assert_eq!(panel.channel_text(Channel::Light), None);
        assert_eq!(panel.last_message().as_deref(), Some(payload));

        controller.handle_event(ControlEvent::Toggle {
            channel: Channel::Light,
            on: true,
        });
        controller.handle_message(payload);
        assert_eq!(panel.channel_text(Channel::Light).as_deref(), Some("42"));
    }

    #[test]
    fn malformed_payload_only_updates_last_message() {
        let (_publisher, panel, mut controller) = harness();

        controller.handle_event(ControlEvent::Toggle {
            channel: Channel::Sound,
            on: true,
        });

        controller.handle_message("{not json");
        // Channel text still shows the toggle feedback, not a parsed value.
        assert_eq!(
            panel.channel_text(Channel::Sound).as_deref(),
            Some("Waiting...")
        );
        assert_eq!(panel.last_message().as_deref(), Some("{not json"));
    }

    #[test]
    fn connection_status_reaches_the_label() {
        let (_publisher, panel, mut controller) = harness();
        controller.set_status("Connected");
        assert_eq!(panel.status().as_deref(), Some("Connected"));
    }
}
