use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Incoming, MqttOptions, QoS};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;

pub struct MqttClient {
    client: AsyncClient,
    eventloop: EventLoop,
    topic: String,
}

impl MqttClient {
    pub fn new(config: &Config) -> Self {
        let mut mqttopts = MqttOptions::new(
            &config.mqtt.client_id,
            &config.mqtt.broker_host,
            config.mqtt.broker_port,
        );
        mqttopts.set_keep_alive(Duration::from_secs(30));

        if let (Some(user), Some(pass)) = (&config.mqtt.username, &config.mqtt.password) {
            mqttopts.set_credentials(user, pass);
        }

        let (client, eventloop) = AsyncClient::new(mqttopts, 100);

        Self {
            client,
            eventloop,
            topic: config.shadow_update_topic(),
        }
    }

    /// Run the MQTT event loop. Subscribes to the shadow topic on connect,
    /// forwards inbound shadow messages through inbound_tx, publishes desired
    /// patches received from patch_rx at QoS 0, and reports connection state
    /// changes through status_tx.
    pub async fn run(
        mut self,
        inbound_tx: mpsc::Sender<String>,
        mut patch_rx: mpsc::Receiver<String>,
        status_tx: mpsc::Sender<String>,
    ) {
        let _ = status_tx.send("Connecting".to_string()).await;

        loop {
            tokio::select! {
                event = self.eventloop.poll() => {
                    match event {
                        Ok(Event::Incoming(incoming)) => {
                            match incoming {
                                Incoming::ConnAck(_) => {
                                    info!("Connected to MQTT broker");
                                    let _ = status_tx.send("Connected".to_string()).await;

                                    if let Err(e) = self
                                        .client
                                        .subscribe(&self.topic, QoS::AtMostOnce)
                                        .await
                                    {
                                        error!("Failed to subscribe to {}: {}", self.topic, e);
                                    }
                                }
                                Incoming::Publish(publish) => {
                                    let payload =
                                        String::from_utf8_lossy(&publish.payload).to_string();
                                    debug!("Message arrived on {}: {}", publish.topic, payload);
                                    if inbound_tx.send(payload).await.is_err() {
                                        warn!("Inbound channel closed");
                                    }
                                }
                                _ => {}
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("MQTT connection error: {}. Reconnecting...", e);
                            let _ = status_tx.send("Reconnecting".to_string()).await;
                            tokio::time::sleep(Duration::from_secs(5)).await;
                        }
                    }
                }
                Some(patch) = patch_rx.recv() => {
                    debug!("Publishing to {}: {}", self.topic, patch);
                    // Fire and forget: a failed publish is logged and dropped.
                    if let Err(e) = self
                        .client
                        .publish(&self.topic, QoS::AtMostOnce, false, patch.into_bytes())
                        .await
                    {
                        warn!("Failed to publish to {}: {}", self.topic, e);
                    }
                }
            }
        }
    }
}
