mod config;
mod console;
mod mqtt;
mod shadow;
mod voice;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

use console::{Command, ConsolePanel, help_text, parse_line};
use shadow::controller::{MqttPatchPublisher, ShadowController};
use voice::VoiceInteraction;
use voice::controller::DialogController;
use voice::scripted::ScriptedBot;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Starting shadow-panel (mqtt={}:{}, client_id={}, topic={})",
        config.mqtt.broker_host,
        config.mqtt.broker_port,
        config.mqtt.client_id,
        config.shadow_update_topic(),
    );

    // Channels
    let (patch_tx, patch_rx) = mpsc::channel::<String>(100);
    let (inbound_tx, mut inbound_rx) = mpsc::channel::<String>(100);
    let (status_tx, mut status_rx) = mpsc::channel::<String>(16);

    // Create MQTT client and spawn event loop (handles subscribe + publish)
    let mqtt_client = mqtt::client::MqttClient::new(&config);
    let mqtt_handle = tokio::spawn(async move {
        mqtt_client.run(inbound_tx, patch_rx, status_tx).await;
    });

    let mut shadow_panel =
        ShadowController::new(MqttPatchPublisher::new(patch_tx), ConsolePanel);
    let mut dialog = DialogController::new(ConsolePanel);
    let mut bot = ScriptedBot;

    println!("{}", help_text());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("Failed to register SIGTERM handler");

    // Main loop: console commands out, shadow messages and status back in.
    // Everything renders from this one task, so display updates never race.
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => match parse_line(&line) {
                        Ok(Command::Control(event)) => shadow_panel.handle_event(event),
                        Ok(Command::Say(utterance)) => bot.submit_text(&utterance, &mut dialog),
                        Ok(Command::Help) => println!("{}", help_text()),
                        Ok(Command::Quit) => break,
                        Err(console::ParseError::Empty) => {}
                        Err(e) => println!("{e}"),
                    },
                    Ok(None) => {
                        info!("Console input closed, shutting down");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read console input: {}", e);
                        break;
                    }
                }
            }
            Some(payload) = inbound_rx.recv() => {
                shadow_panel.handle_message(&payload);
            }
            Some(status) = status_rx.recv() => {
                shadow_panel.set_status(&status);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down");
                break;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
                break;
            }
        }
    }

    mqtt_handle.abort();
    info!("shadow-panel stopped");
}
