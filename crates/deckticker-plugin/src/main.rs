//! Stream Deck stock-ticker plugin binary.
//!
//! Connects to the host's local WebSocket port given on the command line,
//! registers with the UUID the host assigned, then routes lifecycle events
//! to the instance manager until the host closes the channel.

mod args;
mod error;
mod manager;
mod protocol;

use std::sync::Arc;

use deckticker_core::{QuoteRouter, ReqwestHttpClient};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::args::LaunchArgs;
use crate::error::PluginError;
use crate::manager::InstanceManager;
use crate::protocol::{ButtonSettings, HostCommand, InboundMessage, Registration};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = run().await {
        error!("fatal: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PluginError> {
    let launch = LaunchArgs::from_env()?;
    let url = format!("ws://127.0.0.1:{}", launch.port);

    info!("connecting to host at {url}");
    let (stream, _) = connect_async(url.as_str()).await?;
    let (mut ws_sink, mut ws_source) = stream.split();

    let registration = serde_json::to_string(&Registration {
        event: &launch.register_event,
        uuid: &launch.plugin_uuid,
    })?;
    ws_sink.send(Message::Text(registration.into())).await?;
    info!("registered as {}", launch.plugin_uuid);

    // Display commands funnel through one writer task so fetch tasks never
    // contend for the socket.
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<HostCommand>();
    let writer = tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            let text = match serde_json::to_string(&command) {
                Ok(text) => text,
                Err(error) => {
                    warn!("dropping unserializable command: {error}");
                    continue;
                }
            };
            if let Err(error) = ws_sink.send(Message::Text(text.into())).await {
                warn!("host write failed: {error}");
                break;
            }
        }
    });

    let router = Arc::new(QuoteRouter::new(Arc::new(ReqwestHttpClient::new())));
    let mut manager = InstanceManager::new(router, command_tx);

    loop {
        tokio::select! {
            message = ws_source.next() => match message {
                Some(Ok(Message::Text(text))) => dispatch(&mut manager, &text),
                Some(Ok(Message::Close(_))) | None => {
                    info!("host closed the channel");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    error!("host read failed: {error}");
                    break;
                }
            },
            _ = shutdown_signal() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    manager.shutdown();
    writer.abort();
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = terminate.recv() => {}
            }
        }
        Err(error) => {
            warn!("SIGTERM handler unavailable: {error}");
            let _ = ctrl_c.await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn dispatch(manager: &mut InstanceManager, text: &str) {
    let message: InboundMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(error) => {
            warn!("unparseable host event: {error}");
            return;
        }
    };

    let Some(context) = message.context.as_deref() else {
        debug!("ignoring contextless event {}", message.event);
        return;
    };
    let settings =
        ButtonSettings::from(message.payload.map(|p| p.settings).unwrap_or_default());

    match message.event.as_str() {
        "willAppear" => manager.on_appear(context, settings),
        "didReceiveSettings" => manager.on_settings_changed(context, settings),
        "willDisappear" => manager.on_disappear(context),
        "keyDown" => manager.on_activate(context),
        other => debug!("ignoring event {other}"),
    }
}
