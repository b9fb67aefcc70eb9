//! Per-button instance tracking and the polling lifecycle.
//!
//! The manager owns the only map from host context to instance; everything
//! that needs instance lookup goes through it. Each instance runs one
//! polling task on a fixed 15-second cadence; settings changes trigger an
//! extra immediate fetch without touching the timer's phase.
//!
//! A fetch snapshots the instance's generation counter before going to the
//! network and re-checks it (plus liveness) before rendering, so a stale
//! response can never overwrite a reconfigured or removed button.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use deckticker_core::{format_title, state_for_change, ButtonState, QuoteRequest, QuoteRouter};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::{ButtonSettings, HostCommand};

/// Fixed polling period for every instance.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(15);

/// Outbound side of the host channel; a writer task drains the receiver
/// into the WebSocket sink.
pub type CommandSender = mpsc::UnboundedSender<HostCommand>;

#[derive(Debug)]
struct InstanceState {
    settings: ButtonSettings,
    last_price: Option<f64>,
    last_change: Option<f64>,
    /// Bumped on every settings change; fetches carrying an older value
    /// are discarded at render time.
    generation: u64,
    live: bool,
}

struct Instance {
    state: Arc<Mutex<InstanceState>>,
    poll_task: JoinHandle<()>,
}

impl Instance {
    fn retire(self) {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .live = false;
        self.poll_task.abort();
    }
}

/// Tracks the one-to-one mapping between visible buttons and their polling
/// tasks, and routes host events to state transitions.
pub struct InstanceManager {
    instances: HashMap<String, Instance>,
    router: Arc<QuoteRouter>,
    sink: CommandSender,
}

impl InstanceManager {
    pub fn new(router: Arc<QuoteRouter>, sink: CommandSender) -> Self {
        Self {
            instances: HashMap::new(),
            router,
            sink,
        }
    }

    /// `willAppear`: build the instance, fetch immediately, then poll every
    /// 15 seconds until the button disappears. An existing instance for the
    /// same context is overwritten, not merged.
    pub fn on_appear(&mut self, context: &str, settings: ButtonSettings) {
        if let Some(previous) = self.instances.remove(context) {
            warn!("[{context}] appeared while already live, replacing instance");
            previous.retire();
        }

        info!(
            "[{context}] button appeared: symbol {} via {}",
            settings.symbol, settings.source
        );

        let state = Arc::new(Mutex::new(InstanceState {
            settings,
            last_price: None,
            last_change: None,
            generation: 0,
            live: true,
        }));

        let poll_task = tokio::spawn(poll_loop(
            context.to_string(),
            Arc::clone(&state),
            Arc::clone(&self.router),
            self.sink.clone(),
        ));

        self.instances
            .insert(context.to_string(), Instance { state, poll_task });
    }

    /// `didReceiveSettings`: replace the configuration in place, clear the
    /// cached last values, and fetch once immediately. The periodic timer
    /// keeps its phase. No-op for unknown contexts.
    pub fn on_settings_changed(&mut self, context: &str, settings: ButtonSettings) {
        let Some(instance) = self.instances.get(context) else {
            debug!("[{context}] settings change for unknown instance, ignoring");
            return;
        };

        info!(
            "[{context}] settings changed: symbol {} via {}",
            settings.symbol, settings.source
        );

        {
            let mut state = instance
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.settings = settings;
            state.last_price = None;
            state.last_change = None;
            state.generation += 1;
        }

        tokio::spawn({
            let context = context.to_string();
            let state = Arc::clone(&instance.state);
            let router = Arc::clone(&self.router);
            let sink = self.sink.clone();
            async move { fetch_and_render(&context, &state, &router, &sink).await }
        });
    }

    /// `willDisappear`: cancel the timer and discard the instance. No
    /// retained history. No-op when absent.
    pub fn on_disappear(&mut self, context: &str) {
        match self.instances.remove(context) {
            Some(instance) => {
                info!("[{context}] button disappeared");
                instance.retire();
            }
            None => debug!("[{context}] disappear for unknown instance, ignoring"),
        }
    }

    /// `keyDown`: button presses have no effect by design.
    pub fn on_activate(&self, context: &str) {
        debug!("[{context}] key down ignored");
    }

    /// Cancel every outstanding poll before process exit.
    pub fn shutdown(&mut self) {
        info!("cancelling {} polling task(s)", self.instances.len());
        for (_, instance) in self.instances.drain() {
            instance.retire();
        }
    }

    pub fn is_live(&self, context: &str) -> bool {
        self.instances.contains_key(context)
    }
}

async fn poll_loop(
    context: String,
    state: Arc<Mutex<InstanceState>>,
    router: Arc<QuoteRouter>,
    sink: CommandSender,
) {
    let mut ticker = tokio::time::interval(UPDATE_INTERVAL);
    // First tick completes immediately, giving the initial render on appear.
    loop {
        ticker.tick().await;
        fetch_and_render(&context, &state, &router, &sink).await;
    }
}

async fn fetch_and_render(
    context: &str,
    state: &Arc<Mutex<InstanceState>>,
    router: &QuoteRouter,
    sink: &CommandSender,
) {
    let (symbol, kind, credential, generation) = {
        let state = state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.live {
            return;
        }
        (
            state.settings.symbol.clone(),
            state.settings.source,
            state.settings.api_key.clone(),
            state.generation,
        )
    };

    debug!("[{context}] fetching {symbol} from {kind}");
    let outcome = router
        .fetch_quote(kind, QuoteRequest::new(symbol.clone(), credential))
        .await;

    let mut state = state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if !state.live || state.generation != generation {
        debug!("[{context}] discarding stale fetch result for {symbol}");
        return;
    }

    match outcome {
        Ok(quote) => {
            let change = quote.change();
            let percent = quote.change_percent();
            state.last_price = Some(quote.current_price);
            state.last_change = Some(change);

            info!(
                "[{context}] {symbol} price {:.2} change {:+.2} ({:+.2}%){}",
                quote.current_price,
                change,
                percent,
                if quote.is_after_hours {
                    " after hours"
                } else {
                    ""
                }
            );

            push(
                sink,
                HostCommand::set_title(
                    context,
                    format_title(
                        &symbol,
                        Some(quote.current_price),
                        percent,
                        quote.is_after_hours,
                    ),
                ),
            );
            push(sink, HostCommand::set_state(context, state_for_change(change)));
        }
        Err(error) => {
            // Cached last values stay untouched; the next tick retries.
            warn!("[{context}] fetch failed for {symbol}: {error}");
            push(
                sink,
                HostCommand::set_title(context, format_title(&symbol, None, 0.0, false)),
            );
            push(sink, HostCommand::set_state(context, ButtonState::Down));
        }
    }
}

fn push(sink: &CommandSender, command: HostCommand) {
    if sink.send(command).is_err() {
        warn!("host channel closed, dropping display command");
    }
}
