//! Host protocol message shapes.
//!
//! JSON text messages over the local WebSocket channel: inbound lifecycle
//! events from the Stream Deck host, outbound display commands back to it.

use deckticker_core::{ButtonState, SourceKind};
use serde::{Deserialize, Serialize};

/// Fixed fallback symbol when a button has none configured.
pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Inbound host event. `context` identifies the button instance; lifecycle
/// events carry the button's settings in the payload.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    pub event: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub payload: Option<InboundPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InboundPayload {
    #[serde(default)]
    pub settings: RawSettings,
}

/// Settings exactly as the host stores them; all fields optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Resolved per-button configuration with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSettings {
    pub symbol: String,
    pub source: SourceKind,
    pub api_key: String,
}

impl From<RawSettings> for ButtonSettings {
    fn from(raw: RawSettings) -> Self {
        Self {
            symbol: raw
                .symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            source: raw
                .data_source
                .filter(|s| !s.is_empty())
                .map(|s| SourceKind::from_setting(&s))
                .unwrap_or_default(),
            api_key: raw.api_key.unwrap_or_default(),
        }
    }
}

/// Outbound display command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostCommand {
    SetTitle {
        context: String,
        payload: TitlePayload,
    },
    SetState {
        context: String,
        payload: StatePayload,
    },
}

impl HostCommand {
    pub fn set_title(context: &str, title: String) -> Self {
        Self::SetTitle {
            context: context.to_string(),
            payload: TitlePayload { title, target: 0 },
        }
    }

    pub fn set_state(context: &str, state: ButtonState) -> Self {
        Self::SetState {
            context: context.to_string(),
            payload: StatePayload {
                state: state.code(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitlePayload {
    pub title: String,
    /// 0 = both hardware and software display.
    pub target: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatePayload {
    /// 0 = up/green, 1 = down/red.
    pub state: u8,
}

/// Handshake sent once when the channel opens.
#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub event: &'a str,
    pub uuid: &'a str,
}
