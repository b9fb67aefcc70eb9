//! Launch-argument parsing.
//!
//! The Stream Deck host launches plugins with single-dash multi-character
//! flags (`-port 28196 -pluginUUID … -registerEvent … -info …`), which
//! standard derive-based parsers do not express, so the four flags are
//! read as key/value pairs directly.

use crate::error::PluginError;

/// Parameters the host passes at process launch. `info` is an opaque JSON
/// blob the plugin carries but never inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchArgs {
    pub port: u16,
    pub plugin_uuid: String,
    pub register_event: String,
    pub info: Option<String>,
}

impl LaunchArgs {
    pub fn from_env() -> Result<Self, PluginError> {
        Self::from_iter(std::env::args().skip(1))
    }

    pub fn from_iter<I>(args: I) -> Result<Self, PluginError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut port = None;
        let mut plugin_uuid = None;
        let mut register_event = None;
        let mut info = None;

        let mut args = args.into_iter();
        while let Some(key) = args.next() {
            let Some(value) = args.next() else { break };
            match key.as_str() {
                "-port" => port = Some(value),
                "-pluginUUID" => plugin_uuid = Some(value),
                "-registerEvent" => register_event = Some(value),
                "-info" => info = Some(value),
                _ => {}
            }
        }

        let port = port.ok_or(PluginError::MissingArgument("-port"))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| PluginError::InvalidPort(port))?;

        Ok(Self {
            port,
            plugin_uuid: plugin_uuid.ok_or(PluginError::MissingArgument("-pluginUUID"))?,
            register_event: register_event.ok_or(PluginError::MissingArgument("-registerEvent"))?,
            info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_all_four_flags() {
        let parsed = LaunchArgs::from_iter(args(&[
            "-port",
            "28196",
            "-pluginUUID",
            "ABC123",
            "-registerEvent",
            "registerPlugin",
            "-info",
            "{}",
        ]))
        .expect("args should parse");

        assert_eq!(parsed.port, 28196);
        assert_eq!(parsed.plugin_uuid, "ABC123");
        assert_eq!(parsed.register_event, "registerPlugin");
        assert_eq!(parsed.info.as_deref(), Some("{}"));
    }

    #[test]
    fn info_is_optional() {
        let parsed = LaunchArgs::from_iter(args(&[
            "-port",
            "9000",
            "-pluginUUID",
            "u",
            "-registerEvent",
            "e",
        ]))
        .expect("args should parse");
        assert_eq!(parsed.info, None);
    }

    #[test]
    fn flag_order_does_not_matter() {
        let parsed = LaunchArgs::from_iter(args(&[
            "-registerEvent",
            "e",
            "-port",
            "9000",
            "-pluginUUID",
            "u",
        ]))
        .expect("args should parse");
        assert_eq!(parsed.port, 9000);
    }

    #[test]
    fn missing_mandatory_flag_is_an_error() {
        let error = LaunchArgs::from_iter(args(&["-port", "9000", "-pluginUUID", "u"]))
            .expect_err("must fail");
        assert!(matches!(
            error,
            PluginError::MissingArgument("-registerEvent")
        ));
    }

    #[test]
    fn non_numeric_port_is_an_error() {
        let error = LaunchArgs::from_iter(args(&[
            "-port",
            "nope",
            "-pluginUUID",
            "u",
            "-registerEvent",
            "e",
        ]))
        .expect_err("must fail");
        assert!(matches!(error, PluginError::InvalidPort(_)));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let parsed = LaunchArgs::from_iter(args(&[
            "-verbose",
            "yes",
            "-port",
            "9000",
            "-pluginUUID",
            "u",
            "-registerEvent",
            "e",
        ]))
        .expect("args should parse");
        assert_eq!(parsed.port, 9000);
    }
}
