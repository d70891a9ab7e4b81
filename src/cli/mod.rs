use clap::Parser;
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Canned keyword replies, no network.
    Local,
    /// Forward each message to the chat endpoint, canned fallback on failure.
    Remote,
    /// Run the credential-holding relay in front of the chat endpoint.
    Proxy,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseModeError {
    message: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "v1" => Ok(Mode::Local),
            "remote" | "v2" => Ok(Mode::Remote),
            "proxy" => Ok(Mode::Proxy),
            _ =>
                Err(ParseModeError {
                    message: format!("Invalid mode: '{}' (expected local, remote or proxy)", s),
                }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Local => "local",
            Mode::Remote => "remote",
            Mode::Proxy => "proxy",
        };
        f.write_str(name)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// How replies are produced (local, remote, proxy)
    #[arg(long, env = "CHAT_MODE", default_value = "local")]
    pub mode: Mode,

    // --- Remote Endpoint Args ---
    /// Chat endpoint URL. In remote mode point this at the relay (e.g., http://127.0.0.1:4000/api/chat)
    #[arg(long, env = "CHAT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Credential sent as a bearer token. Required by the relay; leave unset on clients.
    #[arg(long, env = "CHAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Value of the numeric `session` header passed through to the endpoint.
    #[arg(long, env = "CHAT_SESSION_HEADER", default_value = "2")]
    pub session_header: String,

    // --- Local Mode Args ---
    /// Delay before a local reply is shown, in milliseconds.
    #[arg(long, env = "CHAT_REPLY_DELAY_MS", default_value = "1000")]
    pub reply_delay_ms: u64,

    // --- Relay Args ---
    /// Host address and port for the relay to listen on.
    #[arg(long, env = "PROXY_ADDR", default_value = "127.0.0.1:4000")]
    pub proxy_addr: String,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("LOCAL".parse::<Mode>(), Ok(Mode::Local));
        assert_eq!("v2".parse::<Mode>(), Ok(Mode::Remote));
        assert_eq!(" proxy ".parse::<Mode>(), Ok(Mode::Proxy));
        assert!("cloud".parse::<Mode>().is_err());
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let args = Args::parse_from([
            "chat-widget",
            "--mode",
            "remote",
            "--endpoint",
            "http://127.0.0.1:4000/api/chat",
            "--reply-delay-ms",
            "0",
            "--session-header",
            "7",
        ]);
        assert_eq!(args.mode, Mode::Remote);
        assert_eq!(args.endpoint.as_deref(), Some("http://127.0.0.1:4000/api/chat"));
        assert_eq!(args.reply_delay_ms, 0);
        assert_eq!(args.session_header, "7");
    }
}
