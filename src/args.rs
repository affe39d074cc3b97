use clap::Parser;
use roster_core::MAX_PLAYERS;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "roster_bot",
    rename_all = "kebab-case",
    rename_all_env = "screaming-snake"
)]
pub struct Args {
    #[clap(long, env = "ROSTER_BOT_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[clap(long, env, default_value_t = 3000)]
    pub port: u16,

    /// Roster capacity; further joins go to the waitlist.
    #[clap(long, env, default_value_t = MAX_PLAYERS, value_parser = parse_capacity)]
    pub max_players: usize,

    /// Day shown in the help text ("Games are every ...").
    #[clap(long, env, default_value = "Friday")]
    pub game_day: String,

    /// Only accept spelled-out commands, not the `1`-`4` shortcuts.
    #[clap(long)]
    pub no_numeric_shortcuts: bool,

    /// Channel prefix on provider addresses, e.g. `whatsapp` in `whatsapp:+15550100`.
    #[clap(long, env, default_value = "whatsapp")]
    pub channel_prefix: String,

    #[clap(long, env)]
    pub twilio_account_sid: Option<String>,

    #[clap(long, env, hide_env_values = true)]
    pub twilio_auth_token: Option<String>,

    /// Sender number replies go out from.
    #[clap(long, env)]
    pub twilio_phone_number: Option<String>,

    #[clap(long, env, default_value = "https://api.twilio.com")]
    pub twilio_api_base: String,

    /// Upper bound on a single outbound send.
    #[clap(long, env, default_value_t = 10)]
    pub send_timeout_secs: u64,

    /// Log outbound replies instead of sending them.
    #[clap(long)]
    pub dry_run: bool,
}

impl Args {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Twilio credentials, if all three are configured.
    pub fn twilio_credentials(&self) -> Option<(&str, &str, &str)> {
        match (
            &self.twilio_account_sid,
            &self.twilio_auth_token,
            &self.twilio_phone_number,
        ) {
            (Some(sid), Some(token), Some(number)) => Some((sid, token, number)),
            _ => None,
        }
    }
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    let capacity: usize = value.parse().map_err(|e| format!("{e}"))?;
    if capacity == 0 {
        return Err("roster capacity must be at least 1".to_string());
    }
    Ok(capacity)
}
