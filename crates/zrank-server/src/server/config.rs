use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use zrank::Window;

/// Runtime configuration for the `zrank-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first). The window bounds have no default: a
/// leaderboard is always calibrated for a specific campaign.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "zrank-server",
    version,
    about = "An HTTP service for windowed leaderboards"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:3000"))]
    pub server_addr: String,

    /// Store key the leaderboard lives under.
    ///
    /// Environment variable: `LEADERBOARD_KEY`
    #[arg(long, env = "LEADERBOARD_KEY", default_value_t = String::from("zrank:leaderboard"))]
    pub leaderboard_key: String,

    /// First second of the scoring window (Unix timestamp, inclusive).
    ///
    /// Environment variable: `WINDOW_START`
    #[arg(long, env = "WINDOW_START")]
    pub window_start: i64,

    /// End of the scoring window (Unix timestamp, exclusive).
    ///
    /// The tie-break fraction counts the seconds left until this point, so
    /// its digit width follows from `WINDOW_END - WINDOW_START`.
    ///
    /// Environment variable: `WINDOW_END`
    #[arg(long, env = "WINDOW_END")]
    pub window_end: i64,

    /// How long the leaderboard outlives its last update, in seconds.
    ///
    /// Environment variable: `RETENTION_SECS`
    #[arg(long, env = "RETENTION_SECS", default_value_t = 60 * 24 * 3600)]
    pub retention_secs: u64,

    /// Upper bound on every store call, in milliseconds.
    ///
    /// Environment variable: `STORE_TIMEOUT_MS`
    #[arg(long, env = "STORE_TIMEOUT_MS", default_value_t = 1000)]
    pub store_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub leaderboard_key: String,
    pub window: Window,
    pub retention: Duration,
    pub store_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.leaderboard_key.is_empty() {
            bail!("LEADERBOARD_KEY must not be empty");
        }

        if args.store_timeout_ms == 0 {
            bail!("STORE_TIMEOUT_MS must be greater than 0");
        }

        let window = match Window::new(args.window_start, args.window_end) {
            Ok(window) => window,
            Err(err) => bail!(
                "WINDOW_START ({}) and WINDOW_END ({}) do not form a usable window: {}",
                args.window_start,
                args.window_end,
                err
            ),
        };

        Ok(Self {
            server_addr: args.server_addr,
            leaderboard_key: args.leaderboard_key,
            window,
            retention: Duration::from_secs(args.retention_secs),
            store_timeout: Duration::from_millis(args.store_timeout_ms),
        })
    }
}
