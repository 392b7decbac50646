//! dts - convert between duration strings and UTC timestamps.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use duration_timestamp::{ConvertOptions, DurationConverter, RolloverPolicy};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// dts - duration strings ⇄ UTC timestamps
#[derive(Parser, Debug)]
#[command(name = "dts")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a duration (e.g. "1y 2mo -3d 4.5h") to a base instant
    Apply {
        /// Duration string
        #[arg(allow_hyphen_values = true)]
        duration: String,

        /// Base instant: epoch milliseconds or RFC 3339 (defaults to now)
        #[arg(short, long, allow_hyphen_values = true)]
        base: Option<String>,

        /// How to resolve days missing from the target month
        #[arg(long, value_enum, default_value_t = Rollover::Overflow)]
        rollover: Rollover,
    },

    /// Describe a target instant as a duration from a base instant
    Describe {
        /// Target instant: epoch milliseconds or RFC 3339
        #[arg(allow_hyphen_values = true)]
        target: String,

        /// Base instant: epoch milliseconds or RFC 3339 (defaults to now)
        #[arg(short, long, allow_hyphen_values = true)]
        base: Option<String>,

        /// How to resolve days missing from the target month
        #[arg(long, value_enum, default_value_t = Rollover::Overflow)]
        rollover: Rollover,

        /// Print the per-unit breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reduce a duration to total seconds/milliseconds (year = 365d, month = 30d)
    Numbers {
        /// Duration string
        #[arg(allow_hyphen_values = true)]
        duration: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Rollover {
    /// Jan 31 + 1mo spills into March
    Overflow,
    /// Jan 31 + 1mo stops at the end of February
    Clamp,
}

impl From<Rollover> for ConvertOptions {
    fn from(rollover: Rollover) -> Self {
        let rollover = match rollover {
            Rollover::Overflow => RolloverPolicy::Overflow,
            Rollover::Clamp => RolloverPolicy::Clamp,
        };
        ConvertOptions { rollover }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Apply {
            duration,
            base,
            rollover,
        } => cmd_apply(&duration, base.as_deref(), rollover),
        Commands::Describe {
            target,
            base,
            rollover,
            json,
        } => cmd_describe(&target, base.as_deref(), rollover, json),
        Commands::Numbers { duration } => cmd_numbers(&duration),
    }
}

fn cmd_apply(duration: &str, base: Option<&str>, rollover: Rollover) -> Result<()> {
    let base = base.map(parse_instant).transpose()?;
    let converter = DurationConverter::new().with_options(rollover.into());
    let result = converter
        .convert_duration_to_utc_timestamp(duration, base)
        .with_context(|| format!("Failed to apply duration '{duration}'"))?;

    let utc = DateTime::<Utc>::from_timestamp_millis(result.utc_timestamp)
        .context("Result is outside the representable range")?;
    let output = json!({
        "utcTimestamp": result.utc_timestamp,
        "durationMs": result.duration_ms,
        "utc": utc.to_rfc3339_opts(SecondsFormat::Millis, true),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_describe(target: &str, base: Option<&str>, rollover: Rollover, json: bool) -> Result<()> {
    let target = parse_instant(target)?.timestamp_millis();
    let base = base.map(parse_instant).transpose()?;
    let converter = DurationConverter::new().with_options(rollover.into());

    if json {
        let breakdown = converter
            .decompose(target, base)
            .context("Failed to describe timestamp")?;
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        let described = converter
            .convert_utc_timestamp_to_duration_string(target, base)
            .context("Failed to describe timestamp")?;
        println!("{described}");
    }
    Ok(())
}

fn cmd_numbers(duration: &str) -> Result<()> {
    let numbers = duration_timestamp::convert_duration_to_numbers(duration);
    println!("{}", serde_json::to_string_pretty(&numbers)?);
    Ok(())
}

/// Accept either integer epoch milliseconds or an RFC 3339 datetime.
fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    let instant = match s.parse::<i64>() {
        Ok(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
            .with_context(|| format!("Timestamp {ms} ms is outside the supported range"))?,
        Err(_) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid instant '{s}': expected epoch ms or RFC 3339"))?
            .with_timezone(&Utc),
    };
    debug!(input = s, %instant, "parsed instant");
    Ok(instant)
}
