use clap::{
    Arg, ArgAction, Command, CommandFactory, FromArgMatches, Parser,
    builder::{PossibleValuesParser, TypedValueParser},
};
use owm_core::{
    OpenWeatherClient, Units, WeatherError, WeatherProvider, WeatherQuery, format_weather,
};
use std::{ffi::OsString, future::Future};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CANCELLED: u8 = 130;

pub const CANCELLED_NOTICE: &str = "\n⚠️  Operation cancelled by user.";

const AFTER_HELP: &str = "\
Examples:
  weather London
  weather \"New York\" --units imperial
  weather Tokyo --api-key YOUR_API_KEY

Environment Variables:
  OPENWEATHER_API_KEY    Your OpenWeatherMap API key
  RUST_LOG               Diagnostic log filter (default: error)";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Fetch current weather information from OpenWeatherMap API.",
    after_help = AFTER_HELP,
    disable_version_flag = true
)]
pub struct Cli {
    /// Name of the city to get weather for.
    pub city: String,

    /// Unit system: metric (°C), imperial (°F), or standard (K).
    #[arg(short, long, default_value = "metric", value_parser = units_parser())]
    pub units: Units,

    /// OpenWeatherMap API key (can also be set via OPENWEATHER_API_KEY env variable).
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,
}

/// How a run ended, and what goes to which stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Report(String),
    Failed(String),
    Cancelled,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Report(_) => EXIT_SUCCESS,
            Outcome::Failed(_) => EXIT_FAILURE,
            Outcome::Cancelled => EXIT_CANCELLED,
        }
    }

    /// Print the report to stdout, or the failure/cancel line to stderr.
    pub fn emit(&self) {
        match self {
            Outcome::Report(report) => println!("{report}"),
            Outcome::Failed(message) => eprintln!("{message}"),
            Outcome::Cancelled => eprintln!("{CANCELLED_NOTICE}"),
        }
    }
}

impl Cli {
    /// Parse `std::env::args_os`, exiting with clap's usage error on failure.
    pub fn from_env_args() -> Self {
        Self::try_from_args(std::env::args_os()).unwrap_or_else(|err| err.exit())
    }

    /// Parse `args`. `-v/--version` is attached here since clap's generated
    /// version flag only offers `-V`.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command_with_version().try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    fn command_with_version() -> Command {
        Self::command().arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
    }

    /// Build the client, fetch, and return the rendered report.
    pub async fn run(self) -> anyhow::Result<String> {
        let client = OpenWeatherClient::new(self.api_key)?;
        report(&client, &self.city, self.units).await
    }

    /// Run until done or until `cancel` resolves, whichever comes first.
    pub async fn execute<C>(self, cancel: C) -> Outcome
    where
        C: Future<Output = ()>,
    {
        race(self.run(), cancel).await
    }
}

fn units_parser() -> impl TypedValueParser<Value = Units> {
    PossibleValuesParser::new(Units::all().iter().map(Units::as_str))
        .try_map(|name| Units::try_from(name.as_str()))
}

/// Fetch current weather for `city` from `provider` and render it.
pub async fn report(
    provider: &dyn WeatherProvider,
    city: &str,
    units: Units,
) -> anyhow::Result<String> {
    let query = WeatherQuery::new(city, units)?;
    let data = provider.current_weather(&query).await?;
    Ok(format_weather(&data, units))
}

/// Drive `work` against `cancel`. Cancellation is polled first, so an
/// interrupt that is already pending wins.
pub async fn race<W, C>(work: W, cancel: C) -> Outcome
where
    W: Future<Output = anyhow::Result<String>>,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;

        () = cancel => Outcome::Cancelled,
        outcome = work => match outcome {
            Ok(report) => Outcome::Report(report),
            Err(err) => {
                tracing::debug!(error = ?err, "run failed");
                Outcome::Failed(failure_message(&err))
            }
        },
    }
}

/// Line printed to stderr for a failed run.
pub fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<WeatherError>() {
        Some(domain) if !domain.is_unexpected() => format!("❌ Error: {domain}"),
        _ => format!("❌ Unexpected error: {err}"),
    }
}
