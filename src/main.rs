use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use giza_agent::agent::ollama::system_prompt;
use giza_agent::agent::{Agent, AvailabilityProbe, DisabledAgent, OllamaAgent};
use giza_agent::config::Settings;
use giza_agent::geo::{GeoTable, GeocodingResolver, NominatimGeocoder, Resolver, TableResolver};
use giza_agent::weather::WeatherClient;
use giza_agent::{DistanceEngine, Mode, QueryDispatcher};

/// Weather & distance-from-Giza conversational agent.
///
/// Answers "what's the weather in X" and "how far is X from Giza" questions,
/// through a local Ollama model when one is running, else by keyword rules.
///
/// Examples:
///   giza-agent
///   giza-agent --rule-only
///   giza-agent --geocoding -q "How far is Lima from Giza?"
///   giza-agent --config ./agent.toml -vv
#[derive(Parser)]
#[command(name = "giza-agent", version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML). Defaults to <config_dir>/giza-agent/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the model server probe and use rule-based answers only.
    #[arg(long)]
    rule_only: bool,

    /// Resolve cities through Nominatim, falling back to the built-in table.
    #[arg(long)]
    geocoding: bool,

    /// Ollama base URL.
    #[arg(long)]
    ollama_url: Option<String>,

    /// Ollama model tag.
    #[arg(long)]
    model: Option<String>,

    /// Weather service base URL.
    #[arg(long)]
    weather_url: Option<String>,

    /// Answer a single question and exit.
    #[arg(long, short = 'q')]
    query: Option<String>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(&cli)?;

    // ── Coordinate resolution chain ─────────────────────────────

    let resolver: Box<dyn Resolver> = if settings.geocoding {
        let geocoder = NominatimGeocoder::new(
            settings.nominatim_url.clone(),
            settings.geocoder_user_agent.clone(),
            settings.http_timeout(),
        );
        Box::new(GeocodingResolver::new(Box::new(geocoder), GeoTable::reference_only()))
    } else {
        Box::new(TableResolver::new(GeoTable::world()))
    };
    let distance = DistanceEngine::new(resolver);
    let chain = distance.chain();

    let weather = WeatherClient::new(
        settings.weather_url.clone(),
        settings.weather_format.clone(),
        settings.http_timeout(),
    );

    // ── Mode selection (once per session) ───────────────────────

    let mode = if cli.rule_only {
        Mode::Rule
    } else {
        Mode::detect(&AvailabilityProbe::for_ollama(&settings.ollama_url, settings.probe_timeout()))
    };
    info!(%mode, ?chain, "session mode selected");

    let agent: Box<dyn Agent> = match mode {
        Mode::Ai => Box::new(
            OllamaAgent::new(settings.ollama_url.clone(), settings.model.clone(), settings.agent_timeout())
                .with_temperature(settings.temperature)
                .with_max_turns(settings.max_turns)
                .with_system_prompt(system_prompt(chain)),
        ),
        Mode::Rule => Box::new(DisabledAgent),
    };

    let dispatcher = QueryDispatcher::new(mode, agent, Box::new(weather), distance)
        .with_courtesy_delay(settings.courtesy_delay());

    if let Some(question) = cli.query.as_deref() {
        println!("{}", dispatcher.handle(question));
        return Ok(());
    }

    print_banner(mode, &settings, cli.rule_only);
    run_session(&dispatcher)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    if cli.geocoding {
        settings.geocoding = true;
    }
    if let Some(ref url) = cli.ollama_url {
        settings.ollama_url = url.clone();
    }
    if let Some(ref model) = cli.model {
        settings.model = model.clone();
    }
    if let Some(ref url) = cli.weather_url {
        settings.weather_url = url.clone();
    }
    Ok(settings)
}

fn print_banner(mode: Mode, settings: &Settings, rule_only: bool) {
    println!("Welcome to the Weather & Distance from Giza Agent!");
    println!("Ask about the weather in any city or its distance from Giza.");
    println!("Type 'exit' to quit.");

    match mode {
        Mode::Ai => println!("\nOllama server detected! Using the {} model.", settings.model),
        Mode::Rule if rule_only => println!("\nUsing rule-based agent."),
        Mode::Rule => {
            println!("\nOllama server not detected. Using rule-based agent.");
            println!("To use the language model, please start Ollama with: ollama serve");
            println!("And make sure to pull the model with: ollama pull {}", settings.model);
        }
    }
}

/// Read–answer loop until `exit`/`quit` or end of input.
fn run_session(dispatcher: &QueryDispatcher) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("\nYour question: ");
        stdout.flush().context("writing prompt")?;

        line.clear();
        let read = stdin.lock().read_line(&mut line).context("reading stdin")?;
        let input = line.trim();

        if read == 0 || input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            return Ok(());
        }
        if input.is_empty() {
            continue;
        }

        println!("\nAgent: {}", dispatcher.handle(input));
    }
}
