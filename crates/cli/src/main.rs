mod terminal;

use agent::{AgentContext, AgentError, BatchScheduler};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use okc_client::{ApiClient, ClientConfig, ClientError, OkCupidClient, QueryCatalog};
use profile_data::{
    read_cookie, read_forbidden_list, write_cookie, KnownCandidateStore, LoadStatus, Preferences,
    SelfProfile, Settings, SettingsSource, UnitSystem,
};
use std::path::PathBuf;
use std::sync::Arc;
use terminal::{CountdownSleeper, TerminalOperator};
use tracing::{error, info, warn};

/// automatch - works through OkCupid recommendations for you
#[derive(Parser)]
#[command(name = "automatch")]
#[command(about = "Likes or passes every recommended profile according to your settings", long_about = None)]
struct Cli {
    /// Settings file; written with defaults when missing
    #[arg(short, long, default_value = "settings.ini")]
    settings: PathBuf,

    /// Directory with the GraphQL query files
    #[arg(short, long, default_value = "queries")]
    queries: PathBuf,

    /// Log filter, e.g. `debug` or `agent=debug`; overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.log_level.as_deref() {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (settings, source) = Settings::load(&cli.settings)
        .with_context(|| format!("Failed to load settings from {}", cli.settings.display()))?;
    if source == SettingsSource::Generated {
        println!(
            "{} Wrote default settings to {}",
            "✓".green(),
            cli.settings.display()
        );
    }

    let queries = QueryCatalog::load_dir(&cli.queries)
        .with_context(|| format!("Failed to load queries from {}", cli.queries.display()))?;
    info!("Loaded {} queries from {}", queries.len(), cli.queries.display());

    let mut operator = TerminalOperator::new();

    let cookie = match read_cookie(&settings.cookie_file)? {
        Some(cookie) => cookie,
        None => request_cookie(&mut operator, &settings, false).await?,
    };

    let (known, status) = KnownCandidateStore::open(&settings.known_profiles_file)
        .context("Failed to open the known profiles file")?;
    match status {
        LoadStatus::Loaded(count) => info!("{} known profiles", count),
        LoadStatus::Created => info!(
            "Started an empty known profiles file at {}",
            settings.known_profiles_file.display()
        ),
        LoadStatus::Reset(reason) => println!(
            "{} Known profiles file was unreadable and has been reset ({})",
            "!".yellow(),
            reason
        ),
    }

    let forbidden = read_forbidden_list(&settings.forbidden_strings_file)
        .context("Failed to read the forbidden strings file")?;

    let (client, profile) = connect(&settings, queries, cookie, &mut operator).await?;

    let preferences = match client.fetch_preferences().await {
        Ok(preferences) => Some(preferences),
        Err(e) => {
            warn!("Could not fetch preferences: {}", e);
            None
        }
    };

    print_banner(&settings, &profile, preferences.as_ref(), &forbidden);

    let context = AgentContext::from_settings(
        &settings,
        client,
        operator,
        CountdownSleeper,
        known,
        &forbidden,
    );
    let mut scheduler = BatchScheduler::new(context);

    match scheduler.run().await {
        Ok(()) => Ok(()),
        Err(AgentError::Fetch(e)) => {
            error!("Stopping: {}", e);
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Ask for a cookie list until one is given, and save it.
async fn request_cookie(
    operator: &mut TerminalOperator,
    settings: &Settings,
    after_failure: bool,
) -> Result<String> {
    let prompt = if after_failure {
        "Please try logging in again in a browser and typing a new cookie list (press CTRL-C to abort): "
    } else {
        "Please enter your OkCupid auth cookie list: "
    };

    let cookie = operator
        .ask_non_empty(prompt, "You must supply a cookie list, please try again: ")
        .await
        .context("No cookie list given")?;
    write_cookie(&settings.cookie_file, &cookie)?;
    Ok(cookie)
}

/// Build the client and fetch the self profile, asking for a fresh cookie
/// list until that works.
async fn connect(
    settings: &Settings,
    queries: QueryCatalog,
    mut cookie: String,
    operator: &mut TerminalOperator,
) -> Result<(Arc<dyn ApiClient>, SelfProfile)> {
    loop {
        let config = ClientConfig::from_settings(settings, cookie.as_str());
        let client = match OkCupidClient::new(config, queries.clone()) {
            Ok(client) => client,
            Err(ClientError::InvalidHeader(reason)) => {
                warn!("Cookie list can't be sent: {}", reason);
                println!("{} That cookie list is not valid.", "✗".red());
                cookie = request_cookie(operator, settings, true).await?;
                continue;
            }
            Err(e) => return Err(e).context("Failed to build the client"),
        };

        match client.fetch_self_profile().await {
            Ok(profile) => {
                let client: Arc<dyn ApiClient> = Arc::new(client);
                return Ok((client, profile));
            }
            Err(e) => {
                warn!("Self profile fetch failed: {}", e);
                println!("{} Something went wrong getting your profile.", "✗".red());
                cookie = request_cookie(operator, settings, true).await?;
            }
        }
    }
}

fn print_banner(
    settings: &Settings,
    profile: &SelfProfile,
    preferences: Option<&Preferences>,
    forbidden: &[String],
) {
    println!();
    println!("{}", format!("Welcome {}!", profile.display_name).bold().blue());
    println!();

    let forbidden = if forbidden.is_empty() {
        "(none)".to_string()
    } else {
        forbidden.join(", ")
    };
    println!("{}Forbidden strings: {}", "• ".green(), forbidden);

    match preferences {
        Some(p) => {
            println!(
                "{}Age range: between {} and {} years.",
                "• ".green(),
                p.min_age,
                p.max_age
            );
            println!(
                "{}Max distance: {}",
                "• ".green(),
                distance_label(p.max_distance, profile.units, settings.miles_in_km)
            );
        }
        None => {
            println!("{}Age range: unknown", "• ".green());
            println!("{}Max distance: unknown", "• ".green());
        }
    }
    println!();
}

/// `50 km (31.1 mi)` or `30 mi (48.3 km)`
fn distance_label(distance: u32, units: UnitSystem, miles_in_km: f64) -> String {
    let value = f64::from(distance);
    let (other, other_suffix) = match units {
        UnitSystem::Metric => (value / miles_in_km, UnitSystem::Imperial.distance_suffix()),
        UnitSystem::Imperial => (value * miles_in_km, UnitSystem::Metric.distance_suffix()),
    };
    format!(
        "{} {} ({:.1} {}).",
        distance,
        units.distance_suffix(),
        other,
        other_suffix
    )
}
