use std::io::Write;

use anyhow::Context;
use bandpics_core::Coordinate;
use bandpics_places::{
    NearbyOutcome, NearbyRequest, PlacesClient, SearchType, DEFAULT_RADIUS_METERS,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bandpics-cli")]
#[command(about = "bandpics live-events command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find venues near a point and print them with distances as JSON.
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
        #[arg(long, value_enum, default_value_t = SearchTypeArg::Default)]
        search_type: SearchTypeArg,
        #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
        radius: f64,
        #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
        api_key: String,
        #[arg(
            long,
            env = "BANDPICS_PLACES_BASE_URL",
            default_value = "https://places.googleapis.com"
        )]
        base_url: String,
        #[arg(long, env = "BANDPICS_PLACES_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Apply pending database migrations.
    Migrate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SearchTypeArg {
    Default,
    Expanded,
    Unrestricted,
}

impl From<SearchTypeArg> for SearchType {
    fn from(arg: SearchTypeArg) -> Self {
        match arg {
            SearchTypeArg::Default => SearchType::Default,
            SearchTypeArg::Expanded => SearchType::Expanded,
            SearchTypeArg::Unrestricted => SearchType::Unrestricted,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Nearby {
            latitude,
            longitude,
            search_type,
            radius,
            api_key,
            base_url,
            timeout_secs,
        } => {
            let client = PlacesClient::with_base_url(&api_key, timeout_secs, &base_url)?;
            let request = NearbyRequest::new(
                Coordinate::new(latitude, longitude),
                search_type.into(),
                radius,
            )?;
            run_nearby(&client, &request).await
        }
        Commands::Migrate => run_migrate().await,
    }
}

async fn run_nearby(client: &PlacesClient, request: &NearbyRequest) -> anyhow::Result<()> {
    let outcome = client.find_nearby(request).await?;
    let mut stdout = std::io::stdout().lock();

    match outcome {
        NearbyOutcome::Found(result) => {
            serde_json::to_writer_pretty(&mut stdout, &result)?;
            writeln!(stdout)?;
            Ok(())
        }
        NearbyOutcome::Rejected(rejection) => {
            stdout.write_all(&rejection.body)?;
            writeln!(stdout)?;
            anyhow::bail!("places provider returned HTTP {}", rejection.status)
        }
    }
}

async fn run_migrate() -> anyhow::Result<()> {
    let config = bandpics_core::load_app_config()?;
    let pool_config = bandpics_db::PoolConfig::from_app_config(&config);
    let pool = bandpics_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("connecting to database")?;
    bandpics_db::run_migrations(&pool)
        .await
        .context("running migrations")?;
    tracing::info!("migrations applied");
    Ok(())
}
