// Fantasy scout entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config, copying defaults on first run
// 3. Fetch season data from the API or an offline snapshot
// 4. Pick the data regime and build the squad
// 5. Export the report and print where it went

use fantasy_scout::config;
use fantasy_scout::pipeline;

use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Fantasy scout starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, budget={}, squad of {}",
        config.league.name, config.league.budget, config.league.squad_size
    );

    let base_dir = std::env::current_dir().context("failed to read current directory")?;
    let provider = pipeline::provider_for(&config, &base_dir);
    let today = chrono::Local::now().date_naive();

    let summary = pipeline::run(&config, provider.as_ref(), &base_dir, today).await?;

    println!(
        "Collected {} players ({:?} regime, {} gameweeks played, {} left in the bank)",
        summary.rows.len(),
        summary.regime,
        summary.gameweeks_passed,
        summary.remaining_budget
    );
    for row in &summary.rows {
        println!(
            "  {:<3} {:<28} {:<16} {:>4}  {}",
            row.position.short_code(),
            row.name,
            row.club,
            row.price,
            row.comment.as_deref().unwrap_or("")
        );
    }
    println!(
        "ALL DONE! Please check your results here: {}",
        summary.paths.json.display()
    );

    info!("Fantasy scout finished");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("fantasy-scout.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("fantasy_scout=info,scout_core=info,scout_data=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
