use stance_tracker::{build_rocket, config::TrackerConfig, logging, AppState};
use tracing::info;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    logging::init();
    info!("🚀 Starting stance tracker");

    let config = TrackerConfig::from_figment(&rocket::Config::figment());
    let state = AppState::new(config.backend(), config);

    let _rocket = build_rocket(state).launch().await?;
    info!("👋 Stance tracker stopped");
    Ok(())
}
