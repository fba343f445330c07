//! Interval Trainer - a self-hosted work/rest interval timer
//!
//! This is the main entry point for the interval-trainer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use interval_trainer::{
    api::create_router,
    config::Config,
    services::{
        CommandCuePlayer, CuePlayer, LogCuePlayer, LogMediaPlayer, MonotonicClock,
        VolumeStore, DEFAULT_VOLUME,
    },
    state::{default_tracks, AppState, Playlist, TimerConfig},
    tasks::{ticker_task, Dispatcher},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("interval_trainer={},tower_http=info", config.log_level()))
        .init();

    let timer = TimerConfig::default();
    info!("Starting interval-trainer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, workout={}s+{}x({}s work/{}s rest)",
        config.host,
        config.port,
        config.tick_interval().as_millis(),
        timer.pre_delay_secs,
        timer.cycle_count,
        timer.work_secs,
        timer.rest_secs
    );

    // Load the persisted volume, falling back to the default on a bad store
    let mut store = VolumeStore::new(&config.store_path);
    let volume = store.load().unwrap_or_else(|e| {
        warn!("Failed to load {}: {}, using volume {}", store.path().display(), e, DEFAULT_VOLUME);
        DEFAULT_VOLUME
    });

    let playlist = Playlist::shuffled(default_tracks(), &mut rand::thread_rng());

    let state = Arc::new(AppState::new(
        timer,
        config.tick_interval(),
        Arc::new(MonotonicClock::new()),
        playlist,
        store,
        volume,
    ));

    // Players live as long as the ticker task that owns the dispatcher
    let cues: Arc<dyn CuePlayer> = match &config.cue_command {
        Some(command) => {
            info!("Playing cues with '{}' from {}", command, config.cue_dir.display());
            Arc::new(CommandCuePlayer::new(command.clone(), config.cue_dir.clone()))
        }
        None => Arc::new(LogCuePlayer),
    };
    let dispatcher = Dispatcher::new(cues, Arc::new(LogMediaPlayer));

    let ticker_state = Arc::clone(&state);
    let ticker = tokio::spawn(async move {
        ticker_task(ticker_state, dispatcher).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle                  - Start, pause or resume");
    info!("  POST /reset                   - Stop and clear progress");
    info!("  GET  /status                  - Current run state and phase");
    info!("  GET  /volume, PUT /volume     - Read or change the volume");
    info!("  GET  /playlist                - Background tracks");
    info!("  POST /playlist/select/:index  - Select a track");
    info!("  GET  /health                  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    ticker.abort();
    info!("Server shutdown complete");
    Ok(())
}
