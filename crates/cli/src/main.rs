mod console;
mod settings;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::thread;

use clap::Parser;

use gatewatch_core::capture::domain::frame_source::FrameSource;
use gatewatch_core::capture::infrastructure::image_sequence_source::ImageSequenceSource;
use gatewatch_core::capture::infrastructure::snapshot_file_source::SnapshotFileSource;
use gatewatch_core::engine::orchestration_engine::{Collaborators, OrchestrationEngine};
use gatewatch_core::notification::infrastructure::log_notification_sink::LogNotificationSink;
use gatewatch_core::recognition::infrastructure::http_recognition_service::HttpRecognitionService;
use gatewatch_core::recommendation::infrastructure::http_recommendation_service::HttpRecommendationService;
use gatewatch_core::recommendation::infrastructure::static_fallback_recommendations::StaticFallbackRecommendations;
use gatewatch_core::registration::infrastructure::inbox_registration_handoff::InboxRegistrationHandoff;
use gatewatch_core::shared::camera_channel::CameraChannel;

use console::{describe_presentation, describe_update, parse_command, Command, HELP};
use settings::Settings;

/// Entry/exit face detection console for a showroom.
#[derive(Parser)]
#[command(name = "gatewatch")]
struct Cli {
    /// Entry camera: a snapshot file kept fresh by the camera, or a directory of images to replay.
    #[arg(long)]
    entry: Option<PathBuf>,

    /// Exit camera: a snapshot file or a directory of images.
    #[arg(long)]
    exit: Option<PathBuf>,

    /// Recognition service base URL (default: $GATEWATCH_SERVICE_URL or http://localhost:8000/api).
    #[arg(long)]
    service_url: Option<String>,

    /// Milliseconds between samples on a channel.
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Seconds a confirmed recognition stays on screen.
    #[arg(long)]
    recognized_hold: Option<u64>,

    /// Seconds an unconfirmed or unregistered result stays on screen.
    #[arg(long)]
    unconfirmed_hold: Option<u64>,

    /// Minimum match confidence (0-100) to count as a known client.
    #[arg(long)]
    confidence_threshold: Option<f64>,

    /// Pixel distance under which two unidentified faces are the same visitor.
    #[arg(long)]
    proximity: Option<f64>,

    /// Resume sampling automatically when a cooldown ends.
    #[arg(long)]
    auto_restart: bool,

    /// JSON list of cars to show when personalised recommendations are unavailable.
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Directory that receives unregistered visitors' captures.
    #[arg(long)]
    registration_inbox: Option<PathBuf>,

    /// Do not fetch recommendations for recognized clients.
    #[arg(long)]
    no_recommendations: bool,

    /// Settings file (default: <config dir>/Gatewatch/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings back to the settings file.
    #[arg(long)]
    save_settings: bool,

    /// Channels to start right away (comma-separated, e.g. entry,exit).
    #[arg(long, value_delimiter = ',')]
    start: Option<Vec<CameraChannel>>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().or_else(Settings::default_path);
    let mut settings = match &settings_path {
        Some(path) => Settings::load_from(path)?,
        None => Settings::default(),
    };
    apply_overrides(&mut settings, &cli);
    validate(&settings)?;

    if cli.save_settings {
        let path = settings_path.ok_or("No config directory available; pass --settings")?;
        settings.save_to(&path)?;
        log::info!("Settings saved to {}", path.display());
    }

    let mut engine =
        OrchestrationEngine::new(settings.engine_config(), build_collaborators(&settings)?)?;

    let sources = [
        (CameraChannel::Entry, &settings.entry_source),
        (CameraChannel::Exit, &settings.exit_source),
    ];
    for (channel, path) in sources {
        if let Some(path) = path {
            engine.add_channel(channel, open_source(path)?)?;
            log::info!("{channel} camera: {}", path.display());
        }
    }

    let updates = engine.subscribe();
    thread::spawn(move || {
        for update in updates {
            println!("{}", describe_update(&update));
        }
    });

    for channel in cli.start.unwrap_or_default() {
        engine.start_channel(channel)?;
    }

    run_console(&engine)?;

    for (channel, stats) in engine.shutdown() {
        log::info!(
            "{channel}: {} ticks, {} skipped, {} failed, {} events",
            stats.ticks,
            stats.skipped_ticks,
            stats.failures,
            stats.events
        );
    }
    Ok(())
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(path) = &cli.entry {
        settings.entry_source = Some(path.clone());
    }
    if let Some(path) = &cli.exit {
        settings.exit_source = Some(path.clone());
    }
    if let Some(url) = &cli.service_url {
        settings.service_url = Some(url.clone());
    }
    if let Some(ms) = cli.poll_ms {
        settings.poll_interval_ms = ms;
    }
    if let Some(secs) = cli.recognized_hold {
        settings.recognized_hold_secs = secs;
    }
    if let Some(secs) = cli.unconfirmed_hold {
        settings.unconfirmed_hold_secs = secs;
    }
    if let Some(threshold) = cli.confidence_threshold {
        settings.confidence_threshold = threshold;
    }
    if let Some(px) = cli.proximity {
        settings.proximity_px = px;
    }
    if cli.auto_restart {
        settings.auto_restart = true;
    }
    if cli.no_recommendations {
        settings.recommendations = false;
    }
    if let Some(path) = &cli.fallback {
        settings.fallback_file = Some(path.clone());
    }
    if let Some(path) = &cli.registration_inbox {
        settings.registration_inbox = Some(path.clone());
    }
}

fn validate(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if settings.entry_source.is_none() && settings.exit_source.is_none() {
        return Err("No camera configured; pass --entry and/or --exit".into());
    }
    for path in [&settings.entry_source, &settings.exit_source]
        .into_iter()
        .flatten()
    {
        if !path.exists() {
            log::warn!(
                "Camera source {} does not exist yet; ticks will fail until it appears",
                path.display()
            );
        }
    }
    if let Some(path) = &settings.fallback_file {
        if !path.is_file() {
            return Err(format!("Fallback file not found: {}", path.display()).into());
        }
    }
    settings.engine_config().validate()?;
    Ok(())
}

fn build_collaborators(settings: &Settings) -> Result<Collaborators, Box<dyn std::error::Error>> {
    let service = settings.service_config();
    log::info!("Recognition service: {}", service.base_url);

    let mut collaborators = Collaborators::new(
        Arc::new(HttpRecognitionService::new(service.clone())?),
        Arc::new(LogNotificationSink::new()),
    );
    if settings.recommendations {
        collaborators =
            collaborators.with_recommendations(Arc::new(HttpRecommendationService::new(service)?));
    }
    if let Some(path) = &settings.fallback_file {
        let fallback = StaticFallbackRecommendations::from_json(&std::fs::read_to_string(path)?)?;
        collaborators = collaborators.with_fallback(Arc::new(fallback));
    }
    if let Some(inbox) = &settings.registration_inbox {
        collaborators =
            collaborators.with_registration(Arc::new(InboxRegistrationHandoff::new(inbox)));
    }
    Ok(collaborators)
}

fn open_source(path: &Path) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    if path.is_dir() {
        Ok(Box::new(ImageSequenceSource::new(path)?))
    } else {
        Ok(Box::new(SnapshotFileSource::new(path)))
    }
}

fn run_console(engine: &OrchestrationEngine) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("{HELP}");
    for line in io::stdin().lock().lines() {
        let command = match parse_command(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            Command::Start(channels) => {
                for channel in channels {
                    if let Err(e) = engine.start_channel(channel) {
                        eprintln!("{e}");
                    }
                }
            }
            Command::Stop(channels) => {
                for channel in channels {
                    if let Err(e) = engine.stop_channel(channel) {
                        eprintln!("{e}");
                    }
                }
            }
            Command::Status => {
                for channel in engine.channels() {
                    if let Some(presentation) = engine.presentation(channel) {
                        println!("{}", describe_presentation(channel, &presentation));
                    }
                }
            }
            Command::Help => eprintln!("{HELP}"),
            Command::Quit => break,
        }
    }
    Ok(())
}
