use thiserror::Error;

use gatewatch_core::detection::domain::recognition_outcome::RecognitionOutcome;
use gatewatch_core::engine::event_router::{
    ChannelPresentation, EngineUpdate, RecommendationStatus,
};
use gatewatch_core::shared::camera_channel::{CameraChannel, ParseChannelError};

pub const HELP: &str = "\
Commands:
  start [entry|exit|all]   begin sampling (default: all)
  stop [entry|exit|all]    stop sampling (default: all)
  status                   show each channel's state and current detection
  help                     show this message
  quit                     stop all channels and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(Vec<CameraChannel>),
    Stop(Vec<CameraChannel>),
    Status,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error(transparent)]
    Channel(#[from] ParseChannelError),
    #[error("'{0}' takes at most one channel")]
    TooManyArguments(String),
}

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let target = words.next();
    if words.next().is_some() {
        return Err(CommandError::TooManyArguments(verb.to_string()));
    }

    let command = match verb.to_ascii_lowercase().as_str() {
        "start" => Command::Start(parse_targets(target)?),
        "stop" => Command::Stop(parse_targets(target)?),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        _ => return Err(CommandError::Unknown(verb.to_string())),
    };
    Ok(Some(command))
}

fn parse_targets(target: Option<&str>) -> Result<Vec<CameraChannel>, ParseChannelError> {
    match target {
        None => Ok(CameraChannel::ALL.to_vec()),
        Some(t) if t.eq_ignore_ascii_case("all") => Ok(CameraChannel::ALL.to_vec()),
        Some(t) => Ok(vec![t.parse()?]),
    }
}

/// One-line description of an engine update for the console.
pub fn describe_update(update: &EngineUpdate) -> String {
    match update {
        EngineUpdate::StateChanged { channel, state } => format!("[{channel}] {state}"),
        EngineUpdate::Detection(event) => {
            format!(
                "[{}] event #{}: {}",
                event.channel,
                event.id,
                describe_outcome(&event.outcome)
            )
        }
        EngineUpdate::RecommendationsReady {
            channel,
            event_id,
            status,
        } => format!("[{channel}] event #{event_id}: recommendations {status:?}"),
        EngineUpdate::PresentationCleared { channel } => format!("[{channel}] cleared"),
        EngineUpdate::TickFailed { channel, message } => {
            format!("[{channel}] tick failed: {message}")
        }
    }
}

pub fn describe_outcome(outcome: &RecognitionOutcome) -> String {
    match outcome {
        RecognitionOutcome::Recognized {
            identity_id,
            display_name,
            confidence,
            ..
        } => format!("{display_name} (client {identity_id}, {confidence:.1}%)"),
        RecognitionOutcome::UnconfirmedMatch { confidence, .. } => {
            format!("unconfirmed match ({confidence:.1}%)")
        }
        RecognitionOutcome::Unregistered { .. } => "unregistered visitor".to_string(),
        RecognitionOutcome::NoFace => "no face".to_string(),
    }
}

/// Multi-line status block for one channel.
pub fn describe_presentation(channel: CameraChannel, p: &ChannelPresentation) -> String {
    let mut lines = vec![format!("{}: {}", channel.label(), p.state)];
    if let Some(event) = &p.event {
        lines.push(format!(
            "  showing event #{}: {}",
            event.id,
            describe_outcome(&event.outcome)
        ));
    }
    match (&p.recommendations, p.recommendation_status) {
        (_, RecommendationStatus::None) => {}
        (Some(set), status) => {
            lines.push(format!("  recommendations ({status:?}):"));
            for car in set.cars().iter().take(3) {
                lines.push(format!(
                    "    {} {} {} ({}), interest {:.0}",
                    car.year, car.brand, car.model, car.category, car.interest_score
                ));
            }
        }
        (None, status) => lines.push(format!("  recommendations: {status:?}")),
    }
    if let Some(offer) = &p.registration {
        lines.push(format!(
            "  registration offered for frame #{}",
            offer.image.sequence()
        ));
    }
    lines.join("\n")
}
