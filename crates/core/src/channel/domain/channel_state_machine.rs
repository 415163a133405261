use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::channel::domain::channel_state::ChannelState;
use crate::channel::domain::tick_failure::TickFailure;
use crate::detection::domain::detection_classifier::DetectionClassifier;
use crate::detection::domain::detection_event::DetectionEvent;
use crate::detection::domain::duplicate_suppressor::DuplicateSuppressor;
use crate::detection::domain::recognition_outcome::RecognitionOutcome;
use crate::recognition::domain::raw_recognition::RawRecognition;
use crate::shared::camera_channel::CameraChannel;
use crate::shared::captured_image::CapturedImage;
use crate::shared::engine_config::{EngineConfig, RestartPolicy};

/// Generation counter shared between a state machine and its handle.
///
/// Advancing it invalidates every ticket handed out before, even while the
/// worker is still blocked on the network call that ticket belongs to.
#[derive(Debug, Clone, Default)]
pub struct EpochToken(Arc<AtomicU64>);

impl EpochToken {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Proof that a tick was started in a given epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTicket {
    epoch: u64,
}

impl TickTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// A captured frame together with the service's answer for it.
#[derive(Debug, Clone)]
pub struct Observation {
    pub image: Arc<CapturedImage>,
    pub raw: RawRecognition,
}

#[derive(Debug)]
pub enum TickResolution {
    /// Late result from a stopped or restarted session.
    Discarded,
    Failed(TickFailure),
    NoFace,
    Duplicate,
    Resolved { event: DetectionEvent, hold: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStats {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub failures: u64,
    pub discarded: u64,
    pub events: u64,
}

/// Per-channel detection lifecycle.
///
/// Holds no timers of its own: the caller passes `now` in and asks
/// [`ChannelStateMachine::next_deadline`] when to come back.
pub struct ChannelStateMachine {
    channel: CameraChannel,
    config: EngineConfig,
    classifier: DetectionClassifier,
    suppressor: DuplicateSuppressor,
    state: ChannelState,
    epoch: EpochToken,
    last_reported: Option<RecognitionOutcome>,
    /// Epoch of the ticket currently out, if any.
    in_flight: Option<u64>,
    sampling_started: Option<Instant>,
    next_tick: Option<Instant>,
    cooldown_until: Option<Instant>,
    transitions: Vec<ChannelState>,
    stats: TickStats,
}

impl ChannelStateMachine {
    pub fn new(channel: CameraChannel, config: &EngineConfig) -> Self {
        Self {
            channel,
            config: config.clone(),
            classifier: DetectionClassifier::new(config.confidence_threshold),
            suppressor: DuplicateSuppressor::new(config.proximity_px),
            state: ChannelState::Idle,
            epoch: EpochToken::default(),
            last_reported: None,
            in_flight: None,
            sampling_started: None,
            next_tick: None,
            cooldown_until: None,
            transitions: Vec::new(),
            stats: TickStats::default(),
        }
    }

    pub fn channel(&self) -> CameraChannel {
        self.channel
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn epoch_token(&self) -> EpochToken {
        self.epoch.clone()
    }

    pub fn last_reported(&self) -> Option<&RecognitionOutcome> {
        self.last_reported.as_ref()
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Enters `Sampling` with fresh outcome memory. Returns `false` if already sampling.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state == ChannelState::Sampling {
            return false;
        }
        if self.state != ChannelState::Idle {
            self.epoch.advance();
        }
        self.last_reported = None;
        self.enter_sampling(now);
        true
    }

    /// Returns to `Idle` from any state, dropping timers and in-flight work.
    pub fn stop(&mut self) {
        self.epoch.advance();
        self.last_reported = None;
        self.in_flight = None;
        self.sampling_started = None;
        self.next_tick = None;
        self.cooldown_until = None;
        self.set_state(ChannelState::Idle);
    }

    /// Starts a tick, or returns `None` when not sampling or when the
    /// previous tick has not completed yet (counted as skipped).
    pub fn begin_tick(&mut self) -> Option<TickTicket> {
        if self.state != ChannelState::Sampling {
            return None;
        }
        if self.in_flight.is_some() {
            self.stats.skipped_ticks += 1;
            log::debug!("{} tick skipped, previous call still in flight", self.channel);
            return None;
        }
        let epoch = self.epoch.current();
        self.in_flight = Some(epoch);
        self.stats.ticks += 1;
        Some(TickTicket { epoch })
    }

    pub fn complete_tick(
        &mut self,
        ticket: TickTicket,
        result: Result<Observation, TickFailure>,
        now: Instant,
    ) -> TickResolution {
        if ticket.epoch != self.epoch.current() || self.state != ChannelState::Sampling {
            self.stats.discarded += 1;
            log::debug!(
                "{} discarded result from epoch {} (now {})",
                self.channel,
                ticket.epoch,
                self.epoch.current()
            );
            if self.state == ChannelState::Sampling && self.in_flight == Some(ticket.epoch) {
                self.in_flight = None;
                self.schedule_next_tick(now);
            }
            return TickResolution::Discarded;
        }

        self.in_flight = None;
        self.schedule_next_tick(now);

        let observation = match result {
            Ok(observation) => observation,
            Err(failure) => {
                self.stats.failures += 1;
                return TickResolution::Failed(failure);
            }
        };

        let outcome = self.classifier.classify(&observation.raw);
        if outcome == RecognitionOutcome::NoFace {
            return TickResolution::NoFace;
        }
        if self
            .suppressor
            .is_same_event(self.last_reported.as_ref(), &outcome)
        {
            return TickResolution::Duplicate;
        }

        let hold = self.config.hold_for(outcome.kind());
        let event = DetectionEvent::new(self.channel, outcome.clone(), observation.image);
        self.last_reported = Some(outcome);
        self.stats.events += 1;

        self.set_state(ChannelState::Resolved);
        self.sampling_started = None;
        self.next_tick = None;
        self.cooldown_until = Some(now + hold);
        self.set_state(ChannelState::Cooldown);

        TickResolution::Resolved { event, hold }
    }

    /// Ends the cooldown once its deadline has passed. Returns `true` if it did.
    ///
    /// Under [`RestartPolicy::Automatic`] the machine resumes sampling and
    /// keeps the last outcome, so someone still standing in frame is not
    /// reported again.
    pub fn cooldown_elapsed(&mut self, now: Instant) -> bool {
        if self.state != ChannelState::Cooldown {
            return false;
        }
        match self.cooldown_until {
            Some(until) if now >= until => {}
            _ => return false,
        }

        self.cooldown_until = None;
        self.set_state(ChannelState::Idle);
        match self.config.restart_policy {
            RestartPolicy::Manual => self.last_reported = None,
            RestartPolicy::Automatic => self.enter_sampling(now),
        }
        true
    }

    /// When the owner should next call into the machine.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            ChannelState::Sampling => self.next_tick,
            ChannelState::Cooldown => self.cooldown_until,
            ChannelState::Idle | ChannelState::Resolved => None,
        }
    }

    /// First cadence boundary strictly after `now`, and how many boundaries
    /// since the last scheduled one were missed.
    ///
    /// Boundaries sit at `sampling_started + k * poll_interval`.
    pub fn next_tick_after(&self, now: Instant) -> Option<(Instant, u64)> {
        let anchor = self.sampling_started?;
        let interval = self.config.poll_interval.as_nanos().max(1);

        let next_index = now.saturating_duration_since(anchor).as_nanos() / interval + 1;
        let scheduled_index = self
            .next_tick
            .map(|t| t.saturating_duration_since(anchor).as_nanos() / interval)
            .unwrap_or(0);
        let skipped = next_index.saturating_sub(scheduled_index + 1);

        let offset = Duration::from_nanos(u64::try_from(next_index * interval).unwrap_or(u64::MAX));
        Some((
            anchor + offset,
            u64::try_from(skipped).unwrap_or(u64::MAX),
        ))
    }

    /// State changes since the last call, oldest first.
    pub fn drain_transitions(&mut self) -> Vec<ChannelState> {
        std::mem::take(&mut self.transitions)
    }

    fn schedule_next_tick(&mut self, now: Instant) {
        if let Some((next, skipped)) = self.next_tick_after(now) {
            if skipped > 0 {
                self.stats.skipped_ticks += skipped;
                log::debug!("{} skipped {skipped} tick(s) during a slow call", self.channel);
            }
            self.next_tick = Some(next);
        }
    }

    fn enter_sampling(&mut self, now: Instant) {
        self.in_flight = None;
        self.cooldown_until = None;
        self.sampling_started = Some(now);
        self.next_tick = Some(now + self.config.poll_interval);
        self.set_state(ChannelState::Sampling);
    }

    fn set_state(&mut self, state: ChannelState) {
        if self.state != state {
            self.state = state;
            self.transitions.push(state);
        }
    }
}
