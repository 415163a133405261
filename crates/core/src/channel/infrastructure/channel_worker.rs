use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{select, Receiver, Sender};
use thiserror::Error;

use crate::capture::domain::frame_sampler::FrameSampler;
use crate::channel::domain::channel_listener::ChannelListener;
use crate::channel::domain::channel_state::ChannelState;
use crate::channel::domain::channel_state_machine::{
    ChannelStateMachine, EpochToken, Observation, TickResolution, TickStats,
};
use crate::channel::domain::tick_failure::TickFailure;
use crate::recognition::domain::recognition_client::RecognitionClient;
use crate::shared::camera_channel::CameraChannel;

pub enum ChannelCommand {
    Start,
    Stop,
    Shutdown,
}

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("{0} channel worker is no longer running")]
    WorkerGone(CameraChannel),
}

/// Control side of a running channel worker.
///
/// Dropping the handle shuts the worker down and joins its thread.
pub struct ChannelHandle {
    channel: CameraChannel,
    commands: Sender<ChannelCommand>,
    epoch: EpochToken,
    thread: Option<JoinHandle<TickStats>>,
}

impl ChannelHandle {
    pub fn channel(&self) -> CameraChannel {
        self.channel
    }

    pub fn start(&self) -> Result<(), ChannelError> {
        self.send(ChannelCommand::Start)
    }

    /// Invalidates any in-flight tick right away, then asks the worker to go idle.
    pub fn stop(&self) -> Result<(), ChannelError> {
        self.epoch.advance();
        self.send(ChannelCommand::Stop)
    }

    /// Stops the worker and waits for it. Returns its tick statistics, or
    /// `None` if it was already shut down or panicked.
    pub fn shutdown(&mut self) -> Option<TickStats> {
        let thread = self.thread.take()?;
        self.epoch.advance();
        let _ = self.commands.send(ChannelCommand::Shutdown);
        thread.join().ok()
    }

    fn send(&self, command: ChannelCommand) -> Result<(), ChannelError> {
        self.commands
            .send(command)
            .map_err(|_| ChannelError::WorkerGone(self.channel))
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Moves a channel's state machine onto its own thread.
///
/// The worker sleeps until the machine's next deadline or a command,
/// whichever comes first. Capture and recognition run inline, so a channel
/// never has more than one recognition call outstanding.
pub fn spawn_channel_worker(
    machine: ChannelStateMachine,
    sampler: FrameSampler,
    client: RecognitionClient,
    listener: Arc<dyn ChannelListener>,
) -> ChannelHandle {
    let channel = machine.channel();
    let epoch = machine.epoch_token();
    let (tx, rx) = crossbeam_channel::unbounded::<ChannelCommand>();

    let thread = thread::spawn(move || {
        let mut worker = Worker {
            machine,
            sampler,
            client,
            listener,
        };
        worker.run(&rx)
    });

    ChannelHandle {
        channel,
        commands: tx,
        epoch,
        thread: Some(thread),
    }
}

struct Worker {
    machine: ChannelStateMachine,
    sampler: FrameSampler,
    client: RecognitionClient,
    listener: Arc<dyn ChannelListener>,
}

impl Worker {
    fn run(&mut self, commands: &Receiver<ChannelCommand>) -> TickStats {
        loop {
            let timer = match self.machine.next_deadline() {
                Some(deadline) => crossbeam_channel::at(deadline),
                None => crossbeam_channel::never(),
            };

            let keep_running = select! {
                recv(commands) -> command => match command {
                    Ok(ChannelCommand::Start) => {
                        self.start();
                        true
                    }
                    Ok(ChannelCommand::Stop) => {
                        self.stop();
                        true
                    }
                    Ok(ChannelCommand::Shutdown) | Err(_) => false,
                },
                recv(timer) -> _ => {
                    self.on_deadline();
                    true
                }
            };

            if !keep_running {
                break;
            }
        }

        self.machine.stop();
        self.publish_transitions();
        let stats = self.machine.stats();
        log::info!(
            "{} channel shut down: {} ticks, {} skipped, {} failed, {} discarded, {} events",
            self.machine.channel(),
            stats.ticks,
            stats.skipped_ticks,
            stats.failures,
            stats.discarded,
            stats.events
        );
        stats
    }

    fn start(&mut self) {
        if self.machine.start(Instant::now()) {
            log::info!("{} channel started", self.machine.channel());
        } else {
            log::debug!("{} channel already sampling", self.machine.channel());
        }
        self.publish_transitions();
    }

    fn stop(&mut self) {
        let was = self.machine.state();
        self.machine.stop();
        if was != ChannelState::Idle {
            let stats = self.machine.stats();
            log::info!(
                "{} channel stopped: {} ticks, {} skipped, {} failed",
                self.machine.channel(),
                stats.ticks,
                stats.skipped_ticks,
                stats.failures
            );
        }
        self.publish_transitions();
    }

    fn on_deadline(&mut self) {
        match self.machine.state() {
            ChannelState::Cooldown => {
                if self.machine.cooldown_elapsed(Instant::now()) {
                    self.listener.on_cooldown_elapsed(self.machine.channel());
                    self.publish_transitions();
                }
            }
            ChannelState::Sampling => self.tick(),
            ChannelState::Idle | ChannelState::Resolved => {}
        }
    }

    fn tick(&mut self) {
        let Some(ticket) = self.machine.begin_tick() else {
            return;
        };
        let result = self.observe();
        let channel = self.machine.channel();

        match self.machine.complete_tick(ticket, result, Instant::now()) {
            TickResolution::Resolved { event, hold } => {
                log::info!(
                    "{} resolved {:?} (event #{}), holding for {:?}",
                    channel,
                    event.outcome.kind(),
                    event.id,
                    hold
                );
                self.publish_transitions();
                self.listener.on_detection(&event);
            }
            TickResolution::Failed(failure) => {
                log::warn!("{channel} tick failed: {failure}");
                self.listener.on_tick_failed(channel, &failure);
            }
            TickResolution::Discarded | TickResolution::NoFace | TickResolution::Duplicate => {}
        }
    }

    fn observe(&mut self) -> Result<Observation, TickFailure> {
        let image = Arc::new(self.sampler.sample()?);
        let raw = self.client.recognize(&image)?;
        Ok(Observation { image, raw })
    }

    fn publish_transitions(&mut self) {
        let channel = self.machine.channel();
        for state in self.machine.drain_transitions() {
            self.listener.on_state_changed(channel, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::capture::domain::frame_source::{CaptureError, FrameSource};
    use crate::detection::domain::detection_event::DetectionEvent;
    use crate::detection::domain::recognition_outcome::OutcomeKind;
    use crate::recognition::domain::raw_recognition::RawRecognition;
    use crate::recognition::domain::recognition_service::{RecognitionError, RecognitionService};
    use crate::shared::captured_image::CapturedImage;
    use crate::shared::engine_config::EngineConfig;
    use crate::shared::face_box::FaceBox;

    const WAIT: Duration = Duration::from_secs(2);

    #[derive(Debug)]
    enum Record {
        State(ChannelState),
        Detection(OutcomeKind),
        Failed,
        CooldownElapsed,
    }

    struct RecordingListener {
        tx: Sender<Record>,
    }

    impl ChannelListener for RecordingListener {
        fn on_state_changed(&self, _channel: CameraChannel, state: ChannelState) {
            let _ = self.tx.send(Record::State(state));
        }

        fn on_detection(&self, event: &DetectionEvent) {
            let _ = self.tx.send(Record::Detection(event.outcome.kind()));
        }

        fn on_tick_failed(&self, _channel: CameraChannel, _failure: &TickFailure) {
            let _ = self.tx.send(Record::Failed);
        }

        fn on_cooldown_elapsed(&self, _channel: CameraChannel) {
            let _ = self.tx.send(Record::CooldownElapsed);
        }
    }

    struct StubSource {
        fail: bool,
    }

    impl FrameSource for StubSource {
        fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
            if self.fail {
                Err(CaptureError::NoFrame("camera offline".into()))
            } else {
                Ok(vec![0xFF, 0xD8, 0xFF])
            }
        }
    }

    /// Replays canned responses, then reports no face forever.
    struct ScriptedRecognizer {
        script: Mutex<VecDeque<RawRecognition>>,
    }

    impl RecognitionService for ScriptedRecognizer {
        fn recognize(&self, _image: &CapturedImage) -> Result<RawRecognition, RecognitionError> {
            Ok(self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        }
    }

    /// Blocks every call until the test releases it.
    struct GatedRecognizer {
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl RecognitionService for GatedRecognizer {
        fn recognize(&self, _image: &CapturedImage) -> Result<RawRecognition, RecognitionError> {
            let _ = self.entered.send(());
            let _ = self.release.recv_timeout(WAIT);
            Ok(RawRecognition::matched(
                FaceBox::new(0.0, 100.0, 100.0, 0.0),
                "42",
                "Ada",
                95.0,
            ))
        }
    }

    fn fast_config() -> EngineConfig {
        EngineConfig {
            poll_interval: Duration::from_millis(20),
            recognized_hold: Duration::from_millis(60),
            unconfirmed_hold: Duration::from_millis(40),
            ..EngineConfig::default()
        }
    }

    fn spawn(
        source: StubSource,
        service: Arc<dyn RecognitionService>,
    ) -> (ChannelHandle, Receiver<Record>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let machine = ChannelStateMachine::new(CameraChannel::Entry, &fast_config());
        let sampler = FrameSampler::new(CameraChannel::Entry, Box::new(source));
        let handle = spawn_channel_worker(
            machine,
            sampler,
            RecognitionClient::new(service),
            Arc::new(RecordingListener { tx }),
        );
        (handle, rx)
    }

    fn scripted(script: Vec<RawRecognition>) -> Arc<dyn RecognitionService> {
        Arc::new(ScriptedRecognizer {
            script: Mutex::new(script.into()),
        })
    }

    fn wait_for(rx: &Receiver<Record>, pred: impl Fn(&Record) -> bool) -> Vec<Record> {
        let mut seen = Vec::new();
        loop {
            let record = rx.recv_timeout(WAIT).expect("timed out waiting for record");
            let done = pred(&record);
            seen.push(record);
            if done {
                return seen;
            }
        }
    }

    #[test]
    fn test_reports_detection_and_returns_to_idle() {
        let (mut handle, rx) = spawn(
            StubSource { fail: false },
            scripted(vec![
                RawRecognition::no_face(),
                RawRecognition::matched(FaceBox::new(10.0, 110.0, 110.0, 10.0), "42", "Ada", 75.0),
            ]),
        );

        handle.start().unwrap();
        let seen = wait_for(&rx, |r| matches!(r, Record::CooldownElapsed));

        let detections: Vec<_> = seen
            .iter()
            .filter_map(|r| match r {
                Record::Detection(kind) => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(detections, vec![OutcomeKind::Recognized]);
        assert!(matches!(seen[0], Record::State(ChannelState::Sampling)));
        assert!(seen
            .iter()
            .any(|r| matches!(r, Record::State(ChannelState::Cooldown))));

        let after = wait_for(&rx, |r| matches!(r, Record::State(ChannelState::Idle)));
        assert_eq!(after.len(), 1);

        let stats = handle.shutdown().unwrap();
        assert_eq!(stats.events, 1);
    }

    #[test]
    fn test_stop_mid_flight_drops_late_response() {
        let (entered_tx, entered_rx) = crossbeam_channel::unbounded();
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        let (mut handle, rx) = spawn(
            StubSource { fail: false },
            Arc::new(GatedRecognizer {
                entered: entered_tx,
                release: release_rx,
            }),
        );

        handle.start().unwrap();
        entered_rx.recv_timeout(WAIT).unwrap();
        handle.stop().unwrap();
        release_tx.send(()).unwrap();

        let seen = wait_for(&rx, |r| matches!(r, Record::State(ChannelState::Idle)));
        assert!(!seen.iter().any(|r| matches!(r, Record::Detection(_))));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        let stats = handle.shutdown().unwrap();
        assert_eq!(stats.events, 0);
        assert_eq!(stats.discarded, 1);
    }

    #[test]
    fn test_capture_failure_is_reported_and_sampling_continues() {
        let (mut handle, rx) = spawn(StubSource { fail: true }, scripted(Vec::new()));

        handle.start().unwrap();
        wait_for(&rx, |r| matches!(r, Record::Failed));
        wait_for(&rx, |r| matches!(r, Record::Failed));

        let stats = handle.shutdown().unwrap();
        assert!(stats.failures >= 2);
        assert_eq!(stats.events, 0);
    }

    #[test]
    fn test_commands_after_shutdown_fail() {
        let (mut handle, _rx) = spawn(StubSource { fail: false }, scripted(Vec::new()));

        assert!(handle.shutdown().is_some());
        assert!(handle.shutdown().is_none());
        assert!(matches!(
            handle.start(),
            Err(ChannelError::WorkerGone(CameraChannel::Entry))
        ));
    }
}
