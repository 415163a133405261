use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use thiserror::Error;

use crate::capture::domain::frame_sampler::FrameSampler;
use crate::capture::domain::frame_source::FrameSource;
use crate::channel::domain::channel_state::ChannelState;
use crate::channel::domain::channel_state_machine::{ChannelStateMachine, TickStats};
use crate::channel::infrastructure::channel_worker::{
    spawn_channel_worker, ChannelError, ChannelHandle,
};
use crate::engine::event_router::{
    ChannelPresentation, EngineUpdate, EventRouter, RouterCollaborators,
};
use crate::notification::domain::notification_sink::NotificationSink;
use crate::recognition::domain::recognition_client::RecognitionClient;
use crate::recognition::domain::recognition_service::RecognitionService;
use crate::recommendation::domain::recommendation_service::{
    FallbackRecommendations, RecommendationService,
};
use crate::registration::domain::registration_handoff::RegistrationHandoff;
use crate::shared::camera_channel::CameraChannel;
use crate::shared::engine_config::{ConfigError, EngineConfig};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} channel is not configured")]
    UnknownChannel(CameraChannel),
    #[error("{0} channel is already configured")]
    DuplicateChannel(CameraChannel),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}

/// External services the engine talks to. Only recognition and
/// notifications are mandatory.
pub struct Collaborators {
    pub recognition: Arc<dyn RecognitionService>,
    pub notifications: Arc<dyn NotificationSink>,
    pub recommendations: Option<Arc<dyn RecommendationService>>,
    pub fallback: Option<Arc<dyn FallbackRecommendations>>,
    pub registration: Option<Arc<dyn RegistrationHandoff>>,
}

impl Collaborators {
    pub fn new(
        recognition: Arc<dyn RecognitionService>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            recognition,
            notifications,
            recommendations: None,
            fallback: None,
            registration: None,
        }
    }

    pub fn with_recommendations(mut self, service: Arc<dyn RecommendationService>) -> Self {
        self.recommendations = Some(service);
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackRecommendations>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_registration(mut self, handoff: Arc<dyn RegistrationHandoff>) -> Self {
        self.registration = Some(handoff);
        self
    }
}

/// Runs one worker per camera channel and routes their reports.
///
/// Commands are asynchronous: `start_channel` returns once the worker has
/// the command, and the resulting state change arrives on [`subscribe`].
///
/// [`subscribe`]: OrchestrationEngine::subscribe
pub struct OrchestrationEngine {
    config: EngineConfig,
    client: RecognitionClient,
    router: EventRouter,
    channels: BTreeMap<CameraChannel, ChannelHandle>,
}

impl OrchestrationEngine {
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Result<Self, EngineError> {
        config.validate()?;
        let router = EventRouter::new(RouterCollaborators {
            notifications: collaborators.notifications,
            recommendations: collaborators.recommendations,
            fallback: collaborators.fallback,
            registration: collaborators.registration,
        });
        Ok(Self {
            config,
            client: RecognitionClient::new(collaborators.recognition),
            router,
            channels: BTreeMap::new(),
        })
    }

    /// Spawns an idle worker for `channel` reading from `source`.
    pub fn add_channel(
        &mut self,
        channel: CameraChannel,
        source: Box<dyn FrameSource>,
    ) -> Result<(), EngineError> {
        if self.channels.contains_key(&channel) {
            return Err(EngineError::DuplicateChannel(channel));
        }
        self.router.register_channel(channel);
        let handle = spawn_channel_worker(
            ChannelStateMachine::new(channel, &self.config),
            FrameSampler::new(channel, source),
            self.client.clone(),
            Arc::new(self.router.clone()),
        );
        self.channels.insert(channel, handle);
        log::info!("{channel} channel ready");
        Ok(())
    }

    pub fn start_channel(&self, channel: CameraChannel) -> Result<(), EngineError> {
        Ok(self.handle(channel)?.start()?)
    }

    pub fn stop_channel(&self, channel: CameraChannel) -> Result<(), EngineError> {
        Ok(self.handle(channel)?.stop()?)
    }

    pub fn start_all(&self) -> Result<(), EngineError> {
        self.channels.values().try_for_each(|h| Ok(h.start()?))
    }

    pub fn stop_all(&self) -> Result<(), EngineError> {
        self.channels.values().try_for_each(|h| Ok(h.stop()?))
    }

    pub fn subscribe(&self) -> Receiver<EngineUpdate> {
        self.router.subscribe()
    }

    pub fn presentation(&self, channel: CameraChannel) -> Option<ChannelPresentation> {
        self.router.presentation(channel)
    }

    /// Last state reported by the channel's worker.
    pub fn channel_state(&self, channel: CameraChannel) -> Option<ChannelState> {
        self.router.presentation(channel).map(|p| p.state)
    }

    pub fn channels(&self) -> Vec<CameraChannel> {
        self.channels.keys().copied().collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stops every worker and waits for its thread to finish.
    pub fn shutdown(&mut self) -> BTreeMap<CameraChannel, TickStats> {
        std::mem::take(&mut self.channels)
            .into_iter()
            .filter_map(|(channel, mut handle)| handle.shutdown().map(|stats| (channel, stats)))
            .collect()
    }

    fn handle(&self, channel: CameraChannel) -> Result<&ChannelHandle, EngineError> {
        self.channels
            .get(&channel)
            .ok_or(EngineError::UnknownChannel(channel))
    }
}

impl Drop for OrchestrationEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
