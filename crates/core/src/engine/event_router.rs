use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::channel::domain::channel_listener::ChannelListener;
use crate::channel::domain::channel_state::ChannelState;
use crate::channel::domain::tick_failure::TickFailure;
use crate::detection::domain::detection_event::DetectionEvent;
use crate::detection::domain::recognition_outcome::RecognitionOutcome;
use crate::notification::domain::notification_sink::{NotificationLevel, NotificationSink};
use crate::recommendation::domain::recommendation_service::{
    FallbackRecommendations, RecommendationService,
};
use crate::recommendation::domain::recommended_car::RecommendationSet;
use crate::registration::domain::registration_handoff::RegistrationHandoff;
use crate::registration::domain::registration_offer::RegistrationOffer;
use crate::shared::camera_channel::CameraChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecommendationStatus {
    /// Nothing requested for the current event.
    #[default]
    None,
    Loading,
    /// Personalised list from the recommendation service.
    Ready,
    /// Caller-supplied list shown instead.
    Fallback,
    /// The fetch failed and there is no fallback.
    Unavailable,
}

/// What the operator screen shows for one channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelPresentation {
    pub state: ChannelState,
    pub event: Option<DetectionEvent>,
    pub recommendations: Option<RecommendationSet>,
    pub recommendation_status: RecommendationStatus,
    pub registration: Option<RegistrationOffer>,
}

impl ChannelPresentation {
    fn clear(&mut self) {
        self.event = None;
        self.recommendations = None;
        self.recommendation_status = RecommendationStatus::None;
        self.registration = None;
    }

    fn event_id(&self) -> Option<u64> {
        self.event.as_ref().map(|e| e.id)
    }
}

#[derive(Debug, Clone)]
pub enum EngineUpdate {
    StateChanged {
        channel: CameraChannel,
        state: ChannelState,
    },
    Detection(DetectionEvent),
    RecommendationsReady {
        channel: CameraChannel,
        event_id: u64,
        status: RecommendationStatus,
    },
    PresentationCleared {
        channel: CameraChannel,
    },
    TickFailed {
        channel: CameraChannel,
        message: String,
    },
}

pub(crate) struct RouterCollaborators {
    pub notifications: Arc<dyn NotificationSink>,
    pub recommendations: Option<Arc<dyn RecommendationService>>,
    pub fallback: Option<Arc<dyn FallbackRecommendations>>,
    pub registration: Option<Arc<dyn RegistrationHandoff>>,
}

struct SharedState {
    collaborators: RouterCollaborators,
    presentations: Mutex<HashMap<CameraChannel, ChannelPresentation>>,
    subscribers: Mutex<Vec<Sender<EngineUpdate>>>,
}

/// Turns channel reports into notifications, recommendation fetches,
/// registration offers and presentation state.
///
/// Both channel workers call into the same router. Locks are only held for
/// map updates; every slow side effect runs on its own thread.
#[derive(Clone)]
pub struct EventRouter {
    shared: Arc<SharedState>,
}

impl EventRouter {
    pub(crate) fn new(collaborators: RouterCollaborators) -> Self {
        Self {
            shared: Arc::new(SharedState {
                collaborators,
                presentations: Mutex::new(HashMap::new()),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn register_channel(&self, channel: CameraChannel) {
        self.presentations().entry(channel).or_default();
    }

    pub fn subscribe(&self) -> Receiver<EngineUpdate> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn presentation(&self, channel: CameraChannel) -> Option<ChannelPresentation> {
        self.presentations().get(&channel).cloned()
    }

    pub fn on_detection_event(&self, event: &DetectionEvent) {
        let channel = event.channel;
        let registration = match &event.outcome {
            RecognitionOutcome::Unregistered { face_box } => Some(RegistrationOffer {
                channel,
                event_id: event.id,
                image: Arc::clone(&event.image),
                face_box: *face_box,
                detected_at: event.timestamp,
            }),
            _ => None,
        };

        self.update(channel, |p| {
            p.clear();
            p.event = Some(event.clone());
            p.registration = registration.clone();
        });

        match &event.outcome {
            RecognitionOutcome::Recognized {
                display_name,
                confidence,
                ..
            } => {
                let pct = confidence.round();
                let message = match channel {
                    CameraChannel::Entry => format!("Client recognized: {display_name} ({pct:.0}%)"),
                    CameraChannel::Exit => format!("Exit detected: {display_name} ({pct:.0}%)"),
                };
                self.notify(&message, NotificationLevel::Success);
            }
            RecognitionOutcome::UnconfirmedMatch { confidence, .. } => self.notify(
                &format!(
                    "Face detected but confidence too low ({:.0}%)",
                    confidence.round()
                ),
                NotificationLevel::Warning,
            ),
            RecognitionOutcome::Unregistered { .. } => {
                self.notify("Unregistered visitor detected", NotificationLevel::Info)
            }
            RecognitionOutcome::NoFace => return,
        }

        self.publish(EngineUpdate::Detection(event.clone()));

        match &event.outcome {
            RecognitionOutcome::Recognized { identity_id, .. } => {
                self.fetch_recommendations(channel, event.id, identity_id.clone());
            }
            RecognitionOutcome::UnconfirmedMatch { .. } | RecognitionOutcome::Unregistered { .. } => {
                self.show_fallback(channel, event.id);
            }
            RecognitionOutcome::NoFace => {}
        }

        if let Some(offer) = registration {
            self.hand_off_registration(offer);
        }
    }

    fn fetch_recommendations(&self, channel: CameraChannel, event_id: u64, identity_id: String) {
        let Some(service) = self.shared.collaborators.recommendations.clone() else {
            return;
        };
        self.update(channel, |p| {
            if p.event_id() == Some(event_id) {
                p.recommendation_status = RecommendationStatus::Loading;
            }
        });

        let router = self.clone();
        thread::spawn(move || {
            let (set, status) = match service.fetch(&identity_id) {
                Ok(set) => (Some(set), RecommendationStatus::Ready),
                Err(e) => {
                    log::warn!("Recommendations for client {identity_id} failed: {e}");
                    router.notify("Failed to fetch recommendations", NotificationLevel::Warning);
                    match &router.shared.collaborators.fallback {
                        Some(fallback) => (
                            Some(fallback.fallback_for(Some(&identity_id))),
                            RecommendationStatus::Fallback,
                        ),
                        None => (None, RecommendationStatus::Unavailable),
                    }
                }
            };
            router.attach(channel, event_id, set, status);
        });
    }

    fn show_fallback(&self, channel: CameraChannel, event_id: u64) {
        if let Some(fallback) = &self.shared.collaborators.fallback {
            let set = fallback.fallback_for(None);
            self.attach(channel, event_id, Some(set), RecommendationStatus::Fallback);
        }
    }

    /// Stores recommendations only if the channel still shows `event_id`.
    fn attach(
        &self,
        channel: CameraChannel,
        event_id: u64,
        set: Option<RecommendationSet>,
        status: RecommendationStatus,
    ) -> bool {
        let attached = {
            let mut presentations = self.presentations();
            match presentations.get_mut(&channel) {
                Some(p) if p.event_id() == Some(event_id) => {
                    p.recommendations = set;
                    p.recommendation_status = status;
                    true
                }
                _ => false,
            }
        };

        if attached {
            self.publish(EngineUpdate::RecommendationsReady {
                channel,
                event_id,
                status,
            });
        } else {
            log::debug!("{channel} moved on from event #{event_id}, dropping recommendations");
        }
        attached
    }

    fn hand_off_registration(&self, offer: RegistrationOffer) {
        let Some(handoff) = self.shared.collaborators.registration.clone() else {
            return;
        };
        thread::spawn(move || {
            if let Err(e) = handoff.offer_registration(&offer) {
                log::warn!(
                    "Registration hand-off for {} event #{} failed: {e}",
                    offer.channel,
                    offer.event_id
                );
            }
        });
    }

    fn notify(&self, message: &str, level: NotificationLevel) {
        self.shared.collaborators.notifications.notify(message, level);
    }

    fn update(&self, channel: CameraChannel, f: impl FnOnce(&mut ChannelPresentation)) {
        f(self.presentations().entry(channel).or_default());
    }

    fn presentations(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<CameraChannel, ChannelPresentation>> {
        self.shared
            .presentations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, update: EngineUpdate) {
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(update.clone()).is_ok());
    }
}

impl ChannelListener for EventRouter {
    /// A channel going idle with something still on screen (stopped during
    /// cooldown) drops that presentation.
    fn on_state_changed(&self, channel: CameraChannel, state: ChannelState) {
        let mut cleared = false;
        self.update(channel, |p| {
            p.state = state;
            if state == ChannelState::Idle && p.event.is_some() {
                p.clear();
                cleared = true;
            }
        });
        self.publish(EngineUpdate::StateChanged { channel, state });
        if cleared {
            self.publish(EngineUpdate::PresentationCleared { channel });
        }
    }

    fn on_detection(&self, event: &DetectionEvent) {
        self.on_detection_event(event);
    }

    fn on_tick_failed(&self, channel: CameraChannel, failure: &TickFailure) {
        let message = match failure {
            TickFailure::Capture(_) => format!("{} camera unavailable", channel.label()),
            TickFailure::Recognition(_) => format!("{} face detection failed", channel.label()),
        };
        self.notify(&message, NotificationLevel::Error);
        self.publish(EngineUpdate::TickFailed {
            channel,
            message: failure.to_string(),
        });
    }

    fn on_cooldown_elapsed(&self, channel: CameraChannel) {
        self.update(channel, ChannelPresentation::clear);
        self.publish(EngineUpdate::PresentationCleared { channel });
    }
}
