//! Dual-channel face detection orchestration.
//!
//! Each camera channel (entry, exit) samples frames on its own worker
//! thread, sends them to a recognition service, and reports at most one
//! [`DetectionEvent`](detection::domain::detection_event::DetectionEvent)
//! per visitor. The [`OrchestrationEngine`](engine::orchestration_engine::OrchestrationEngine)
//! routes those events to notifications, recommendations and registration.

pub mod capture {
    pub mod domain {
        pub mod frame_sampler;
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod channel {
    pub mod domain {
        pub mod channel_listener;
        pub mod channel_state;
        pub mod channel_state_machine;
        pub mod tick_failure;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detection_classifier;
        pub mod detection_event;
        pub mod duplicate_suppressor;
        pub mod recognition_outcome;
    }
}

pub mod engine {
    pub mod event_router;
    pub mod orchestration_engine;
}

pub mod notification {
    pub mod domain {
        pub mod notification_sink;
    }
    pub mod infrastructure;
}

pub mod recognition {
    pub mod domain {
        pub mod raw_recognition;
        pub mod recognition_client;
        pub mod recognition_service;
    }
    pub mod infrastructure;
}

pub mod recommendation {
    pub mod domain {
        pub mod recommendation_service;
        pub mod recommended_car;
    }
    pub mod infrastructure;
}

pub mod registration {
    pub mod domain {
        pub mod registration_handoff;
        pub mod registration_offer;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod camera_channel;
    pub mod captured_image;
    pub mod constants;
    pub mod engine_config;
    pub mod face_box;
    pub mod http_service_config;
}
