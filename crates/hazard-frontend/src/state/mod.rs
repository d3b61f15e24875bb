//! # Application State
//!
//! Reactive state for the hazard dashboard. One `AppState` is created at
//! startup, provided through Leptos context, and holds every signal the
//! views reconcile from.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use hazard_domain::{AlertCategory, SensorReading};

use crate::config::Config;
use crate::services::describe::DescriptionProvider;
use crate::store::AlertStore;

/// Idle prompt shown under the category picker.
pub const STATUS_IDLE: &str = "Click on the map to place an alert.";
/// Shown when a map click arrives with no category selected.
pub const STATUS_NEED_CATEGORY: &str = "Select an alert category first.";
/// Shown while the description provider is working.
pub const STATUS_GENERATING: &str = "Generating description...";
/// Shown while the alert is being stored.
pub const STATUS_SAVING: &str = "Saving alert...";

const NOTICE_DISMISS_MS: u32 = 3_000;

/// Global application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub store: AlertStore,
    pub describer: DescriptionProvider,
    pub selected_category: RwSignal<Option<AlertCategory>>,
    pub sensor: RwSignal<Option<SensorReading>>,
    pub status: RwSignal<String>,
    pub busy: RwSignal<bool>,
    pub notices: RwSignal<Vec<Notice>>,
    notice_seq: RwSignal<i64>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = match &config.api_base {
            Some(base) => AlertStore::remote(base.clone()),
            None => AlertStore::local(),
        };
        let describer = DescriptionProvider::from_config(&config);
        Self {
            config,
            store,
            describer,
            selected_category: RwSignal::new(None),
            sensor: RwSignal::new(None),
            status: RwSignal::new(STATUS_IDLE.to_string()),
            busy: RwSignal::new(false),
            notices: RwSignal::new(Vec::new()),
            notice_seq: RwSignal::new(0),
        }
    }

    /// Pushes a transient notice that dismisses itself after a few seconds.
    pub fn push_notice(&self, kind: NoticeKind, message: impl Into<String>) {
        let id = self.notice_seq.get_untracked() + 1;
        self.notice_seq.set(id);
        self.notices.update(|notices| {
            notices.push(Notice {
                id,
                kind,
                message: message.into(),
            });
        });

        let notices = self.notices;
        Timeout::new(NOTICE_DISMISS_MS, move || {
            notices.update(|notices| notices.retain(|notice| notice.id != id));
        })
        .forget();
    }

    pub fn dismiss_notice(&self, id: i64) {
        self.notices
            .update(|notices| notices.retain(|notice| notice.id != id));
    }
}

/// Transient toast message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: i64,
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

pub fn provide_app_state(config: Config) {
    provide_context(AppState::new(config));
}

#[must_use]
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
