//! # Alert Store
//!
//! Authoritative owner of the active alert set. Local mode keeps the set in
//! memory; remote mode proxies every write to the backend and only applies
//! the local effect after a success response. Either way the snapshot lives
//! in a signal, so the list view and the marker mirror reconcile on every
//! mutation.

use leptos::prelude::*;

use hazard_domain::{ActiveAlerts, Alert, AlertCategory, GeoPoint};

use crate::services::api;

#[derive(Clone, Debug)]
pub enum AlertStore {
    /// Purely in-memory set for backend-less operation.
    Local(RwSignal<ActiveAlerts>),
    /// Thin proxy over the backend alert API with a cached snapshot.
    Remote {
        base: String,
        cache: RwSignal<Vec<Alert>>,
    },
}

impl AlertStore {
    #[must_use]
    pub fn local() -> Self {
        Self::Local(RwSignal::new(ActiveAlerts::new()))
    }

    #[must_use]
    pub fn remote(base: String) -> Self {
        Self::Remote {
            base,
            cache: RwSignal::new(Vec::new()),
        }
    }

    /// Fresh snapshot of the active set: insertion order in local mode,
    /// server order in remote mode. Reactive when read inside a tracking
    /// context.
    #[must_use]
    pub fn list(&self) -> Vec<Alert> {
        match self {
            Self::Local(set) => set.with(ActiveAlerts::snapshot),
            Self::Remote { cache, .. } => cache.get(),
        }
    }

    /// Appends a new alert. The caller guards category selection and has
    /// already obtained a description. Remote failures leave the set
    /// unchanged.
    pub async fn create(
        &self,
        category: AlertCategory,
        point: GeoPoint,
        description: String,
    ) -> Result<Alert, String> {
        match self {
            Self::Local(set) => set
                .try_update(|set| set.create(category, point, description))
                .ok_or_else(|| "alert store is no longer alive".to_string()),
            Self::Remote { base, cache } => {
                let created = api::create_alert(base, category, point, &description).await?;
                // Re-fetch so the snapshot reflects server truth, including
                // anything created out-of-band since the last poll.
                match api::fetch_alerts(base).await {
                    Ok(alerts) => cache.set(alerts),
                    Err(err) => {
                        log::warn!("alert refresh after create failed: {err}");
                        cache.update(|alerts| alerts.push(created.clone()));
                    }
                }
                Ok(created)
            }
        }
    }

    /// Removes the alert with the given id. Returns whether anything was
    /// removed; resolving an unknown id is a non-fatal no-op. Remote mode
    /// only applies the removal after the backend confirms it.
    pub async fn resolve(&self, id: i64) -> Result<bool, String> {
        match self {
            Self::Local(set) => set
                .try_update(|set| set.resolve(id))
                .ok_or_else(|| "alert store is no longer alive".to_string()),
            Self::Remote { base, cache } => {
                api::resolve_alert(base, id).await?;
                let mut removed = false;
                cache.update(|alerts| {
                    let before = alerts.len();
                    alerts.retain(|alert| alert.id != id);
                    removed = alerts.len() != before;
                });
                Ok(removed)
            }
        }
    }

    /// Replaces the cached snapshot with server truth. Local mode has no
    /// out-of-band writers, so this is a no-op there.
    pub async fn refresh(&self) -> Result<(), String> {
        match self {
            Self::Local(_) => Ok(()),
            Self::Remote { base, cache } => {
                let alerts = api::fetch_alerts(base).await?;
                cache.set(alerts);
                Ok(())
            }
        }
    }
}
