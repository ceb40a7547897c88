//! Notification route handlers.

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
};
use marche_core::{Notification, NotificationDraft, NotificationId};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::CurrentShopper;

/// Live notifications, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationsView {
    pub items: Vec<Notification>,
}

/// Number of notifications removed by a clear.
#[derive(Debug, Clone, Serialize)]
pub struct ClearedView {
    pub cleared: usize,
}

/// List live notifications.
#[instrument(skip_all)]
pub async fn index(CurrentShopper(shopper): CurrentShopper) -> Json<NotificationsView> {
    Json(NotificationsView {
        items: shopper.notifications().items(),
    })
}

/// Push a notification. It expires after its duration.
///
/// # Errors
///
/// Returns a JSON rejection for a malformed body.
#[instrument(skip_all)]
pub async fn create(
    CurrentShopper(shopper): CurrentShopper,
    payload: std::result::Result<Json<NotificationDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Notification>)> {
    let Json(draft) = payload?;
    let notification = shopper.notifications().add(draft);
    Ok((StatusCode::CREATED, Json(notification)))
}

/// Dismiss one notification before it expires.
///
/// # Errors
///
/// Returns `NotFound` if the notification already expired or never existed.
#[instrument(skip_all, fields(notification_id = id))]
pub async fn dismiss(
    CurrentShopper(shopper): CurrentShopper,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    if shopper.notifications().remove(NotificationId::new(id)) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("notification {id}")))
    }
}

/// Dismiss every notification.
#[instrument(skip_all)]
pub async fn clear(CurrentShopper(shopper): CurrentShopper) -> Json<ClearedView> {
    Json(ClearedView {
        cleared: shopper.notifications().clear(),
    })
}
