//! Shopper resolution for route handlers.
//!
//! The shopper id comes from the `x-shopper-id` header when present (API
//! clients that manage their own identity), otherwise from the session. A
//! visitor without either gets a fresh id stored in their session.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use marche_core::ShopperId;
use tower_sessions::Session;
use tracing::Span;

use super::session::keys;
use crate::error::AppError;
use crate::shopper::Shopper;
use crate::state::AppState;

/// Header carrying an explicit shopper id.
pub const SHOPPER_ID_HEADER: &str = "x-shopper-id";

/// Extractor for the current visitor's stores.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentShopper(shopper): CurrentShopper) -> String {
///     shopper.cart().read(|cart| cart.total_items()).to_string()
/// }
/// ```
pub struct CurrentShopper(pub Arc<Shopper>);

impl FromRequestParts<AppState> for CurrentShopper {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = match parts.headers.get(SHOPPER_ID_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|raw| raw.parse::<ShopperId>().ok())
                .ok_or_else(|| AppError::BadRequest(format!("invalid {SHOPPER_ID_HEADER} header")))?,
            None => session_shopper_id(parts).await?,
        };

        Span::current().record("shopper_id", tracing::field::display(id));
        Ok(Self(state.shoppers().get(id)))
    }
}

/// Read the shopper id from the session, assigning one on first visit.
async fn session_shopper_id(parts: &Parts) -> Result<ShopperId, AppError> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

    if let Some(id) = session.get::<ShopperId>(keys::SHOPPER_ID).await? {
        return Ok(id);
    }

    let id = ShopperId::generate();
    session.insert(keys::SHOPPER_ID, id).await?;
    tracing::info!(shopper_id = %id, "New shopper session");
    Ok(id)
}
