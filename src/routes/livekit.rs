use axum::{extract::State, Json};

use crate::dto::livekit_dto::{RoomTokenRequest, RoomTokenResponse};
use crate::error::Result;
use crate::services::token_service::{TokenRequest, VideoGrant};
use crate::utils::validation::{require, validate};
use crate::routes::extract::AppJson;
use crate::AppState;

/// Standalone join token for an arbitrary room, used by clients that manage
/// rooms themselves.
#[utoipa::path(
    post,
    path = "/livekit/token",
    tag = "livekit",
    request_body = RoomTokenRequest,
    responses(
        (status = 200, description = "Signed room token", body = RoomTokenResponse),
        (status = 400, description = "Missing identity or room"),
        (status = 500, description = "Room transport not configured"),
    ),
)]
pub async fn issue_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RoomTokenRequest>,
) -> Result<Json<RoomTokenResponse>> {
    validate(&payload)?;
    let identity = require("identity", payload.identity.as_deref())?;
    let room = require("room", payload.room.as_deref())?;

    let url = state.token_issuer.ws_url()?.to_string();
    let issued = state.token_issuer.issue(&TokenRequest {
        identity: identity.to_string(),
        name: Some(payload.name.clone().unwrap_or_else(|| identity.to_string())),
        grant: VideoGrant::participant(room),
    })?;

    Ok(Json(RoomTokenResponse {
        token: issued.jwt,
        url,
    }))
}
