use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RoomTokenRequest {
    #[validate(length(max = 128))]
    pub identity: Option<String>,
    #[validate(length(max = 256))]
    pub room: Option<String>,
    /// Display name; defaults to the identity.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomTokenResponse {
    pub token: String,
    pub url: String,
}
