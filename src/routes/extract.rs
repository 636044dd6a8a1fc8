//! Extractors whose rejections use the crate error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::Error;

/// `axum::Json` that rejects malformed bodies as `validation_error`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct AppQuery<T>(pub T);
