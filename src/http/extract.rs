//! Extractors whose rejections are `ApiError`s, so every failure before the
//! handler body still answers with `{"error": ...}`.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};

use crate::http::error::ApiError;

/// The `{title}` path parameter.
#[derive(Debug, Clone)]
pub struct Title(pub String);

impl<S> FromRequestParts<S> for Title
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(title) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Title(title))
    }
}

/// The raw request body, buffered up to the configured limit.
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state).await?;
        Ok(RawBody(bytes))
    }
}
