use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::auth::Subject;
use crate::error::ApiError;

/// Verified caller of a mutating route.
///
/// Put this first in a handler's argument list: extractors run in order, so an
/// unauthenticated request is rejected before its path or body is looked at and
/// before anything reaches the store.
#[derive(Clone, Debug)]
pub struct AuthSubject(pub Subject);

#[async_trait]
impl FromRequestParts<AppState> for AuthSubject {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match state.auth.authorize(&parts.headers).await {
            Ok(subject) => Ok(AuthSubject(subject)),
            Err(err) => {
                tracing::warn!("Rejected {} {}: {}", parts.method, parts.uri.path(), err);
                Err(err.into())
            }
        }
    }
}
