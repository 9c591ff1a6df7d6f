//! Custom Axum extractors.
//!
//! Handlers retrieve the identity records attached by the pipeline through
//! these extractors. Both are infallible: when identity parsing is
//! disabled (or the pipeline is not installed) they yield `None`.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::identity::{StaffInfo, UserInfo};

/// The caller's user identity, if identity parsing produced one.
///
/// ```rust
/// use nexus_middleware::CurrentUser;
///
/// async fn whoami(CurrentUser(user): CurrentUser) -> String {
///     match user.and_then(|u| u.user_id) {
///         Some(id) => format!("hello, {id}"),
///         None => "hello, anonymous".to_string(),
///     }
/// }
/// # let _ = whoami;
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserInfo>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<UserInfo>().cloned()))
    }
}

/// The caller's staff identity, if identity parsing produced one.
#[derive(Debug, Clone)]
pub struct CurrentStaff(pub Option<StaffInfo>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentStaff {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<StaffInfo>().cloned()))
    }
}
