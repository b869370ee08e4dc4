//! Authentication extractor and session identity helpers.
//!
//! The storefront does not run its own login flow. An external identity
//! provider writes a [`CurrentUser`] into the session; the helpers here are
//! that write seam, and [`RequireUser`] is the read side that guards
//! checkout and order routes.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::session::{CurrentUser, keys};

/// Extractor that requires an authenticated user.
///
/// Rejects with `401 Unauthorized` when the session carries no identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn checkout(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Checking out as {}", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("no session".to_string()))?;

        let user: CurrentUser = session
            .get(keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

        // sentry-tower gives each request its own hub, so this scopes to the request
        set_sentry_user(&user.id, Some(&user.email));

        Ok(Self(user))
    }
}

/// Helper to store the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    clear_sentry_user();
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use quickbite_core::UserId;
    use tower_sessions::{MemoryStore, Session};

    use super::*;

    fn test_session() -> Session {
        let store = Arc::new(MemoryStore::default());
        Session::new(None, store, None)
    }

    #[tokio::test]
    async fn test_set_and_clear_current_user() {
        let session = test_session();
        let user = CurrentUser {
            id: UserId::new(7),
            email: "pat@example.com".to_string(),
        };

        set_current_user(&session, &user).await.unwrap();
        let loaded: Option<CurrentUser> = session.get(keys::CURRENT_USER).await.unwrap();
        assert_eq!(loaded, Some(user));

        clear_current_user(&session).await.unwrap();
        let loaded: Option<CurrentUser> = session.get(keys::CURRENT_USER).await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_clear_without_user_is_ok() {
        let session = test_session();
        clear_current_user(&session).await.unwrap();
    }
}
