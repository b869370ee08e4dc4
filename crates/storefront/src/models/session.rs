//! Session-related types.
//!
//! Types stored in the session for cart ownership and authentication state.

use serde::{Deserialize, Serialize};

use quickbite_core::UserId;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// external identity provider writes it at login; checkout and the order
/// views read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: String,
}

/// Session keys for cart and authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart cache key owned by this session.
    pub const CART_KEY: &str = "cart_key";
}
