use account_core::{AccountError, User};
use actix_session::Session;

const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";

/// The identity carried in the signed session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: String,
    pub username: String,
}

/// The signed-in user, if any. Unreadable session state counts as signed out.
pub fn current_user(session: &Session) -> Option<SessionUser> {
    let read = |key: &str| match session.get::<String>(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, key, "ignoring unreadable session entry");
            None
        }
    };

    Some(SessionUser {
        user_id: read(USER_ID_KEY)?,
        username: read(USERNAME_KEY)?,
    })
}

pub fn sign_in(session: &Session, user: &User) -> Result<(), AccountError> {
    // Fresh session id on privilege change.
    session.renew();
    session
        .insert(USER_ID_KEY, &user.id)
        .and_then(|_| session.insert(USERNAME_KEY, &user.username))
        .map_err(|e| AccountError::server_error(&format!("failed to store session: {e}")))
}

pub fn sign_out(session: &Session) {
    session.purge();
}
