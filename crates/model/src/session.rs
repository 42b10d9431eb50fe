//! The module contains the `Session` identity handed over by the
//! authentication collaborator.

use uuid::Uuid;

/// The signed-in user's identity, as supplied by the hosted backend's
/// auth service. This crate only consumes it: the finance container
/// treats "the session changed" as its load trigger, and the store client
/// scopes every call with `user_id` and authenticates with
/// `access_token`.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: Uuid, email: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: None,
            access_token: access_token.into(),
        }
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}
