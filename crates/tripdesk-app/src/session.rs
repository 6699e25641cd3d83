// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Duration, OffsetDateTime};

pub const SESSION_TTL: Duration = Duration::HOUR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub email: String,
    pub user_id: String,
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Builds a session from a login response. `full_name` is reduced to its
    /// first word for greeting purposes.
    pub fn start(
        token: impl Into<String>,
        full_name: &str,
        email: impl Into<String>,
        user_id: impl Into<String>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            token: token.into(),
            username: full_name
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_owned(),
            email: email.into(),
            user_id: user_id.into(),
            expires_at: now + SESSION_TTL,
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Owner of the signed-in session. Passed explicitly to whatever needs the
/// token instead of living in process-global storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.current
            .as_ref()
            .map(|session| session.username.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn begin(&mut self, session: Session) {
        self.current = Some(session);
    }

    pub fn clear(&mut self) -> Option<Session> {
        self.current.take()
    }

    /// Clears the session when its lifetime has elapsed. Returns true only on
    /// the call that performed the clear.
    pub fn expire_if_due(&mut self, now: OffsetDateTime) -> bool {
        if self
            .current
            .as_ref()
            .is_some_and(|session| session.is_expired(now))
        {
            self.current = None;
            return true;
        }
        false
    }
}
