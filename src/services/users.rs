/*
 * Responsibility
 * - In-memory UserLookup for routes that do not have a real user store
 * - Parsing of the `user:password,...` table from configuration
 */
use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::gate::{GateRequest, User, UserLookup, credentials};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserTableError {
    #[error("user entry {index} has no `:` separator")]
    MissingSeparator { index: usize },
    #[error("user entry {index} has an empty username")]
    EmptyUsername { index: usize },
}

/// Fixed username -> user table. Looks users up by the `username` header.
#[derive(Debug, Clone, Default)]
pub struct StaticUserStore {
    users: HashMap<String, User>,
}

impl StaticUserStore {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|u| (u.username.clone(), u))
            .collect();
        Self { users }
    }

    /// Parse `alice:secret,bob:hunter2`. Blank entries are skipped; the
    /// password is everything after the first `:`.
    pub fn parse(table: &str) -> Result<Self, UserTableError> {
        let mut users = Vec::new();
        for (index, entry) in table.split(',').map(str::trim).enumerate() {
            if entry.is_empty() {
                continue;
            }
            let (username, password) = entry
                .split_once(':')
                .ok_or(UserTableError::MissingSeparator { index })?;
            if username.is_empty() {
                return Err(UserTableError::EmptyUsername { index });
            }
            users.push(User::new(username, password));
        }
        Ok(Self::new(users))
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserLookup for StaticUserStore {
    async fn get_user(&self, req: &GateRequest) -> Option<User> {
        let username = req.header(credentials::USERNAME.as_str())?;
        self.get(username).cloned()
    }
}
