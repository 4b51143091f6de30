/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users: the lookup shared by every authenticated route
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::{Config, DEFAULT_BODY_LIMIT_BYTES};
use crate::services::gate::PasswordComparison;
use crate::services::users::StaticUserStore;

#[derive(Clone, Debug)]
pub struct AppState {
    pub users: Arc<StaticUserStore>,
    pub password_comparison: PasswordComparison,
    pub body_limit_bytes: usize,
}

impl AppState {
    pub fn new(users: Arc<StaticUserStore>, password_comparison: PasswordComparison) -> Self {
        Self {
            users,
            password_comparison,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            users: Arc::new(config.users.clone()),
            password_comparison: config.password_comparison,
            body_limit_bytes: config.body_limit_bytes,
        }
    }
}
