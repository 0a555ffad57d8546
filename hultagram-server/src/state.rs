use hultagram_types::{SearchMode, UserId};

use crate::config::Settings;
use crate::db::Database;
use crate::session::{SessionManager, DEFAULT_SESSION_TTL_DAYS};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session_manager: SessionManager,
    pub search_mode: SearchMode,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let session_manager = SessionManager::new(db.clone(), DEFAULT_SESSION_TTL_DAYS);
        Self {
            db,
            session_manager,
            search_mode: SearchMode::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn from_settings(db: Database, settings: &Settings) -> Self {
        let session_manager = SessionManager::new(db.clone(), settings.session.ttl_days);
        Self {
            db,
            session_manager,
            search_mode: SearchMode::from_case_sensitive(settings.search.case_sensitive),
            bcrypt_cost: settings.security.bcrypt_cost,
        }
    }

    pub fn with_search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = search_mode;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Get authenticated user ID from session token
    pub fn get_authenticated_user_id_from_token(&self, token: &str) -> Option<UserId> {
        self.session_manager.validate_session(token).ok()
    }
}
