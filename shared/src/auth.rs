use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::error::{Error, ErrorCode, Result};
use crate::models::{User, UserId};
use crate::notify::{Notification, NotificationSink};
use crate::storage::{self, Storage, SESSION_KEY};
use crate::validation::validate_credentials;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub password: String,
}

/// Flat list of known users. Credentials are compared verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directory {
    users: Vec<UserRecord>,
}

impl Directory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn from_json(blob: &str) -> Result<Self> {
        serde_json::from_str(blob)
            .map_err(|e| Error::with_details(ErrorCode::CorruptData, "Malformed user directory", e.to_string()))
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        self.users.iter()
            .find(|u| u.username == username && u.password == password)
            .map(|u| User { id: u.id, username: u.username.clone() })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// The signed-in user, remembered across runs.
pub struct Session<S: Storage> {
    storage: S,
    sink: Box<dyn NotificationSink>,
    current: Option<User>,
}

impl<S: Storage> Session<S> {
    pub fn load(storage: S, sink: Box<dyn NotificationSink>) -> Result<Self> {
        let current = storage::load_json::<User>(&storage, SESSION_KEY)?;
        Ok(Self { storage, sink, current })
    }

    pub fn login(&mut self, directory: &Directory, username: &str, password: &str) -> Result<User> {
        validate_credentials(username, password)?;

        let Some(user) = directory.authenticate(username, password) else {
            warn!("Rejected login for {username:?}");
            self.sink.notify(Notification::error("Invalid username or password"));
            return Err(Error::new(ErrorCode::Unauthorized, "Invalid credentials"));
        };

        if let Err(e) = storage::save_json(&mut self.storage, SESSION_KEY, &user) {
            self.sink.notify(Notification::error("An error occurred during login"));
            return Err(e);
        }

        info!("User {} signed in", user.id);
        self.sink.notify(Notification::success(format!("Welcome back, {}!", user.username)));
        self.current = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            self.sink.notify(Notification::error("An error occurred during logout"));
            return Err(e);
        }

        if let Some(user) = self.current.take() {
            info!("User {} signed out", user.id);
        }
        self.sink.notify(Notification::success("Logged out successfully"));
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn require_user(&self) -> Result<&User> {
        self.current.as_ref()
            .ok_or_else(|| Error::new(ErrorCode::Unauthorized, "Not logged in"))
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
