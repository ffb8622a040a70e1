use crate::domain::errors::DomainError;
use crate::domain::ports::{AuthService, KeyValueStorage};
use crate::domain::user::{LoginRequest, RegisterRequest, Session, User};

/// Storage entry holding the authenticated session.
pub const SESSION_STORAGE_KEY: &str = "cloudforge-auth";

/// The signed-in customer, persisted the same best-effort way as the cart.
pub struct SessionStore<S> {
    session: Option<Session>,
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn restore(storage: S) -> Self {
        let session = match storage.load(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!("Discarding unreadable session snapshot: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not load session snapshot: {}", e);
                None
            }
        };

        Self { session, storage }
    }

    pub async fn login<A: AuthService>(
        &mut self,
        auth: &A,
        request: &LoginRequest,
    ) -> Result<&Session, DomainError> {
        let session = auth.login(request).await?;
        log::info!("Signed in as {}", session.user.username);
        Ok(self.set(session))
    }

    pub async fn register<A: AuthService>(
        &mut self,
        auth: &A,
        request: &RegisterRequest,
    ) -> Result<&Session, DomainError> {
        let session = auth.register(request).await?;
        log::info!("Registered {}", session.user.username);
        Ok(self.set(session))
    }

    /// Re-reads the user record for the current token. An `Unauthorized`
    /// answer ends the session. The session is left as it was until the
    /// auth service answers, so a dropped refresh changes nothing.
    pub async fn refresh_user<A: AuthService>(&mut self, auth: &A) -> Result<&User, DomainError> {
        let Some(mut session) = self.session.clone() else {
            return Err(DomainError::Unauthorized);
        };

        match auth.current_user().await {
            Ok(user) => {
                session.user = user;
                Ok(&self.set(session).user)
            }
            Err(DomainError::Unauthorized) => {
                self.logout();
                Err(DomainError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    pub fn logout(&mut self) {
        self.session = None;
        if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY) {
            log::warn!("Could not remove session snapshot: {}", e);
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn set(&mut self, session: Session) -> &Session {
        match serde_json::to_string(&session) {
            Ok(raw) => {
                if let Err(e) = self.storage.save(SESSION_STORAGE_KEY, &raw) {
                    log::warn!("Session kept in memory only, persisting failed: {}", e);
                }
            }
            Err(e) => log::warn!("Could not serialize session: {}", e),
        }
        self.session.insert(session)
    }
}
