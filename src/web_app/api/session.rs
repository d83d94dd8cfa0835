// web_app/api/session.rs - Login, registration and session lookup
//
// The backend keeps the session server-side (cookie based). These calls update
// the caller's `SessionContext` in place so the UI can show who is signed in.

use serde::Deserialize;

use super::client::{checked, decode, ApiClient, SessionContext};
use crate::web_app::error::ApiError;
use crate::web_app::forms::AuthMode;
use crate::web_app::model::{Credentials, SessionInfo};

/// Body returned by the login and register endpoints
#[derive(Clone, Debug, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ApiClient {
    /// `GET /api/session/` - refresh identity and pick up the CSRF cookie
    pub async fn fetch_session(&self, session: &mut SessionContext) -> Result<SessionInfo, ApiError> {
        let request = self.credentialed(reqwest::Method::GET, "/api/session/");
        let response = checked(request.send().await?).await?;

        session.capture_csrf(response.headers());
        session.refresh_csrf_from_browser();

        let info: SessionInfo = decode(response).await?;
        if info.isauthenticated {
            // older backends do not echo the username; keep the one we know
            let username = info.username.clone().or_else(|| session.username.clone());
            session.authenticated = true;
            session.username = username;
        } else {
            session.sign_out();
        }
        tracing::info!(
            "Session refreshed: authenticated={} user={:?}",
            session.authenticated,
            session.username
        );
        Ok(info)
    }

    /// `POST /api/login/`
    pub async fn login(&self, session: &mut SessionContext, credentials: &Credentials) -> Result<(), ApiError> {
        self.authenticate(session, credentials, "/api/login/").await
    }

    /// `POST /api/register/`
    pub async fn register(&self, session: &mut SessionContext, credentials: &Credentials) -> Result<(), ApiError> {
        self.authenticate(session, credentials, "/api/register/").await
    }

    /// Login or register depending on the widget mode
    pub async fn submit_credentials(
        &self,
        session: &mut SessionContext,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<(), ApiError> {
        match mode {
            AuthMode::Login => self.login(session, credentials).await,
            AuthMode::Register => self.register(session, credentials).await,
        }
    }

    /// `POST /api/logout/`
    pub async fn logout(&self, session: &mut SessionContext) -> Result<(), ApiError> {
        let request = self.mutation(reqwest::Method::POST, "/api/logout/", session);
        let response = checked(request.send().await?).await?;
        session.capture_csrf(response.headers());
        session.sign_out();
        tracing::info!("Logged out");
        Ok(())
    }

    async fn authenticate(
        &self,
        session: &mut SessionContext,
        credentials: &Credentials,
        path: &str,
    ) -> Result<(), ApiError> {
        tracing::info!("Authenticating '{}' via {}", credentials.username, path);
        let request = self
            .mutation(reqwest::Method::POST, path, session)
            .json(credentials);
        let response = checked(request.send().await?).await?;

        // login rotates the CSRF token
        session.capture_csrf(response.headers());
        session.refresh_csrf_from_browser();

        let body = response.text().await?;
        let reply: AuthResponse = serde_json::from_str(&body).unwrap_or_default();
        if let Some(detail) = reply.detail.as_deref() {
            tracing::debug!("Backend says: {}", detail);
        }
        session.sign_in(reply.username.unwrap_or_else(|| credentials.username.clone()));
        Ok(())
    }
}
