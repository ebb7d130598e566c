//! Session lifecycle management
//!
//! `AuthManager` owns the current session and every operation that can
//! change it: startup bootstrap, login, registration, logout, silent
//! refresh, and profile/password updates. It is constructed per run and
//! handed to the commands that need it; nothing reads session state from
//! ambient globals.

use reqwest::Method;
use validator::Validate;

use placetrack_protocol::{
    ChangePasswordRequest, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    ProfileUpdate, ProfileUpdateResponse, RegisterRequest, RegisterResponse, UserAccount,
};

use crate::client::{ApiClient, HttpClient};
use crate::error::{Result, TrackError};
use crate::session::{decode_claims, Session};
use crate::store::{SharedTokenStore, ACCESS_TOKEN, REFRESH_TOKEN};

/// Owner of the current-user state.
#[derive(Debug)]
pub struct AuthManager {
    client: HttpClient,
    store: SharedTokenStore,
    session: Option<Session>,
    ready: bool,
}

impl AuthManager {
    pub fn new(client: HttpClient) -> Self {
        let store = client.store().clone();
        Self {
            client,
            store,
            session: None,
            ready: false,
        }
    }

    /// Whether bootstrap has completed (successfully or not).
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Restore the session from persisted tokens at startup.
    ///
    /// An unexpired access token becomes the session directly; an expired
    /// one gets a single refresh attempt; a missing or undecodable one
    /// leaves the user signed out. Every path marks the manager ready
    /// exactly once, and none of them surfaces an error — startup always
    /// lands in a defined signed-in or signed-out state.
    pub async fn bootstrap(&mut self) {
        self.bootstrap_inner().await;
        self.ready = true;
    }

    async fn bootstrap_inner(&mut self) {
        let access = self.store.lock().unwrap().get(ACCESS_TOKEN);
        let Some(access) = access else {
            return;
        };

        let claims = match decode_claims(&access) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!(error = %err, "stored access token is undecodable, clearing");
                let _ = self.store.lock().unwrap().clear_all();
                return;
            }
        };

        let session = Session::from_claims(claims);
        if !session.is_expired() {
            self.session = Some(session);
            return;
        }

        // Expired at load time: never sign in from stale claims, try one
        // refresh instead. Failure already tore the tokens down.
        if let Err(err) = self.refresh().await {
            tracing::debug!(error = %err, "startup refresh failed, staying signed out");
        }
    }

    /// Exchange credentials for a token pair and a session.
    ///
    /// Stored tokens are only touched on success; a rejected login leaves
    /// any previous session's tokens as they were.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response: LoginResponse = self
            .client
            .request_plain(Method::POST, "/auth/login/", Some(&request))
            .await?;

        self.install_tokens(&response.access, &response.refresh, response.user)
    }

    /// Create an account and sign in with the returned tokens.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<Session> {
        request.validate()?;

        let response: RegisterResponse = self
            .client
            .request_plain(Method::POST, "/auth/register/", Some(request))
            .await?;

        let (pair, user) = response
            .into_parts()
            .ok_or_else(|| TrackError::invalid_response("registration response carried no tokens"))?;

        self.install_tokens(&pair.access, &pair.refresh, user)
    }

    fn install_tokens(
        &mut self,
        access: &str,
        refresh: &str,
        profile: Option<UserAccount>,
    ) -> Result<Session> {
        let claims = decode_claims(access)?;

        {
            let mut store = self.store.lock().unwrap();
            store.set(ACCESS_TOKEN, access)?;
            store.set(REFRESH_TOKEN, refresh)?;
        }

        let session = Session::with_profile(claims, profile);
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Tear the session down.
    ///
    /// The server-side refresh revocation is best effort: a failure is
    /// logged and ignored, and both persisted tokens plus the in-memory
    /// session are cleared unconditionally.
    pub async fn logout(&mut self) -> Result<()> {
        let refresh = self.store.lock().unwrap().get(REFRESH_TOKEN);
        if let Some(refresh_token) = refresh {
            let request = LogoutRequest { refresh_token };
            if let Err(err) = self
                .client
                .execute(Method::POST, "/auth/logout/", Some(&request))
                .await
            {
                tracing::warn!(error = %err, "server-side logout failed");
            }
        }

        self.store.lock().unwrap().clear_all()?;
        self.session = None;
        Ok(())
    }

    /// Mint a fresh access token and rebuild the session from its claims.
    /// The refresh token itself is never replaced here.
    pub async fn refresh(&mut self) -> Result<Session> {
        match self.client.refresh_access_token().await {
            Ok(access) => {
                let claims = decode_claims(&access)?;
                let profile = self.session.take().and_then(|s| s.profile().cloned());
                let session = Session::with_profile(claims, profile);
                self.session = Some(session.clone());
                Ok(session)
            }
            Err(err) => {
                self.session = None;
                Err(err)
            }
        }
    }

    /// Fetch the profile record and merge it into the session.
    pub async fn profile(&mut self) -> Result<UserAccount> {
        let user: UserAccount = self
            .client
            .request(Method::GET, "/auth/profile/", None::<&()>)
            .await?;

        if let Some(session) = &mut self.session {
            session.merge_profile(user.clone());
        }
        Ok(user)
    }

    /// Update profile fields; the response's record replaces the cached
    /// profile. Backend field errors surface verbatim in the error message.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<UserAccount> {
        update.validate()?;

        let response: ProfileUpdateResponse = self
            .client
            .request(Method::PUT, "/auth/profile/update/", Some(update))
            .await?;

        if let Some(session) = &mut self.session {
            session.merge_profile(response.user.clone());
        }
        Ok(response.user)
    }

    pub async fn change_password(
        &mut self,
        old_password: &str,
        new_password: &str,
        new_password2: &str,
    ) -> Result<String> {
        let request = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
            new_password2: new_password2.to_string(),
        };
        request.validate()?;

        let response: MessageResponse = self
            .client
            .request(Method::POST, "/auth/change-password/", Some(&request))
            .await?;
        Ok(response.message)
    }

    // Role flags delegate to the session and are computed per call; a
    // signed-out manager reports every flag false.

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    pub fn is_student(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_student)
    }

    pub fn is_company_rep(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_company_rep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::test_tokens;
    use crate::store::TokenStore;

    fn manager_with_store(dir: &tempfile::TempDir) -> AuthManager {
        let store = TokenStore::open(dir.path().join("tokens.json"))
            .unwrap()
            .into_shared();
        let config = Config {
            // Nothing listens here; tests that reach the network expect
            // the calls to fail fast.
            base_url: "http://127.0.0.1:1/api".to_string(),
            timeout: 2,
            token_path: dir.path().join("tokens.json"),
            ..Default::default()
        };
        let client = HttpClient::new(config, store).unwrap();
        AuthManager::new(client)
    }

    #[tokio::test]
    async fn bootstrap_without_tokens_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = manager_with_store(&dir);
        assert!(!auth.is_ready());

        auth.bootstrap().await;

        assert!(auth.is_ready());
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn bootstrap_with_valid_token_restores_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = manager_with_store(&dir);

        let far_future = 4_102_444_800; // 2100-01-01
        let token = test_tokens::token_with_role("ADMIN", far_future);
        auth.store.lock().unwrap().set(ACCESS_TOKEN, &token).unwrap();

        auth.bootstrap().await;

        assert!(auth.is_ready());
        let session = auth.session().expect("session restored");
        assert!(session.is_admin());
        assert_eq!(session.username(), "asha.v");
    }

    #[tokio::test]
    async fn bootstrap_never_signs_in_from_expired_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = manager_with_store(&dir);

        // Expired access token and no refresh token: the refresh attempt
        // fails before touching the network and tears both entries down.
        let token = test_tokens::token_with_role("STUDENT", 1_000_000);
        auth.store.lock().unwrap().set(ACCESS_TOKEN, &token).unwrap();

        auth.bootstrap().await;

        assert!(auth.is_ready());
        assert!(auth.session().is_none());
        assert!(auth.store.lock().unwrap().get(ACCESS_TOKEN).is_none());
    }

    #[tokio::test]
    async fn bootstrap_clears_undecodable_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = manager_with_store(&dir);

        auth.store
            .lock()
            .unwrap()
            .set(ACCESS_TOKEN, "not-a-token")
            .unwrap();
        auth.store.lock().unwrap().set(REFRESH_TOKEN, "r").unwrap();

        auth.bootstrap().await;

        assert!(auth.session().is_none());
        assert!(auth.store.lock().unwrap().get(ACCESS_TOKEN).is_none());
        assert!(auth.store.lock().unwrap().get(REFRESH_TOKEN).is_none());
    }

    #[tokio::test]
    async fn logout_clears_state_even_when_revocation_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = manager_with_store(&dir);

        let token = test_tokens::token_with_role("STUDENT", 4_102_444_800);
        auth.store.lock().unwrap().set(ACCESS_TOKEN, &token).unwrap();
        auth.store
            .lock()
            .unwrap()
            .set(REFRESH_TOKEN, "refresh-value")
            .unwrap();
        auth.bootstrap().await;
        assert!(auth.is_authenticated());

        // The revocation call cannot reach a server; logout must still
        // clear everything.
        auth.logout().await.unwrap();

        assert!(auth.session().is_none());
        assert!(auth.store.lock().unwrap().get(ACCESS_TOKEN).is_none());
        assert!(auth.store.lock().unwrap().get(REFRESH_TOKEN).is_none());
    }

    #[tokio::test]
    async fn role_flags_are_false_when_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let auth = manager_with_store(&dir);
        assert!(!auth.is_admin());
        assert!(!auth.is_student());
        assert!(!auth.is_company_rep());
    }
}
