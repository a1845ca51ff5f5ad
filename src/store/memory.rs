//! In-memory reference backend
//!
//! Defines the exact semantics persistent adapters must replicate. One
//! coarse lock serializes every operation so the uniqueness checks and the
//! writes they guard are atomic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use super::{
    AuthBackend, LoginId, LoginProvider, RememberMeParams, SessionId, StoreResult, User, UserId,
    UserLogin, UserLoginRememberMe, UserLoginSession, LOGIN_PROVIDER_DEFAULT_NAME,
};
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::session::SESSION_EXPIRE_MINUTES;

pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    clock: Arc<dyn Clock>,
}

struct MemoryState {
    users: HashMap<UserId, User>,
    logins: HashMap<LoginId, UserLogin>,
    sessions: HashMap<SessionId, UserLoginSession>,
    remember_mes: HashMap<String, UserLoginRememberMe>,
    providers: Vec<LoginProvider>,
    next_user_id: u64,
    next_login_id: u64,
}

impl MemoryState {
    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.primary_email.eq_ignore_ascii_case(email))
    }

    fn user_by_verify_hash(&self, hash: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.email_verify_hash.as_deref() == Some(hash))
    }

    fn provider_id(&self, name: &str) -> Option<u64> {
        self.providers
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.provider_id)
    }

    fn login_for(&self, user_id: UserId, provider_id: u64) -> Option<&UserLogin> {
        self.logins
            .values()
            .find(|l| l.user_id == user_id && l.provider_id == provider_id)
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                users: HashMap::new(),
                logins: HashMap::new(),
                sessions: HashMap::new(),
                remember_mes: HashMap::new(),
                providers: vec![LoginProvider {
                    provider_id: 1,
                    name: LOGIN_PROVIDER_DEFAULT_NAME.to_owned(),
                }],
                next_user_id: 1,
                next_login_id: 1,
            }),
            clock,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthBackend for MemoryBackend {
    fn get_user_login(&self, email: &str, provider_name: &str) -> StoreResult<UserLogin> {
        let st = self.state.lock().unwrap();
        let user = st.user_by_email(email).ok_or(StoreError::UserNotFound)?;
        let provider_id = st
            .provider_id(provider_name)
            .ok_or(StoreError::LoginNotFound)?;
        st.login_for(user.user_id, provider_id)
            .cloned()
            .ok_or(StoreError::LoginNotFound)
    }

    fn new_login_session(
        &self,
        login_id: LoginId,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        remember_me: Option<&RememberMeParams>,
    ) -> StoreResult<(UserLoginSession, Option<UserLoginRememberMe>)> {
        let mut st = self.state.lock().unwrap();
        let user_id = st
            .logins
            .get(&login_id)
            .ok_or(StoreError::LoginNotFound)?
            .user_id;

        let remember = match remember_me {
            None => None,
            Some(params) => {
                if let Some(existing) = st.remember_mes.get(&params.selector) {
                    if existing.login_id != login_id {
                        return Err(StoreError::RememberMeSelectorExists);
                    }
                }
                let record = UserLoginRememberMe {
                    selector: params.selector.clone(),
                    login_id,
                    token_hash: params.token_hash.clone(),
                    renews_at: params.renews_at,
                    expires_at: params.expires_at,
                };
                st.remember_mes
                    .insert(record.selector.clone(), record.clone());
                Some(record)
            }
        };

        let session = UserLoginSession {
            session_id: session_id.clone(),
            login_id,
            user_id,
            renews_at,
            expires_at,
            is_half_auth: false,
        };
        st.sessions.insert(session_id.clone(), session.clone());
        Ok((session, remember))
    }

    fn get_session(&self, session_id: &SessionId) -> StoreResult<UserLoginSession> {
        self.state
            .lock()
            .unwrap()
            .sessions
            .get(session_id)
            .cloned()
            .ok_or(StoreError::SessionNotFound)
    }

    fn renew_session(
        &self,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginSession> {
        let now = self.clock.now_utc();
        let mut st = self.state.lock().unwrap();
        let session = st
            .sessions
            .get_mut(session_id)
            .ok_or(StoreError::SessionNotFound)?;
        if session.expires_at < now {
            session.expires_at = now + Duration::minutes(SESSION_EXPIRE_MINUTES);
        }
        session.renews_at = renews_at;
        Ok(session.clone())
    }

    fn get_remember_me(&self, selector: &str) -> StoreResult<UserLoginRememberMe> {
        self.state
            .lock()
            .unwrap()
            .remember_mes
            .get(selector)
            .cloned()
            .ok_or(StoreError::RememberMeNotFound)
    }

    fn renew_remember_me(
        &self,
        selector: &str,
        renews_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginRememberMe> {
        let now = self.clock.now_utc();
        let mut st = self.state.lock().unwrap();
        let record = st
            .remember_mes
            .get_mut(selector)
            .ok_or(StoreError::RememberMeNotFound)?;
        if record.expires_at <= now {
            return Err(StoreError::RememberMeExpired);
        }
        if renews_at < now || renews_at > record.expires_at {
            return Err(StoreError::InvalidRenewsAtTime);
        }
        record.renews_at = renews_at;
        Ok(record.clone())
    }

    fn add_user(
        &self,
        email: &str,
        email_verify_hash: &str,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginSession> {
        let mut st = self.state.lock().unwrap();
        if st.user_by_email(email).is_some() {
            return Err(StoreError::UserAlreadyExists);
        }
        if st.user_by_verify_hash(email_verify_hash).is_some() {
            return Err(StoreError::EmailVerifyCodeExists);
        }
        let provider_id = st
            .provider_id(LOGIN_PROVIDER_DEFAULT_NAME)
            .ok_or(StoreError::LoginNotFound)?;

        let user_id = UserId(st.next_user_id);
        st.next_user_id += 1;
        let login_id = LoginId(st.next_login_id);
        st.next_login_id += 1;

        st.users.insert(
            user_id,
            User {
                user_id,
                primary_email: email.to_owned(),
                email_verify_hash: Some(email_verify_hash.to_owned()),
                is_email_verified: false,
                full_name: None,
                organization: None,
                picture_path: None,
            },
        );
        st.logins.insert(
            login_id,
            UserLogin {
                login_id,
                user_id,
                provider_id,
                provider_key: String::new(),
            },
        );

        let session = UserLoginSession {
            session_id: session_id.clone(),
            login_id,
            user_id,
            renews_at,
            expires_at,
            is_half_auth: true,
        };
        st.sessions.insert(session_id.clone(), session.clone());
        Ok(session)
    }

    fn verify_email(
        &self,
        email_verify_hash: &str,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<(UserLoginSession, String)> {
        let mut st = self.state.lock().unwrap();
        let user = st
            .user_by_verify_hash(email_verify_hash)
            .ok_or(StoreError::InvalidEmailVerifyCode)?;
        let user_id = user.user_id;
        let email = user.primary_email.clone();
        let provider_id = st
            .provider_id(LOGIN_PROVIDER_DEFAULT_NAME)
            .ok_or(StoreError::LoginNotFound)?;
        let login_id = st
            .login_for(user_id, provider_id)
            .map(|l| l.login_id)
            .ok_or(StoreError::LoginNotFound)?;

        if let Some(existing) = st.sessions.get(session_id) {
            if existing.login_id != login_id || existing.user_id != user_id {
                return Err(StoreError::InvalidSessionId);
            }
        }

        let session = UserLoginSession {
            session_id: session_id.clone(),
            login_id,
            user_id,
            renews_at,
            expires_at,
            is_half_auth: true,
        };
        st.sessions.insert(session_id.clone(), session.clone());
        Ok((session, email))
    }

    fn update_user(
        &self,
        user_id: Option<UserId>,
        full_name: &str,
        organization: &str,
        picture_path: &str,
    ) -> StoreResult<()> {
        let Some(user_id) = user_id else {
            return Ok(());
        };
        let mut st = self.state.lock().unwrap();
        if let Some(user) = st.users.get_mut(&user_id) {
            user.full_name = Some(full_name.to_owned());
            user.organization = Some(organization.to_owned());
            user.picture_path = Some(picture_path.to_owned());
        }
        Ok(())
    }

    fn create_profile_and_invalidate_sessions(
        &self,
        login_id: LoginId,
        password_hash: &str,
        full_name: &str,
        organization: &str,
        picture_path: &str,
        session_id: &SessionId,
        expires_at: DateTime<Utc>,
        renews_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginSession> {
        let mut st = self.state.lock().unwrap();
        let user_id = st
            .logins
            .get(&login_id)
            .ok_or(StoreError::LoginNotFound)?
            .user_id;
        if !st.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound);
        }

        if let Some(login) = st.logins.get_mut(&login_id) {
            login.provider_key = password_hash.to_owned();
        }
        if let Some(user) = st.users.get_mut(&user_id) {
            user.email_verify_hash = None;
            user.is_email_verified = true;
            user.full_name = Some(full_name.to_owned());
            user.organization = Some(organization.to_owned());
            user.picture_path = Some(picture_path.to_owned());
        }

        st.sessions
            .retain(|_, s| s.login_id != login_id || s.session_id == *session_id);
        let session = UserLoginSession {
            session_id: session_id.clone(),
            login_id,
            user_id,
            renews_at,
            expires_at,
            is_half_auth: false,
        };
        st.sessions.insert(session_id.clone(), session.clone());
        Ok(session)
    }

    fn invalidate_session(&self, session_id: &SessionId) -> StoreResult<()> {
        self.state.lock().unwrap().sessions.remove(session_id);
        Ok(())
    }

    fn invalidate_remember_me(&self, selector: &str) -> StoreResult<()> {
        self.state.lock().unwrap().remember_mes.remove(selector);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(value: &str) -> SessionId {
        SessionId(value.to_owned())
    }

    fn seed_user(backend: &MemoryBackend, id: u64, email: &str, verify_hash: Option<&str>) {
        backend.state.lock().unwrap().users.insert(
            UserId(id),
            User {
                user_id: UserId(id),
                primary_email: email.to_owned(),
                email_verify_hash: verify_hash.map(ToOwned::to_owned),
                is_email_verified: false,
                full_name: None,
                organization: None,
                picture_path: None,
            },
        );
    }

    fn seed_login(backend: &MemoryBackend, login_id: u64, user_id: u64) {
        backend.state.lock().unwrap().logins.insert(
            LoginId(login_id),
            UserLogin {
                login_id: LoginId(login_id),
                user_id: UserId(user_id),
                provider_id: 1,
                provider_key: String::new(),
            },
        );
    }

    fn seed_remember_me(
        backend: &MemoryBackend,
        selector: &str,
        login_id: u64,
        expires_at: DateTime<Utc>,
    ) {
        backend.state.lock().unwrap().remember_mes.insert(
            selector.to_owned(),
            UserLoginRememberMe {
                selector: selector.to_owned(),
                login_id: LoginId(login_id),
                token_hash: String::new(),
                renews_at: Utc::now(),
                expires_at,
            },
        );
    }

    fn remember_params(selector: &str, token_hash: &str) -> RememberMeParams {
        RememberMeParams {
            selector: selector.to_owned(),
            token_hash: token_hash.to_owned(),
            renews_at: Utc::now() + Duration::hours(1),
            expires_at: Utc::now() + Duration::days(30),
        }
    }

    #[test]
    fn get_user_login_requires_user_then_login() {
        let backend = MemoryBackend::new();
        assert_eq!(
            backend.get_user_login("email", LOGIN_PROVIDER_DEFAULT_NAME),
            Err(StoreError::UserNotFound)
        );

        seed_user(&backend, 1, "email", None);
        assert_eq!(
            backend.get_user_login("email", LOGIN_PROVIDER_DEFAULT_NAME),
            Err(StoreError::LoginNotFound)
        );

        seed_login(&backend, 1, 1);
        let login = backend
            .get_user_login("email", LOGIN_PROVIDER_DEFAULT_NAME)
            .unwrap();
        assert_eq!(login.login_id, LoginId(1));
        assert_eq!(login.user_id, UserId(1));
    }

    #[test]
    fn get_user_login_is_case_insensitive() {
        let backend = MemoryBackend::new();
        seed_user(&backend, 1, "Email@Example.Com", None);
        seed_login(&backend, 1, 1);
        assert!(backend
            .get_user_login("email@example.com", LOGIN_PROVIDER_DEFAULT_NAME)
            .is_ok());
    }

    #[test]
    fn new_login_session_requires_login() {
        let backend = MemoryBackend::new();
        let err = backend.new_login_session(
            LoginId(1),
            &sid("sessionId"),
            Utc::now() + Duration::minutes(5),
            Utc::now() + Duration::hours(1),
            None,
        );
        assert_eq!(err, Err(StoreError::LoginNotFound));
    }

    #[test]
    fn new_login_session_creates_full_auth_session() {
        let backend = MemoryBackend::new();
        seed_user(&backend, 1, "email", None);
        seed_login(&backend, 1, 1);
        let (session, remember) = backend
            .new_login_session(
                LoginId(1),
                &sid("sessionId"),
                Utc::now() + Duration::minutes(5),
                Utc::now() + Duration::hours(1),
                None,
            )
            .unwrap();
        assert_eq!(session.session_id, sid("sessionId"));
        assert_eq!(session.login_id, LoginId(1));
        assert_eq!(session.user_id, UserId(1));
        assert!(!session.is_half_auth);
        assert!(remember.is_none());
    }

    #[test]
    fn new_login_session_refreshes_own_selector() {
        let backend = MemoryBackend::new();
        seed_user(&backend, 1, "email", None);
        seed_login(&backend, 1, 1);
        seed_remember_me(&backend, "selector", 1, Utc::now() + Duration::days(1));

        let (_, remember) = backend
            .new_login_session(
                LoginId(1),
                &sid("sessionId"),
                Utc::now() + Duration::minutes(5),
                Utc::now() + Duration::hours(1),
                Some(&remember_params("selector", "hash")),
            )
            .unwrap();
        let remember = remember.unwrap();
        assert_eq!(remember.selector, "selector");
        assert_eq!(remember.login_id, LoginId(1));
        assert_eq!(remember.token_hash, "hash");
    }

    #[test]
    fn new_login_session_rejects_foreign_selector() {
        let backend = MemoryBackend::new();
        seed_user(&backend, 1, "email", None);
        seed_login(&backend, 1, 1);
        seed_remember_me(&backend, "otherselector", 2, Utc::now() + Duration::days(1));

        let err = backend.new_login_session(
            LoginId(1),
            &sid("sessionId"),
            Utc::now() + Duration::minutes(5),
            Utc::now() + Duration::hours(1),
            Some(&remember_params("otherselector", "hash")),
        );
        assert_eq!(err, Err(StoreError::RememberMeSelectorExists));
    }

    #[test]
    fn get_session_roundtrip() {
        let backend = MemoryBackend::new();
        assert_eq!(
            backend.get_session(&sid("sessionId")),
            Err(StoreError::SessionNotFound)
        );

        seed_user(&backend, 1, "email", None);
        seed_login(&backend, 1, 1);
        backend
            .new_login_session(
                LoginId(1),
                &sid("sessionId"),
                Utc::now() + Duration::minutes(5),
                Utc::now() + Duration::hours(1),
                None,
            )
            .unwrap();
        assert_eq!(
            backend.get_session(&sid("sessionId")).unwrap().session_id,
            sid("sessionId")
        );
    }

    #[test]
    fn renew_session_updates_soft_deadline() {
        let backend = MemoryBackend::new();
        let renews = Utc::now() + Duration::minutes(5);
        assert_eq!(
            backend.renew_session(&sid("sessionId"), renews),
            Err(StoreError::SessionNotFound)
        );

        seed_user(&backend, 1, "email", None);
        seed_login(&backend, 1, 1);
        backend
            .new_login_session(
                LoginId(1),
                &sid("sessionId"),
                Utc::now(),
                Utc::now() + Duration::hours(1),
                None,
            )
            .unwrap();
        let session = backend.renew_session(&sid("sessionId"), renews).unwrap();
        assert_eq!(session.renews_at, renews);
    }

    #[test]
    fn renew_session_extends_past_hard_deadline() {
        let backend = MemoryBackend::new();
        seed_user(&backend, 1, "email", None);
        seed_login(&backend, 1, 1);
        backend
            .new_login_session(
                LoginId(1),
                &sid("sessionId"),
                Utc::now() - Duration::hours(2),
                Utc::now() - Duration::hours(1),
                None,
            )
            .unwrap();

        let session = backend
            .renew_session(&sid("sessionId"), Utc::now() + Duration::minutes(5))
            .unwrap();
        assert!(session.expires_at > Utc::now());
        assert!(session.renews_at <= session.expires_at);
    }

    #[test]
    fn get_remember_me_roundtrip() {
        let backend = MemoryBackend::new();
        assert_eq!(
            backend.get_remember_me("selector"),
            Err(StoreError::RememberMeNotFound)
        );
        seed_remember_me(&backend, "selector", 1, Utc::now() + Duration::days(1));
        assert_eq!(
            backend.get_remember_me("selector").unwrap().selector,
            "selector"
        );
    }

    #[test]
    fn renew_remember_me_enforces_bounds() {
        let backend = MemoryBackend::new();
        let renews = Utc::now() + Duration::minutes(5);
        assert_eq!(
            backend.renew_remember_me("selector", renews),
            Err(StoreError::RememberMeNotFound)
        );

        seed_remember_me(&backend, "expired", 1, Utc::now() - Duration::hours(1));
        assert_eq!(
            backend.renew_remember_me("expired", renews),
            Err(StoreError::RememberMeExpired)
        );

        seed_remember_me(&backend, "selector", 1, Utc::now() + Duration::hours(1));
        assert_eq!(
            backend.renew_remember_me("selector", Utc::now() + Duration::hours(2)),
            Err(StoreError::InvalidRenewsAtTime)
        );
        assert_eq!(
            backend.renew_remember_me("selector", Utc::now() - Duration::hours(1)),
            Err(StoreError::InvalidRenewsAtTime)
        );

        let record = backend.renew_remember_me("selector", renews).unwrap();
        assert_eq!(record.renews_at, renews);
    }

    #[test]
    fn add_user_issues_half_auth_session() {
        let backend = MemoryBackend::new();
        let renews = Utc::now();
        let expires = Utc::now() + Duration::hours(1);

        let session = backend
            .add_user("email", "emailVerifyHash", &sid("sessionId"), renews, expires)
            .unwrap();
        assert_eq!(session.user_id, UserId(1));
        assert_eq!(session.login_id, LoginId(1));
        assert_eq!(session.session_id, sid("sessionId"));
        assert_eq!(session.renews_at, renews);
        assert_eq!(session.expires_at, expires);
        assert!(session.is_half_auth);

        assert_eq!(
            backend.add_user("email", "emailVerifyHash", &sid("sessionId"), renews, expires),
            Err(StoreError::UserAlreadyExists)
        );
        assert_eq!(
            backend.add_user("email1", "emailVerifyHash", &sid("sessionId"), renews, expires),
            Err(StoreError::EmailVerifyCodeExists)
        );
    }

    #[test]
    fn verify_email_upserts_half_auth_session() {
        let backend = MemoryBackend::new();
        let renews = Utc::now();
        let expires = Utc::now() + Duration::hours(1);

        assert_eq!(
            backend.verify_email("verifyHash", &sid("sessionId"), renews, expires),
            Err(StoreError::InvalidEmailVerifyCode)
        );

        seed_user(&backend, 1, "email", Some("verifyHash"));
        assert_eq!(
            backend.verify_email("verifyHash", &sid("sessionId"), renews, expires),
            Err(StoreError::LoginNotFound)
        );

        seed_login(&backend, 1, 1);
        let (session, email) = backend
            .verify_email("verifyHash", &sid("sessionId"), renews, expires)
            .unwrap();
        assert_eq!(email, "email");
        assert_eq!(session.session_id, sid("sessionId"));
        assert_eq!(session.renews_at, renews);
        assert!(session.is_half_auth);

        // retry with fresher times updates the same session
        let (session, email) = backend
            .verify_email(
                "verifyHash",
                &sid("sessionId"),
                renews + Duration::minutes(1),
                expires + Duration::minutes(1),
            )
            .unwrap();
        assert_eq!(email, "email");
        assert_eq!(session.renews_at, renews + Duration::minutes(1));
        assert_eq!(session.expires_at, expires + Duration::minutes(1));

        // a session owned by another login cannot be claimed
        backend.state.lock().unwrap().sessions.insert(
            sid("invalidSession"),
            UserLoginSession {
                session_id: sid("invalidSession"),
                login_id: LoginId(2),
                user_id: UserId(2),
                renews_at: renews,
                expires_at: expires,
                is_half_auth: true,
            },
        );
        assert_eq!(
            backend.verify_email("verifyHash", &sid("invalidSession"), renews, expires),
            Err(StoreError::InvalidSessionId)
        );
    }

    #[test]
    fn update_user_tolerates_missing_target() {
        let backend = MemoryBackend::new();
        assert!(backend
            .update_user(None, "fullname", "company", "pictureUrl")
            .is_ok());
        assert!(backend
            .update_user(Some(UserId(42)), "fullname", "company", "pictureUrl")
            .is_ok());
    }

    #[test]
    fn create_profile_checks_login_then_user() {
        let backend = MemoryBackend::new();
        let renews = Utc::now();
        let expires = Utc::now() + Duration::hours(1);

        assert_eq!(
            backend.create_profile_and_invalidate_sessions(
                LoginId(1),
                "passwordHash",
                "fullName",
                "company",
                "pictureUrl",
                &sid("sessionId"),
                expires,
                renews,
            ),
            Err(StoreError::LoginNotFound)
        );

        seed_login(&backend, 1, 1);
        assert_eq!(
            backend.create_profile_and_invalidate_sessions(
                LoginId(1),
                "passwordHash",
                "fullName",
                "company",
                "pictureUrl",
                &sid("sessionId"),
                expires,
                renews,
            ),
            Err(StoreError::UserNotFound)
        );
    }

    #[test]
    fn create_profile_promotes_session_and_drops_others() {
        let backend = MemoryBackend::new();
        let renews = Utc::now();
        let expires = Utc::now() + Duration::hours(1);

        let session = backend
            .add_user("email", "verifyHash", &sid("sessionId"), renews, expires)
            .unwrap();
        backend
            .verify_email("verifyHash", &sid("otherSession"), renews, expires)
            .unwrap();

        let promoted = backend
            .create_profile_and_invalidate_sessions(
                session.login_id,
                "passwordHash",
                "fullName",
                "company",
                "pictureUrl",
                &sid("sessionId"),
                expires,
                renews,
            )
            .unwrap();
        assert_eq!(promoted.session_id, sid("sessionId"));
        assert!(!promoted.is_half_auth);
        assert_eq!(promoted.renews_at, renews);
        assert_eq!(promoted.expires_at, expires);

        // the sibling session is gone, the verify hash cleared, the key set
        assert_eq!(
            backend.get_session(&sid("otherSession")),
            Err(StoreError::SessionNotFound)
        );
        let st = backend.state.lock().unwrap();
        let user = &st.users[&UserId(1)];
        assert_eq!(user.email_verify_hash, None);
        assert!(user.is_email_verified);
        assert_eq!(user.full_name.as_deref(), Some("fullName"));
        assert_eq!(st.logins[&LoginId(1)].provider_key, "passwordHash");
    }

    #[test]
    fn invalidate_is_idempotent() {
        let backend = MemoryBackend::new();
        assert!(backend.invalidate_session(&sid("missing")).is_ok());
        assert!(backend.invalidate_remember_me("missing").is_ok());

        seed_remember_me(&backend, "selector", 1, Utc::now() + Duration::days(1));
        backend.invalidate_remember_me("selector").unwrap();
        assert_eq!(
            backend.get_remember_me("selector"),
            Err(StoreError::RememberMeNotFound)
        );
    }
}
