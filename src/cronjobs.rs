use crate::database::db::DbPool;
use crate::database::schema::session;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::time::Duration;
use tracing::{info, warn};

/// starts a tokio task that deletes all the expired user sessions every interval
pub fn start_clear_sessions_cronjob(db_conn_pool: DbPool, interval: Duration) {
    info!("[CRON] clearing expired sessions every {:?}", interval);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);

        loop {
            interval.tick().await;

            let conn = match db_conn_pool.get().await {
                Ok(conn) => conn,
                Err(error) => {
                    warn!("[CRON] failed to get db connection: {}", error);
                    continue;
                }
            };

            let mut conn = conn;

            let deleted = diesel::delete(session::table)
                .filter(session::expires_at.lt(Utc::now()))
                .execute(&mut conn)
                .await;

            match deleted {
                Ok(count) if count > 0 => {
                    info!("[CRON] deleted {} expired sessions", count)
                }
                Ok(_) => {}
                Err(error) => warn!("[CRON] failed to delete expired sessions: {}", error),
            }
        }
    });
}
