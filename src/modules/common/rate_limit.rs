use crate::modules::common::responses::SimpleError;
use axum::{extract::State, middleware::Next, response::Response};
use axum_client_ip::SecureClientIp;
use http::StatusCode;
use std::{
    collections::HashMap,
    net::IpAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

struct Window {
    started_at: Instant,
    hits: u32,
}

/// Fixed window request counter keyed by client IP address.
///
/// every limiter instance keeps its own counters, so the login limiter,
/// the lead form limiter and the global limiter never share state.
#[derive(Clone)]
pub struct RateLimiter {
    max_hits: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    pub fn new(max_hits: u32, window: Duration) -> RateLimiter {
        RateLimiter {
            max_hits,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// login attempts: 5 per 15 minutes per client
    pub fn for_login() -> RateLimiter {
        RateLimiter::new(5, Duration::from_secs(15 * 60))
    }

    /// lead form submissions: 10 per hour per client
    pub fn for_leads() -> RateLimiter {
        RateLimiter::new(10, Duration::from_secs(60 * 60))
    }

    /// every other route: 100 per minute per client
    pub fn global() -> RateLimiter {
        RateLimiter::new(100, Duration::from_secs(60))
    }

    /// registers a hit for the client, `Err` contains the seconds until
    /// the current window expires
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), u64> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // counters from expired windows are useless, drop them so the
        // map does not grow unbounded with one off clients
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = windows.entry(ip).or_insert(Window {
            started_at: now,
            hits: 0,
        });

        if window.hits >= self.max_hits {
            let elapsed = now.duration_since(window.started_at);
            return Err(self.window.saturating_sub(elapsed).as_secs().max(1));
        }

        window.hits += 1;

        Ok(())
    }
}

/// middleware that rejects requests over the limiter's window capacity
/// with `429 TOO MANY REQUESTS` and a retry hint
pub async fn rate_limit_requests<B>(
    State(limiter): State<RateLimiter>,
    client_ip: SecureClientIp,
    req: http::Request<B>,
    next: Next<B>,
) -> Result<Response, (StatusCode, SimpleError)> {
    limiter.check(client_ip.0).map_err(|retry_after_secs| {
        (
            StatusCode::TOO_MANY_REQUESTS,
            SimpleError::from(format!(
                "too many requests, retry in {} seconds",
                retry_after_secs
            )),
        )
    })?;

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last_octet: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last_octet])
    }

    #[test]
    fn sixth_login_attempt_in_window_is_rejected() {
        let limiter = RateLimiter::for_login();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at(ip(1), now).is_ok());
        }

        let rejection = limiter.check_at(ip(1), now + Duration::from_secs(60));
        assert!(rejection.is_err());

        // the retry hint counts from the start of the window
        assert_eq!(rejection.unwrap_err(), 14 * 60);
    }

    #[test]
    fn counters_are_per_client_address() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).is_ok());
        assert!(limiter.check_at(ip(1), now).is_err());
        assert!(limiter.check_at(ip(2), now).is_ok());
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).is_ok());
        assert!(limiter.check_at(ip(1), now).is_ok());
        assert!(limiter.check_at(ip(1), now).is_err());

        assert!(limiter.check_at(ip(1), now + Duration::from_secs(61)).is_ok());
    }

    #[test]
    fn retry_hint_is_never_zero() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).is_ok());

        let retry = limiter
            .check_at(ip(1), now + Duration::from_millis(59_900))
            .unwrap_err();

        assert!(retry >= 1);
    }
}
