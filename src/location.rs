//! Best-effort geolocation — one bounded read per session.
//!
//! The platform contract: give me one position fix within ~10s, allowing a
//! cached fix up to ~60s old, or report failure. Failure (denied, timed
//! out, unsupported platform) is swallowed with diagnostic logging only —
//! nothing downstream blocks on it; the hospital lookup simply never
//! triggers without a position.
//!
//! `PositionSource` is the platform seam. On desktop the stand-in source
//! reads `ER_COMPASS_LAT`/`ER_COMPASS_LON`; unset variables are the
//! "unsupported platform" case.

use std::time::{Duration, Instant};

use crate::config;
use crate::models::UserLocation;

/// Errors from a position read. Never surfaced to the user — callers log
/// and degrade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("Geolocation is not supported on this platform")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// A raw position read — "returns coordinates or fails".
#[allow(async_fn_in_trait)]
pub trait PositionSource {
    async fn current_position(&self) -> Result<UserLocation, GeoError>;
}

/// Desktop stand-in for a platform geolocation API: coordinates come from
/// the environment. Missing variables mean the platform has no fix source.
pub struct EnvPositionSource;

impl PositionSource for EnvPositionSource {
    async fn current_position(&self) -> Result<UserLocation, GeoError> {
        let lat = std::env::var(config::POSITION_LAT_ENV)
            .map_err(|_| GeoError::Unsupported)?;
        let lon = std::env::var(config::POSITION_LON_ENV)
            .map_err(|_| GeoError::Unsupported)?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeoError::Unavailable(format!("bad latitude {lat:?}")))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GeoError::Unavailable(format!("bad longitude {lon:?}")))?;

        Ok(UserLocation::new(latitude, longitude))
    }
}

// ═══════════════════════════════════════════════════════════
// LocationService — bounded wait + cached fix
// ═══════════════════════════════════════════════════════════

/// A position fix with its acquisition time, for cache-age checks.
struct CachedFix {
    location: UserLocation,
    acquired: Instant,
    acquired_at: chrono::DateTime<chrono::Utc>,
}

/// Wraps a `PositionSource` with the session's geolocation policy:
/// bounded wait, cached-fix reuse, no retry, failures swallowed.
pub struct LocationService<S> {
    source: S,
    timeout: Duration,
    max_fix_age: Duration,
    cached: Option<CachedFix>,
}

impl<S: PositionSource> LocationService<S> {
    pub fn new(source: S) -> Self {
        Self::with_limits(source, config::GEO_FIX_TIMEOUT, config::GEO_FIX_MAX_AGE)
    }

    pub fn with_limits(source: S, timeout: Duration, max_fix_age: Duration) -> Self {
        Self {
            source,
            timeout,
            max_fix_age,
            cached: None,
        }
    }

    /// One best-effort position read.
    ///
    /// Returns a cached fix if one is fresh enough, otherwise asks the
    /// source with a bounded wait. Any failure returns `None` — the caller
    /// proceeds without a position and must not retry.
    pub async fn acquire(&mut self) -> Option<UserLocation> {
        if let Some(fix) = &self.cached {
            if fix.acquired.elapsed() <= self.max_fix_age {
                tracing::debug!(
                    acquired_at = %fix.acquired_at.to_rfc3339(),
                    "Reusing cached position fix"
                );
                return Some(fix.location.clone());
            }
        }

        match tokio::time::timeout(self.timeout, self.source.current_position()).await {
            Ok(Ok(location)) => {
                tracing::info!(
                    latitude = location.latitude,
                    longitude = location.longitude,
                    "Position fix acquired"
                );
                self.cached = Some(CachedFix {
                    location: location.clone(),
                    acquired: Instant::now(),
                    acquired_at: chrono::Utc::now(),
                });
                Some(location)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Position read failed, continuing without location");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Position read timed out, continuing without location"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Source returning a fixed position, counting how often it is asked.
    struct FixedSource {
        location: UserLocation,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(lat: f64, lon: f64) -> Self {
            Self {
                location: UserLocation::new(lat, lon),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PositionSource for &FixedSource {
        async fn current_position(&self) -> Result<UserLocation, GeoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.location.clone())
        }
    }

    /// Source that always fails with the given error.
    struct FailingSource(GeoError);

    impl PositionSource for FailingSource {
        async fn current_position(&self) -> Result<UserLocation, GeoError> {
            Err(self.0.clone())
        }
    }

    /// Source that never resolves — exercises the bounded wait.
    struct HangingSource;

    impl PositionSource for HangingSource {
        async fn current_position(&self) -> Result<UserLocation, GeoError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn acquire_returns_source_fix() {
        let source = FixedSource::new(37.5665, 126.978);
        let mut service = LocationService::new(&source);
        let loc = service.acquire().await.unwrap();
        assert_eq!(loc.latitude, 37.5665);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fresh_fix_is_reused_without_a_second_read() {
        let source = FixedSource::new(1.0, 2.0);
        let mut service = LocationService::new(&source);
        service.acquire().await.unwrap();
        service.acquire().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_fix_triggers_a_new_read() {
        let source = FixedSource::new(1.0, 2.0);
        let mut service =
            LocationService::with_limits(&source, Duration::from_secs(10), Duration::ZERO);
        service.acquire().await.unwrap();
        service.acquire().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_is_swallowed_and_not_cached() {
        let mut service = LocationService::new(FailingSource(GeoError::PermissionDenied));
        assert!(service.acquire().await.is_none());
        assert!(service.cached.is_none());
    }

    #[tokio::test]
    async fn hanging_source_hits_the_bounded_wait() {
        let mut service = LocationService::with_limits(
            HangingSource,
            Duration::from_millis(10),
            config::GEO_FIX_MAX_AGE,
        );
        assert!(service.acquire().await.is_none());
    }

    #[tokio::test]
    async fn env_source_unsupported_without_variables() {
        // The ER_COMPASS_LAT/LON variables are not set under test.
        let result = EnvPositionSource.current_position().await;
        assert_eq!(result.unwrap_err(), GeoError::Unsupported);
    }

    #[test]
    fn geo_error_messages() {
        assert!(GeoError::Unsupported.to_string().contains("not supported"));
        assert!(GeoError::PermissionDenied.to_string().contains("denied"));
    }
}
