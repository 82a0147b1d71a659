use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

/// Throttling for the credential endpoints (login, registration, password
/// reset). Keyed per client IP; the smart extractor honors
/// `x-forwarded-for` and friends before falling back to the peer address.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Sustained requests per second allowed against auth endpoints.
    pub auth_per_second: u64,
    /// Burst size allowed against auth endpoints.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            auth_per_second: std::env::var("RATE_LIMIT_AUTH_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            auth_burst_size: std::env::var("RATE_LIMIT_AUTH_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Creates the `GovernorConfig` applied to the auth router.
    ///
    /// # Panics
    ///
    /// Panics if the governor configuration cannot be built (zero values).
    #[must_use]
    pub fn auth_governor_config(
        &self,
    ) -> GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.auth_per_second)
            .burst_size(self.auth_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("Failed to build auth rate limiter config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_governor_config_builds() {
        let config = RateLimitConfig::default();
        // Building the governor config validates the values.
        let _ = config.auth_governor_config();
    }
}
