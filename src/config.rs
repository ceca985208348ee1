use std::env;
use std::time::Duration;

const DEFAULT_GALWAY_BUS_URL: &str = "http://galwaybus.herokuapp.com";

/// Service settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub galway_bus_url: String,
    pub http_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env_u16("PORT", defaults.port);
        let galway_bus_url = env_string("GALWAY_BUS_URL", &defaults.galway_bus_url);
        let http_timeout =
            Duration::from_secs(env_u64("HTTP_TIMEOUT_SECS", defaults.http_timeout.as_secs()));

        Self { port, galway_bus_url, http_timeout }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            galway_bus_url: DEFAULT_GALWAY_BUS_URL.to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| {
            tracing::trace!("{key} not set, using default: {default}");
            default.to_string()
        })
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key).ok().and_then(|value| value.parse::<u16>().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|value| value.parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.galway_bus_url, "http://galwaybus.herokuapp.com");
        assert_eq!(settings.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn unset_values_fall_back() {
        assert_eq!(env_u16("GALWAY_BUS_TEST_UNSET_PORT", 9000), 9000);
        assert_eq!(env_string("GALWAY_BUS_TEST_UNSET_URL", "http://localhost"), "http://localhost");
    }
}
