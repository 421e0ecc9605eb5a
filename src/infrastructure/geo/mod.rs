//! Pluggable IP-to-location lookup.
//!
//! The provider contract is deliberately infallible: a bad, unroutable, or
//! unknown IP yields `None`, never an error, so enrichment can skip the row
//! and retry on a later tick.
//!
//! # Implementations
//!
//! - [`MaxMindGeoProvider`] - MaxMind GeoLite2/GeoIP2 mmdb lookup
//! - [`NullGeoProvider`] - Always-`None` fallback when no database is configured

mod maxmind;

pub use maxmind::MaxMindGeoProvider;

use std::net::IpAddr;

/// Location attributes resolved for an IP address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// IP geolocation provider consumed by the enrichment worker.
#[cfg_attr(test, mockall::automock)]
pub trait GeoLookup: Send + Sync {
    /// Resolves an IP to a location, or `None` when unknown.
    fn lookup(&self, ip: IpAddr) -> Option<GeoInfo>;
}

/// No-op provider used when no GeoIP database is configured.
///
/// Rows keep their null geo fields and remain backfill candidates, so
/// enabling a real provider later heals historical data.
#[derive(Debug, Clone, Default)]
pub struct NullGeoProvider;

impl GeoLookup for NullGeoProvider {
    fn lookup(&self, _ip: IpAddr) -> Option<GeoInfo> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_provider_returns_none() {
        let provider = NullGeoProvider;
        assert!(provider.lookup("8.8.8.8".parse().unwrap()).is_none());
        assert!(provider.lookup("::1".parse().unwrap()).is_none());
    }
}
