//! MaxMind GeoLite2/GeoIP2 lookup provider.
//!
//! Memory-mapped mmdb readers, shared behind `Arc` so the provider is cheap
//! to clone into background tasks. Lookup failures of any kind (bad IP, IP
//! not in the database, decode errors) yield `None`.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use maxminddb::{Mmap, Reader, geoip2};

use super::{GeoInfo, GeoLookup};

/// GeoIP provider backed by MaxMind City and (optionally) ASN databases.
pub struct MaxMindGeoProvider {
    city_reader: Arc<Reader<Mmap>>,
    asn_reader: Option<Arc<Reader<Mmap>>>,
}

impl MaxMindGeoProvider {
    /// Opens the mmdb files.
    ///
    /// # Arguments
    ///
    /// - `city_path` - path to a GeoLite2-City or GeoIP2-City .mmdb file
    /// - `asn_path` - optional path to a GeoLite2-ASN .mmdb file; when
    ///   present, the autonomous system organization is recorded as the ISP
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or is not a valid
    /// MaxMind database.
    pub fn open(city_path: &str, asn_path: Option<&str>) -> Result<Self> {
        let city_reader = unsafe { Reader::open_mmap(city_path) }
            .with_context(|| format!("Failed to open GeoIP City database at {}", city_path))?;

        let asn_reader = match asn_path {
            Some(path) => {
                let reader = unsafe { Reader::open_mmap(path) }
                    .with_context(|| format!("Failed to open GeoIP ASN database at {}", path))?;
                Some(Arc::new(reader))
            }
            None => None,
        };

        Ok(Self {
            city_reader: Arc::new(city_reader),
            asn_reader,
        })
    }

    fn lookup_city(&self, ip: IpAddr, info: &mut GeoInfo) -> bool {
        let Ok(result) = self.city_reader.lookup(ip) else {
            return false;
        };
        let Ok(Some(city)) = result.decode::<geoip2::City>() else {
            return false;
        };

        info.country = city.country.names.english.map(|s| s.to_string());
        info.city = city.city.names.english.map(|s| s.to_string());
        info.region = city
            .subdivisions
            .first()
            .and_then(|s| s.names.english)
            .map(|s| s.to_string());
        info.timezone = city.location.time_zone.map(|s| s.to_string());
        info.latitude = city.location.latitude;
        info.longitude = city.location.longitude;

        info.country.is_some() || info.city.is_some()
    }

    fn lookup_isp(&self, ip: IpAddr, info: &mut GeoInfo) {
        let Some(ref reader) = self.asn_reader else {
            return;
        };
        if let Ok(result) = reader.lookup(ip) {
            if let Ok(Some(asn)) = result.decode::<geoip2::Asn>() {
                info.isp = asn.autonomous_system_organization.map(|s| s.to_string());
            }
        }
    }
}

impl GeoLookup for MaxMindGeoProvider {
    fn lookup(&self, ip: IpAddr) -> Option<GeoInfo> {
        let mut info = GeoInfo::default();

        if !self.lookup_city(ip, &mut info) {
            return None;
        }
        self.lookup_isp(ip, &mut info);

        Some(info)
    }
}
