//! Geocoding providers: the Nominatim lookup and the synthetic fallback.

use super::types::{GeocodeError, RegionBase};
use crate::geo;
use serde::Deserialize;
use std::time::Duration;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "Routecraft/0.3 (delivery-route-engine)";

// ─── Nominatim provider ─────────────────────────────────────────

/// One candidate row from a Nominatim search response.
/// Coordinates arrive as strings and are parsed on use.
#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Query Nominatim for a free-text address and return the first candidate's
/// coordinates.
///
/// `timeout` bounds the whole call. Nominatim requires a User-Agent on
/// every request; rate discipline (one request per second) is the
/// resolver's responsibility, not this function's.
pub fn nominatim_lookup(address: &str, timeout: Duration) -> Result<(f64, f64), GeocodeError> {
    let url = format!(
        "{}?q={}&format=json&limit=1&addressdetails=1",
        NOMINATIM_URL,
        urlencode(address),
    );

    let response = ureq::get(&url)
        .set("User-Agent", USER_AGENT)
        .timeout(timeout)
        .call()
        .map_err(|e| GeocodeError::Network(e.to_string()))?;

    let results: Vec<NominatimResult> = response
        .into_json()
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    let first = results
        .first()
        .ok_or_else(|| GeocodeError::NoResults(address.to_string()))?;

    let lat: f64 = first
        .lat
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", first.lat)))?;
    let lon: f64 = first
        .lon
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", first.lon)))?;

    Ok((lat, lon))
}

// ─── Synthetic fallback ─────────────────────────────────────────

/// Deterministic fallback coordinates for an address.
///
/// The MD5 digest of the address's UTF-8 bytes, read as a 128-bit
/// big-endian integer, yields two offsets in [-0.1, +0.1) degrees (about
/// 11 km) that scatter the point around the region base. The same address
/// always maps to the same coordinate, across processes and platforms.
pub fn synthetic_coords(address: &str, base: RegionBase) -> (f64, f64) {
    let digest = md5::compute(address.as_bytes());
    let hash = u128::from_be_bytes(digest.0);

    let lat_offset = ((hash % 2000) as f64 - 1000.0) / 10_000.0;
    let lon_offset = (((hash / 2000) % 2000) as f64 - 1000.0) / 10_000.0;

    (
        geo::round6(base.lat + lat_offset),
        geo::round6(base.lon + lon_offset),
    )
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencode(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            '=' => "%3D".to_string(),
            '+' => "%2B".to_string(),
            ',' => "%2C".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => format!("%{:02X}", c as u32),
        })
        .collect()
}
