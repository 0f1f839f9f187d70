//! Coordinate resolver: pacing, timeout, and the fallback policy.
//!
//! Online flow:   Nominatim (bounded timeout) → synthetic fallback
//! Offline flow:  synthetic fallback only
//!
//! Every external attempt is followed by a mandatory quiet interval before
//! the next one may go out, per the Nominatim fair-use policy. Lookups
//! within one invocation are therefore strictly sequential; resolving N
//! unknown addresses takes at least N seconds online. That serialization
//! is deliberate and must not be parallelized away.

use super::provider;
use super::types::{CoordSource, GeocodeError, RegionBase, ResolvedCoord};
use std::time::{Duration, Instant};

/// Bound on a single Nominatim call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Minimum spacing between consecutive external lookups.
pub const MIN_LOOKUP_INTERVAL: Duration = Duration::from_secs(1);

/// The coordinate resolver.
///
/// Holds only per-invocation pacing state; nothing is shared between
/// resolvers, so concurrent optimization requests with their own resolver
/// instances cannot interfere.
pub struct CoordinateResolver {
    base: RegionBase,
    timeout: Duration,
    min_interval: Duration,
    offline: bool,
    last_attempt: Option<Instant>,
}

impl CoordinateResolver {
    pub fn new() -> Self {
        Self::with_base(RegionBase::default())
    }

    /// Create a resolver with a specific fallback region base.
    pub fn with_base(base: RegionBase) -> Self {
        Self {
            base,
            timeout: DEFAULT_TIMEOUT,
            min_interval: MIN_LOOKUP_INTERVAL,
            offline: false,
            last_attempt: None,
        }
    }

    /// Override the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Offline mode: skip network calls, resolve everything synthetically.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn base(&self) -> RegionBase {
        self.base
    }

    /// Resolve an address to a coordinate pair.
    ///
    /// Never fails past input validation: a lookup timeout, transport
    /// error, non-success status, malformed body, or empty candidate list
    /// all degrade to the synthetic fallback. A blank address is the
    /// caller's error and the only way this returns `Err`.
    pub fn resolve(&mut self, address: &str) -> Result<ResolvedCoord, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        if !self.offline {
            self.pace();
            let attempt = provider::nominatim_lookup(address, self.timeout);
            self.last_attempt = Some(Instant::now());
            match attempt {
                Ok((lat, lon)) => {
                    return Ok(ResolvedCoord { lat, lon, source: CoordSource::Nominatim });
                }
                Err(e) => {
                    eprintln!(
                        "  Warning: geocoding '{}' failed ({}); using synthetic fallback",
                        address, e,
                    );
                }
            }
        }

        let (lat, lon) = provider::synthetic_coords(address, self.base);
        Ok(ResolvedCoord { lat, lon, source: CoordSource::Synthetic })
    }

    /// Sleep out the remainder of the quiet interval after the previous
    /// external attempt. No-op before the first attempt.
    fn pace(&self) {
        if let Some(last) = self.last_attempt {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
    }
}

impl Default for CoordinateResolver {
    fn default() -> Self {
        Self::new()
    }
}
