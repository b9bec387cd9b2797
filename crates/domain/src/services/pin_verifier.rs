//! Invitation PIN membership checks.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::crypto::redact_pin;
use tracing::{debug, warn};

use super::data_service::{DataServiceError, RsvpDataService};

/// PINs printed on the invitations.
pub const DEFAULT_VALID_PINS: [&str; 4] = ["2210", "5678", "9876", "4321"];

/// Where valid PINs are looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinSource {
    /// Configured allow-list only; no network call.
    #[default]
    Static,
    /// The `valid_pins` table only. Lookup failures are service errors.
    Remote,
    /// Allow-list first, then the `valid_pins` table. Lookup failures count as a miss.
    StaticThenRemote,
}

impl FromStr for PinSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(PinSource::Static),
            "remote" => Ok(PinSource::Remote),
            "static_then_remote" => Ok(PinSource::StaticThenRemote),
            other => Err(format!("unknown pin source: {other}")),
        }
    }
}

/// Checks whether a PIN belongs to the set of valid invitation codes.
#[derive(Debug, Clone)]
pub struct PinVerifier {
    source: PinSource,
    allowed: BTreeSet<String>,
}

impl Default for PinVerifier {
    fn default() -> Self {
        Self::new(PinSource::Static, DEFAULT_VALID_PINS)
    }
}

impl PinVerifier {
    pub fn new<I, S>(source: PinSource, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source,
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn source(&self) -> PinSource {
        self.source
    }

    fn in_allow_list(&self, pin: &str) -> bool {
        self.allowed.contains(pin)
    }

    /// Returns `Ok(true)` if `pin` is a member of the valid set.
    ///
    /// Several guests may share a PIN; membership is all that is checked.
    pub async fn verify(
        &self,
        pin: &str,
        data: &dyn RsvpDataService,
    ) -> Result<bool, DataServiceError> {
        match self.source {
            PinSource::Static => Ok(self.in_allow_list(pin)),
            PinSource::Remote => data.is_active_pin(pin).await,
            PinSource::StaticThenRemote => {
                if self.in_allow_list(pin) {
                    return Ok(true);
                }
                match data.is_active_pin(pin).await {
                    Ok(found) => {
                        debug!(pin = %redact_pin(pin), found, "Remote PIN lookup");
                        Ok(found)
                    }
                    Err(err) => {
                        warn!(
                            pin = %redact_pin(pin),
                            error = %err,
                            "Remote PIN lookup failed, using allow-list only"
                        );
                        Ok(false)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_service::MockDataService;

    #[tokio::test]
    async fn test_static_source_never_calls_data_service() {
        let data = MockDataService::with_active_pins(["1111"]);
        let verifier = PinVerifier::default();

        for pin in DEFAULT_VALID_PINS {
            assert!(verifier.verify(pin, &data).await.unwrap());
        }
        assert!(!verifier.verify("0000", &data).await.unwrap());
        assert!(!verifier.verify("1111", &data).await.unwrap());
        assert_eq!(data.pin_lookup_calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_source_uses_table() {
        let data = MockDataService::with_active_pins(["1111"]);
        let verifier = PinVerifier::new(PinSource::Remote, DEFAULT_VALID_PINS);

        assert!(verifier.verify("1111", &data).await.unwrap());
        assert!(!verifier.verify("2210", &data).await.unwrap());
        assert_eq!(data.pin_lookup_calls(), 2);
    }

    #[tokio::test]
    async fn test_remote_source_propagates_failures() {
        let data = MockDataService::new();
        data.set_fail_pin_lookups(true);
        let verifier = PinVerifier::new(PinSource::Remote, DEFAULT_VALID_PINS);

        assert!(verifier.verify("2210", &data).await.is_err());
    }

    #[tokio::test]
    async fn test_static_then_remote_short_circuits_on_allow_list() {
        let data = MockDataService::with_active_pins(["1111"]);
        let verifier = PinVerifier::new(PinSource::StaticThenRemote, DEFAULT_VALID_PINS);

        assert!(verifier.verify("2210", &data).await.unwrap());
        assert_eq!(data.pin_lookup_calls(), 0);

        assert!(verifier.verify("1111", &data).await.unwrap());
        assert!(!verifier.verify("0000", &data).await.unwrap());
        assert_eq!(data.pin_lookup_calls(), 2);
    }

    #[tokio::test]
    async fn test_static_then_remote_treats_lookup_failure_as_miss() {
        let data = MockDataService::with_active_pins(["1111"]);
        data.set_fail_pin_lookups(true);
        let verifier = PinVerifier::new(PinSource::StaticThenRemote, DEFAULT_VALID_PINS);

        assert!(!verifier.verify("1111", &data).await.unwrap());
        assert!(verifier.verify("5678", &data).await.unwrap());
    }

    #[test]
    fn test_pin_source_from_str() {
        assert_eq!("static".parse::<PinSource>(), Ok(PinSource::Static));
        assert_eq!("remote".parse::<PinSource>(), Ok(PinSource::Remote));
        assert_eq!(
            "static_then_remote".parse::<PinSource>(),
            Ok(PinSource::StaticThenRemote)
        );
        assert!("lookup".parse::<PinSource>().is_err());
    }
}
