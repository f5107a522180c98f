//! Binary configuration blobs
//!
//! A resolved configuration serialized with postcard, for embedding in a
//! firmware image at build time. Decoding checks the layout version and
//! validates the configuration again before handing it out.

use alloc::vec::Vec;

use kerf_core::validate::{validate, Violations};
use kerf_core::{ResolvedConfig, CONFIG_VERSION};

/// Blob errors
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlobError {
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Blob written by a different layout version
    VersionMismatch { found: u8 },
    /// Blob decodes but breaks an invariant
    Invalid(Violations),
}

/// Serialize a configuration
pub fn encode(config: &ResolvedConfig) -> Result<Vec<u8>, BlobError> {
    postcard::to_allocvec(config).map_err(|_| BlobError::Serialize)
}

/// Deserialize and validate a configuration
pub fn decode(bytes: &[u8]) -> Result<ResolvedConfig, BlobError> {
    let config: ResolvedConfig =
        postcard::from_bytes(bytes).map_err(|_| BlobError::Deserialize)?;

    // Version check
    if config.version != CONFIG_VERSION {
        warn!(
            "Config version mismatch: found {}, expected {}",
            config.version,
            CONFIG_VERSION
        );
        return Err(BlobError::VersionMismatch {
            found: config.version,
        });
    }

    validate(&config).map_err(BlobError::Invalid)?;

    debug!("Decoded {} byte configuration blob", bytes.len());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_core::board::ARDUINO_ATMEGA328P;
    use kerf_core::features::{DualAxisVariant, FeatureRequest};
    use kerf_core::machine::presets;
    use kerf_core::{assemble, Axis, Violation};

    fn config() -> ResolvedConfig {
        assemble(
            &ARDUINO_ATMEGA328P,
            &presets::shapeoko(),
            &FeatureRequest {
                variable_spindle: true,
                dual_axis: DualAxisVariant::A,
                ..FeatureRequest::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_decode_returns_same_config() {
        let original = config();
        let bytes = encode(&original).unwrap();
        assert_eq!(decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_identical_inputs_give_identical_bytes() {
        assert_eq!(encode(&config()).unwrap(), encode(&config()).unwrap());
    }

    #[test]
    fn test_version_mismatch() {
        let mut stale = config();
        stale.version = CONFIG_VERSION + 1;
        let bytes = encode(&stale).unwrap();
        assert_eq!(
            decode(&bytes),
            Err(BlobError::VersionMismatch {
                found: CONFIG_VERSION + 1
            })
        );
    }

    #[test]
    fn test_decode_revalidates() {
        let mut tampered = config();
        tampered.axes[Axis::X.index()].max_travel_mm = -1.0;
        let bytes = encode(&tampered).unwrap();
        match decode(&bytes) {
            Err(BlobError::Invalid(violations)) => {
                assert!(violations.contains(&Violation::OutOfRangeValue {
                    field: kerf_core::validate::Field::MaxTravel(Axis::X),
                }));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_truncated_blob() {
        let bytes = encode(&config()).unwrap();
        assert_eq!(
            decode(&bytes[..bytes.len() / 2]),
            Err(BlobError::Deserialize)
        );
    }
}
