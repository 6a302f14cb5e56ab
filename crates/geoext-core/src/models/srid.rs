//! SRID propagation for copy-producing operations.

use serde::{Deserialize, Serialize};

use crate::error::{GeoextError, Result};

/// How a copy-producing transform picks the SRID of its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SridCopyPolicy {
    /// Result SRID is always 0
    Zero,
    /// Result keeps the source SRID; reference geometries are not checked
    #[default]
    Lenient,
    /// Result keeps the source SRID; a reference geometry with another SRID is an error
    Strict,
}

impl SridCopyPolicy {
    /// Resolve the SRID of a result derived from `source`, optionally
    /// parameterised by a geometry with SRID `reference`.
    pub fn resolve(&self, source: i32, reference: Option<i32>) -> Result<i32> {
        match self {
            SridCopyPolicy::Zero => Ok(0),
            SridCopyPolicy::Lenient => Ok(source),
            SridCopyPolicy::Strict => match reference {
                Some(reference) if reference != source => Err(GeoextError::MixedSrids {
                    source_srid: source,
                    reference_srid: reference,
                }),
                _ => Ok(source),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_zero() {
        assert_eq!(SridCopyPolicy::Zero.resolve(4326, Some(3857)).unwrap(), 0);
    }

    #[test]
    fn test_resolve_lenient() {
        assert_eq!(SridCopyPolicy::Lenient.resolve(4326, None).unwrap(), 4326);
        assert_eq!(SridCopyPolicy::Lenient.resolve(4326, Some(3857)).unwrap(), 4326);
    }

    #[test]
    fn test_resolve_strict() {
        assert_eq!(SridCopyPolicy::Strict.resolve(4326, Some(4326)).unwrap(), 4326);
        assert!(matches!(
            SridCopyPolicy::Strict.resolve(4326, Some(3857)),
            Err(GeoextError::MixedSrids { source_srid: 4326, reference_srid: 3857 })
        ));
    }
}
