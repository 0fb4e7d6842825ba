use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Validated document identifier.
///
/// Every externally supplied id string goes through [`DocId::parse`] exactly
/// once; repositories only ever see an already well-formed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(ObjectId);

impl DocId {
    /// Parse an id from its hex string form.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| Error::InvalidIdentifier(raw.to_string()))
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for DocId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_hex() {
        let id = DocId::parse("66fe9e7fbd12f8f9c9f3e3d1").unwrap();
        assert_eq!(id.to_string(), "66fe9e7fbd12f8f9c9f3e3d1");
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["", "not-an-id", "66fe9e7f", "zzfe9e7fbd12f8f9c9f3e3d1"] {
            match DocId::parse(raw) {
                Err(Error::InvalidIdentifier(s)) => assert_eq!(s, raw),
                other => panic!("expected InvalidIdentifier, got {:?}", other),
            }
        }
    }

    #[test]
    fn round_trips_through_object_id() {
        let oid = ObjectId::new();
        let id = DocId::from(oid);
        assert_eq!(id.as_object_id(), oid);
    }
}
