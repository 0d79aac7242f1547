/// Identifier newtypes used throughout Taxmap
use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxon ID type - newtype pattern for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub struct TaxonId(pub u32);

impl TaxonId {
    /// Create a new TaxonId
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TaxonId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<TaxonId> for u32 {
    fn from(taxon: TaxonId) -> Self {
        taxon.0
    }
}

/// Observation ID type - one classified item (e.g. a sequence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub struct ObservationId(pub u32);

impl ObservationId {
    /// Create a new ObservationId
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ObservationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ObservationId> for u32 {
    fn from(obs: ObservationId) -> Self {
        obs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxon_id_creation() {
        let taxon = TaxonId::new(9606);
        assert_eq!(taxon.value(), 9606);
        assert_eq!(format!("{}", taxon), "9606");
    }

    #[test]
    fn test_taxon_id_conversion() {
        let id: u32 = 12345;
        let taxon = TaxonId::from(id);
        let back: u32 = taxon.into();
        assert_eq!(id, back);
    }

    #[test]
    fn test_observation_id_conversion() {
        let obs = ObservationId::new(3);
        assert_eq!(obs.value(), 3);
        let back: u32 = obs.into();
        assert_eq!(back, 3);
    }
}
