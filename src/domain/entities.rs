//! Domain entities: core data structures

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Identifier assigned by GeoNames; the sole identity key of a region.
pub type GeonameId = i64;

/// GeoNames id of the fixed root node.
pub const EARTH_ID: GeonameId = 6295630;

/// Representative point of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse the textual `lat`/`lng` pair of a GeoNames record.
    pub fn parse(latitude: &str, longitude: &str) -> DomainResult<Self> {
        Ok(Self::new(
            parse_degrees("lat", latitude)?,
            parse_degrees("lng", longitude)?,
        ))
    }
}

fn parse_degrees(field: &'static str, raw: &str) -> DomainResult<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| DomainError::InvalidRecord {
        field,
        reason: format!("not a number: {raw:?}"),
    })?;
    if !value.is_finite() {
        return Err(DomainError::InvalidRecord {
            field,
            reason: format!("not finite: {raw:?}"),
        });
    }
    Ok(value)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// One geographic entity: continent, country, subdivision or Earth itself.
///
/// Equality and hashing look at `id` only, so two values describing the same
/// GeoNames entry compare equal even if their names differ.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: GeonameId,
    /// Display name (locale preferred)
    pub name: String,
    /// Unlocalized GeoNames "toponymName"
    pub toponym_name: String,
    pub coordinate: Coordinate,
}

impl Region {
    pub fn new(
        id: GeonameId,
        name: impl Into<String>,
        toponym_name: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            toponym_name: toponym_name.into(),
            coordinate,
        }
    }

    /// The fixed root of every tree.
    pub fn earth() -> Self {
        Self::new(EARTH_ID, "Earth", "Earth", Coordinate::new(0.0, 0.0))
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Region {}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Node label used verbatim by every export: `<name> (<id>)`.
impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Classified answer of a children lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildrenOutcome {
    /// Upstream reported, or counted, zero children.
    NoChildren,
    /// The response could not be interpreted; carries the reason.
    UpstreamError(String),
    Children(Vec<Region>),
}

impl ChildrenOutcome {
    /// Collapse to a plain list; both failure shapes become empty.
    pub fn into_regions(self) -> Vec<Region> {
        match self {
            ChildrenOutcome::Children(regions) => regions,
            ChildrenOutcome::NoChildren | ChildrenOutcome::UpstreamError(_) => Vec::new(),
        }
    }
}

/// Order in which siblings are emitted by exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingOrder {
    /// As received from the resolver
    #[default]
    Received,
    Id,
    Name,
}

impl FromStr for SiblingOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "received" => Ok(SiblingOrder::Received),
            "id" => Ok(SiblingOrder::Id),
            "name" => Ok(SiblingOrder::Name),
            other => Err(DomainError::InvalidSiblingOrder(other.to_string())),
        }
    }
}
