use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::GridError;

/// A cell of the infinite integer grid.
///
/// Ordering is lexicographic on `(x, y)`; it is the tie-break used when
/// several assigned cells are equally close to a target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// `|x1 - x2| + |y1 - y2|`, saturating at `u64::MAX`.
    pub fn manhattan_distance(&self, other: &Coordinate) -> u64 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }
}

/// Canonical persistence key: `"x,y"`.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::Validation(format!("Invalid coordinate key: {:?}", s));

        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;

        Ok(Self { x, y })
    }
}

/// A domain and its embedding, as loaded from the embedding file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub domain: String,
    pub vector: Vec<f32>,
}

impl Item {
    pub fn new(domain: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            domain: domain.into(),
            vector,
        }
    }
}

/// Full coordinate → domain map, ordered by coordinate.
pub type AssignmentMap = BTreeMap<Coordinate, String>;

/// Request body for `POST /coordinates`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ResolveRequest {
    /// Target cell
    pub x: i64,
    pub y: i64,
    /// Cell the caller is expanding from
    pub source_x: i64,
    pub source_y: i64,
}

impl ResolveRequest {
    pub fn target(&self) -> Coordinate {
        Coordinate::new(self.x, self.y)
    }

    pub fn source(&self) -> Coordinate {
        Coordinate::new(self.source_x, self.source_y)
    }
}

/// A single domain answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DomainResponse {
    pub domain: String,
}

impl From<String> for DomainResponse {
    fn from(domain: String) -> Self {
        Self { domain }
    }
}

/// Request body for `POST /related_embeddings`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RelatedEmbeddingsRequest {
    #[validate(length(min = 1, message = "At least one domain is required"))]
    pub domains: Vec<String>,

    /// Neighbours per domain, defaults to 10
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl RelatedEmbeddingsRequest {
    pub const DEFAULT_TOP_N: usize = 10;

    pub fn top_n(&self) -> usize {
        self.top_n.unwrap_or(Self::DEFAULT_TOP_N)
    }
}

/// Serialize an assignment map into the `{"x,y": "domain"}` wire shape.
pub fn to_keyed(map: &AssignmentMap) -> BTreeMap<String, String> {
    map.iter()
        .map(|(coord, domain)| (coord.to_string(), domain.clone()))
        .collect()
}
