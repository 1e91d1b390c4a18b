use super::geo::GeoPoint;
use bson::Bson;
use serde::{Deserialize, Serialize};

// Safety limits to prevent resource abuse
pub(crate) const MAX_PATH_DEPTH: usize = 32;
pub(crate) const MAX_IN_SET: usize = 1000;
pub(crate) const MAX_SORT_FIELDS: usize = 8;
pub(crate) const MAX_PROJECTION_FIELDS: usize = 64;
pub(crate) const MAX_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

/// Options for `find_docs`.
///
/// `skip` and `limit` are signed so that caller input reaches the store untouched:
/// a negative skip is rejected there, a negative limit counts as its absolute value
/// and a zero limit means "no limit".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindOptions {
    pub projection: Option<Vec<String>>,
    pub sort: Option<Vec<SortSpec>>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Proximity condition on a point-valued field. Distances are meters.
#[derive(Debug, Clone, PartialEq)]
pub struct NearSpec {
    pub path: String,
    pub center: GeoPoint,
    pub max_distance: Option<f64>,
    pub min_distance: Option<f64>,
}

#[derive(Debug, Clone)]
pub enum Filter {
    True,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Exists { path: String, exists: bool },
    In { path: String, values: Vec<Bson> },
    Nin { path: String, values: Vec<Bson> },
    Cmp { path: String, op: CmpOp, value: Bson },
    Near(NearSpec),
}

impl Filter {
    /// The proximity clause, if any. Only conjunctions are searched: `$near` is not
    /// allowed under `$or`, `$nor` or `$not`.
    #[must_use]
    pub fn near(&self) -> Option<&NearSpec> {
        match self {
            Self::Near(n) => Some(n),
            Self::And(fs) => fs.iter().find_map(Self::near),
            _ => None,
        }
    }

    pub(crate) fn count_near(&self) -> usize {
        match self {
            Self::Near(_) => 1,
            Self::And(fs) | Self::Or(fs) => fs.iter().map(Self::count_near).sum(),
            Self::Not(f) => f.count_near(),
            _ => 0,
        }
    }
}
