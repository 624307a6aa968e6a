//! Node identifier type and sequential id allocation.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

use derive_more::{Debug, Display, From, Into};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix shared by every allocated node id.
pub const NODE_ID_PREFIX: &str = "node_";

static SEQUENTIAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^node_(\d+)$").expect("node id pattern is valid"));

/// Unique identifier for a node in a pipeline graph.
///
/// Ids allocated by the editor have the form `node_<n>`, but imported
/// documents may carry arbitrary strings.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id from any string.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the sequential id `node_<sequence>`.
    #[inline]
    pub fn sequential(sequence: u64) -> Self {
        Self(format!("{NODE_ID_PREFIX}{sequence}"))
    }

    /// Returns the numeric suffix if the whole id matches `node_<digits>`.
    pub fn sequence(&self) -> Option<u64> {
        SEQUENTIAL_ID
            .captures(&self.0)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl FromStr for NodeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Returns `node_<n+1>` where `n` is the largest sequence among `existing`,
/// or `node_0` when no id is sequential.
///
/// Ids that only contain `node_<digits>` as a substring do not count. Once
/// the sequence is exhausted at `u64::MAX`, the id becomes
/// `node_<u64::MAX>_<k>` with the smallest `k` not among `existing`.
pub fn next_id<'a, I>(existing: I) -> NodeId
where
    I: IntoIterator<Item = &'a NodeId>,
{
    let existing: HashSet<&NodeId> = existing.into_iter().collect();
    let Some(max) = existing.iter().filter_map(|id| id.sequence()).max() else {
        return NodeId::sequential(0);
    };

    if let Some(next) = max.checked_add(1) {
        return NodeId::sequential(next);
    }

    let mut suffix = 1_u64;
    loop {
        let candidate = NodeId::new(format!("{NODE_ID_PREFIX}{max}_{suffix}"));
        if !existing.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
