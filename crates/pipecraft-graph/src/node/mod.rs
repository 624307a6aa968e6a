//! Pipeline nodes.
//!
//! A [`Node`] couples an immutable [`NodeKind`] with a canvas position,
//! optional explicit dimensions and a free-form [`NodeConfig`].

mod config;
mod geometry;
mod id;
mod kind;

use serde::{Deserialize, Serialize};

pub use self::config::{LABEL_KEY, NodeConfig, TEXT_CONTENT_KEY};
pub use self::geometry::{Position, Size};
pub use self::id::{NODE_ID_PREFIX, NodeId, next_id};
pub use self::kind::{NodeCategory, NodeKind};

/// A node on the pipeline canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Node kind, fixed at creation.
    #[serde(rename = "type")]
    kind: NodeKind,
    /// Canvas position.
    #[serde(default)]
    pub position: Position,
    /// Node configuration.
    #[serde(rename = "data", default)]
    pub config: NodeConfig,
    /// Explicit dimensions, if the node was resized.
    #[serde(rename = "style", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl Node {
    /// Creates a node with an empty configuration.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            config: NodeConfig::new(),
            size: None,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets explicit dimensions.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Returns the node kind.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the display label, falling back to `<kind> node`.
    pub fn label(&self) -> String {
        self.config
            .label()
            .map_or_else(|| self.kind.default_label(), str::to_owned)
    }
}
