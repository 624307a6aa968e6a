//! Node ports.
//!
//! Ports are never stored. They are recomputed from a node's kind and
//! configuration through a [`PortResolver`] backed by a [`NodeCatalog`].

mod catalog;
mod resolver;
pub mod template;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

pub use self::catalog::{BuiltinCatalog, DefaultValue, InputPorts, KindDeclaration, NodeCatalog};
pub use self::resolver::{PortResolver, ResolvedPorts};

/// Prefix of the port id generated for a template variable.
pub const VARIABLE_PORT_PREFIX: &str = "var-";

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PortDirection {
    /// Accepts incoming edges.
    Input,
    /// Emits outgoing edges.
    Output,
}

/// Where a port comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum PortOrigin {
    /// Declared by the node catalog for the kind.
    Static,
    /// Derived from a `[[variable]]` in a text template.
    Dynamic {
        /// Variable name without brackets.
        variable: String,
    },
}

/// A named connection point on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// Port id, unique per node and direction.
    pub id: String,
    /// Side of the node.
    pub direction: PortDirection,
    /// Static or template-derived.
    #[serde(flatten)]
    pub origin: PortOrigin,
}

impl Port {
    /// Creates a catalog-declared port.
    pub fn fixed(id: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            id: id.into(),
            direction,
            origin: PortOrigin::Static,
        }
    }

    /// Creates the input port for a template variable, with id `var-<name>`.
    pub fn variable(name: impl Into<String>) -> Self {
        let variable = name.into();
        Self {
            id: variable_port_id(&variable),
            direction: PortDirection::Input,
            origin: PortOrigin::Dynamic { variable },
        }
    }

    /// Returns whether the port was derived from a template variable.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self.origin, PortOrigin::Dynamic { .. })
    }
}

/// Returns the port id used for the template variable `name`.
#[inline]
pub fn variable_port_id(name: &str) -> String {
    format!("{VARIABLE_PORT_PREFIX}{name}")
}
