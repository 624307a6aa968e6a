//! Computes the ports of a node from its kind and configuration.

use std::fmt;
use std::sync::Arc;

use super::catalog::{BuiltinCatalog, InputPorts, NodeCatalog};
use super::{Port, PortDirection, template};
use crate::node::Node;

/// The input and output ports of a node at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPorts {
    /// Input ports in declaration or first-occurrence order.
    pub inputs: Vec<Port>,
    /// Output ports in declaration order.
    pub outputs: Vec<Port>,
}

impl ResolvedPorts {
    /// Returns the ports on one side.
    pub fn side(&self, direction: PortDirection) -> &[Port] {
        match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        }
    }

    /// Finds a port by id on one side.
    pub fn find(&self, direction: PortDirection, id: &str) -> Option<&Port> {
        self.side(direction).iter().find(|port| port.id == id)
    }

    /// Returns whether a port with `id` exists on one side.
    #[inline]
    pub fn contains(&self, direction: PortDirection, id: &str) -> bool {
        self.find(direction, id).is_some()
    }

    /// Returns the only port on one side, if there is exactly one.
    pub fn sole(&self, direction: PortDirection) -> Option<&Port> {
        match self.side(direction) {
            [port] => Some(port),
            _ => None,
        }
    }
}

/// Resolves ports through a [`NodeCatalog`].
#[derive(Clone)]
pub struct PortResolver {
    catalog: Arc<dyn NodeCatalog>,
}

impl PortResolver {
    /// Creates a resolver over a custom catalog.
    pub fn new(catalog: Arc<dyn NodeCatalog>) -> Self {
        Self { catalog }
    }

    /// Returns the backing catalog.
    #[inline]
    pub fn catalog(&self) -> &dyn NodeCatalog {
        self.catalog.as_ref()
    }

    /// Returns the current ports of `node`.
    ///
    /// Template-derived ports come from the valid `[[variable]]` names of
    /// the declared field, deduplicated in order of first occurrence. A
    /// missing or non-string field yields no ports.
    pub fn resolve(&self, node: &Node) -> ResolvedPorts {
        let declaration = self.catalog.declaration(node.kind());

        let inputs = match declaration.inputs {
            InputPorts::Fixed(ids) => ids
                .iter()
                .map(|id| Port::fixed(*id, PortDirection::Input))
                .collect(),
            InputPorts::Template { field } => {
                let text = node.config.get_str(field).unwrap_or_default();
                template::extract(text).into_iter().map(Port::variable).collect()
            }
        };

        let outputs = declaration
            .outputs
            .iter()
            .map(|id| Port::fixed(*id, PortDirection::Output))
            .collect();

        ResolvedPorts { inputs, outputs }
    }
}

impl Default for PortResolver {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinCatalog))
    }
}

impl fmt::Debug for PortResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortResolver").finish_non_exhaustive()
    }
}
