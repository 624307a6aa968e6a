//! Per-kind port declarations and default configuration.

use serde_json::Value;

use crate::node::{LABEL_KEY, NodeConfig, NodeKind, TEXT_CONTENT_KEY};

/// How a kind derives its input ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPorts {
    /// A fixed list of port ids.
    Fixed(&'static [&'static str]),
    /// One port per `[[variable]]` in the named string field.
    Template {
        /// Configuration key holding the template.
        field: &'static str,
    },
}

/// Port and default declarations for one node kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDeclaration {
    /// Declared kind.
    pub kind: NodeKind,
    /// Input port source.
    pub inputs: InputPorts,
    /// Fixed output port ids.
    pub outputs: &'static [&'static str],
    /// Default configuration besides the label.
    pub defaults: &'static [(&'static str, DefaultValue)],
}

/// Literal default configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// String literal.
    Str(&'static str),
    /// Floating point literal.
    Number(f64),
}

impl From<DefaultValue> for Value {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Str(s) => Value::from(s),
            DefaultValue::Number(n) => Value::from(n),
        }
    }
}

/// Source of per-kind port declarations.
///
/// Adding a kind means adding a declaration, never touching the resolver.
pub trait NodeCatalog: Send + Sync {
    /// Returns the declaration for `kind`.
    fn declaration(&self, kind: NodeKind) -> &KindDeclaration;

    /// Returns the configuration given to a freshly created node.
    fn default_config(&self, kind: NodeKind) -> NodeConfig {
        let declaration = self.declaration(kind);
        let mut config = NodeConfig::new().with(LABEL_KEY, kind.default_label());
        for (key, value) in declaration.defaults {
            config.insert(*key, *value);
        }
        config
    }
}

const INPUT: &[&str] = &["input"];
const OUTPUT: &[&str] = &["output"];
const NONE: &[&str] = &[];

static BUILTIN: [KindDeclaration; 9] = [
    KindDeclaration {
        kind: NodeKind::Input,
        inputs: InputPorts::Fixed(NONE),
        outputs: OUTPUT,
        defaults: &[(TEXT_CONTENT_KEY, DefaultValue::Str(""))],
    },
    KindDeclaration {
        kind: NodeKind::Output,
        inputs: InputPorts::Fixed(INPUT),
        outputs: NONE,
        defaults: &[],
    },
    KindDeclaration {
        kind: NodeKind::Text,
        inputs: InputPorts::Template {
            field: TEXT_CONTENT_KEY,
        },
        outputs: OUTPUT,
        defaults: &[(TEXT_CONTENT_KEY, DefaultValue::Str(""))],
    },
    KindDeclaration {
        kind: NodeKind::Llm,
        inputs: InputPorts::Fixed(INPUT),
        outputs: OUTPUT,
        defaults: &[
            ("model", DefaultValue::Str("gpt-4")),
            ("temperature", DefaultValue::Number(0.7)),
        ],
    },
    KindDeclaration {
        kind: NodeKind::Transform,
        inputs: InputPorts::Fixed(INPUT),
        outputs: OUTPUT,
        defaults: &[("transformation", DefaultValue::Str("uppercase"))],
    },
    KindDeclaration {
        kind: NodeKind::Filter,
        inputs: InputPorts::Fixed(INPUT),
        outputs: &["output", "rejected"],
        defaults: &[("condition", DefaultValue::Str(""))],
    },
    KindDeclaration {
        kind: NodeKind::Merge,
        inputs: InputPorts::Fixed(&["input1", "input2"]),
        outputs: OUTPUT,
        defaults: &[("strategy", DefaultValue::Str("concat"))],
    },
    KindDeclaration {
        kind: NodeKind::Condition,
        inputs: InputPorts::Fixed(INPUT),
        outputs: &["true", "false"],
        defaults: &[("expression", DefaultValue::Str(""))],
    },
    KindDeclaration {
        kind: NodeKind::DataProcessing,
        inputs: InputPorts::Fixed(INPUT),
        outputs: OUTPUT,
        defaults: &[("operation", DefaultValue::Str("sort"))],
    },
];

/// The catalog of built-in node kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl NodeCatalog for BuiltinCatalog {
    fn declaration(&self, kind: NodeKind) -> &KindDeclaration {
        // Declarations are listed in variant order.
        &BUILTIN[kind as usize]
    }
}
