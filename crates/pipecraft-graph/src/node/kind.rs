//! Node kinds and palette categories.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// The fixed set of node kinds a pipeline can contain.
///
/// The wire name (`type` in documents) is the camelCase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum NodeKind {
    /// Pipeline entry point.
    Input,
    /// Pipeline exit point.
    Output,
    /// Free text template with `[[variable]]` placeholders.
    Text,
    /// Language model invocation.
    Llm,
    /// String transformation.
    Transform,
    /// Conditional pass/reject split.
    Filter,
    /// Combines two inputs.
    Merge,
    /// Boolean branch.
    Condition,
    /// Collection processing.
    DataProcessing,
}

impl NodeKind {
    /// Returns the wire name used in documents.
    #[inline]
    pub fn wire_name(self) -> &'static str {
        self.into()
    }

    /// Returns the human-readable title shown in the palette.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
            Self::Text => "Text",
            Self::Llm => "LLM",
            Self::Transform => "Transform",
            Self::Filter => "Filter",
            Self::Merge => "Merge",
            Self::Condition => "Condition",
            Self::DataProcessing => "Data Processing",
        }
    }

    /// Returns the palette category.
    pub const fn category(self) -> NodeCategory {
        match self {
            Self::Input | Self::Output | Self::Text => NodeCategory::Basic,
            Self::Llm => NodeCategory::Ai,
            Self::Transform
            | Self::Filter
            | Self::Merge
            | Self::Condition
            | Self::DataProcessing => NodeCategory::Processing,
        }
    }

    /// Returns the label given to freshly created nodes.
    pub fn default_label(self) -> String {
        format!("{} node", self.wire_name())
    }
}

/// Palette grouping for node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Inputs, outputs and text.
    Basic,
    /// Model-backed nodes.
    #[strum(serialize = "AI")]
    Ai,
    /// Data processing nodes.
    Processing,
}
