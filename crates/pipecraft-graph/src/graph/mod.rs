//! Pipeline graph, mutation commands and connection rules.
//!
//! The [`GraphStore`] is the single owner of a [`PipelineGraph`]. Every
//! change goes through it so ids, ports and edges stay consistent.

mod command;
mod edge;
mod hook;
mod pipeline;
mod store;
pub mod validate;

pub use self::command::{CommandOutcome, GraphCommand, Removal};
pub use self::edge::{Connection, Edge, EdgeId};
pub use self::hook::CommitHook;
pub use self::pipeline::PipelineGraph;
pub use self::store::GraphStore;
pub use self::validate::ConnectionRejection;

#[cfg(test)]
mod tests;
