//! Post-commit observers.

use super::PipelineGraph;

/// Observer invoked after every successful graph mutation.
///
/// Hooks see the committed graph and cannot veto the change.
pub trait CommitHook: Send {
    /// Called once per committed mutation.
    fn on_commit(&mut self, graph: &PipelineGraph);
}

impl<F> CommitHook for F
where
    F: FnMut(&PipelineGraph) + Send,
{
    fn on_commit(&mut self, graph: &PipelineGraph) {
        self(graph)
    }
}
