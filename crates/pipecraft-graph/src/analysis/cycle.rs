//! Cycle detection over the structural adjacency of a pipeline.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;

/// Visitation state of a vertex during depth-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Finished,
}

/// Node-level adjacency built from a pipeline's edges.
///
/// Ports are ignored and parallel edges collapse into one. Edges whose
/// endpoints are not declared vertices are dropped.
#[derive(Debug, Clone, Default)]
pub struct Adjacency<'a> {
    graph: DiGraphMap<&'a str, ()>,
}

impl<'a> Adjacency<'a> {
    /// Builds the adjacency from vertex ids and `(source, target)` pairs.
    pub fn new<N, E>(vertices: N, edges: E) -> Self
    where
        N: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut graph = DiGraphMap::new();
        for vertex in vertices {
            graph.add_node(vertex);
        }
        for (source, target) in edges {
            if graph.contains_node(source) && graph.contains_node(target) {
                graph.add_edge(source, target, ());
            }
        }
        Self { graph }
    }

    /// Returns the number of distinct structural edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns whether the adjacency has no directed cycle.
    #[inline]
    pub fn is_acyclic(&self) -> bool {
        self.find_cycle().is_none()
    }

    /// Returns the vertices of one directed cycle, if any, in path order.
    ///
    /// Uses an iterative three-color depth-first search, so arbitrarily
    /// deep pipelines cannot overflow the call stack.
    pub fn find_cycle(&self) -> Option<Vec<&'a str>> {
        let mut marks: HashMap<&'a str, Mark> = self
            .graph
            .nodes()
            .map(|vertex| (vertex, Mark::Unvisited))
            .collect();

        for root in self.graph.nodes() {
            if marks.get(root) != Some(&Mark::Unvisited) {
                continue;
            }

            let mut path: Vec<&'a str> = vec![root];
            let mut pending = vec![self.successors(root)];
            marks.insert(root, Mark::InProgress);

            while let Some(successors) = pending.last_mut() {
                match successors.next() {
                    Some(next) => match marks.get(next).copied().unwrap_or(Mark::Unvisited) {
                        Mark::InProgress => {
                            let start = path.iter().position(|vertex| *vertex == next)?;
                            return Some(path[start..].to_vec());
                        }
                        Mark::Unvisited => {
                            marks.insert(next, Mark::InProgress);
                            path.push(next);
                            pending.push(self.successors(next));
                        }
                        Mark::Finished => {}
                    },
                    None => {
                        pending.pop();
                        if let Some(done) = path.pop() {
                            marks.insert(done, Mark::Finished);
                        }
                    }
                }
            }
        }

        None
    }

    fn successors(&self, vertex: &'a str) -> std::vec::IntoIter<&'a str> {
        self.graph
            .neighbors_directed(vertex, Direction::Outgoing)
            .collect::<Vec<_>>()
            .into_iter()
    }
}
