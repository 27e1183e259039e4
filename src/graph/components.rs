use std::collections::VecDeque;

use crate::graph::ConnectivityGraph;

impl ConnectivityGraph {
    /// Find all connected components as sorted vertex lists.
    ///
    /// Vertices are scanned in ascending order, so components come out ordered
    /// by their lowest vertex and the numbering is reproducible. Isolated
    /// vertices form singleton components; every vertex appears exactly once.
    pub fn find_connected_components(&self) -> Vec<Vec<usize>> {
        let mut components = Vec::new();

        let mut visited = vec![false; self.node_count()];
        for u in 0..self.node_count() {
            if visited[u] { continue }

            visited[u] = true;
            let mut component = Vec::new();
            let mut queue = VecDeque::from([u]);
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for w in self.edges(v) {
                    if !visited[w] {
                        visited[w] = true;
                        queue.push_back(w);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }
        components
    }
}
