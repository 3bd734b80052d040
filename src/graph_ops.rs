use petgraph::graph::NodeIndex;

use crate::mol::Mol;

/// Connected fragments, each sorted by atom index, ordered by lowest atom.
pub fn connected_components<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let mut visited = vec![false; mol.atom_count()];
    let mut components = Vec::new();
    for node in mol.atoms() {
        if visited[node.index()] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if std::mem::replace(&mut visited[current.index()], true) {
                continue;
            }
            component.push(current);
            stack.extend(mol.neighbors(current).filter(|nb| !visited[nb.index()]));
        }
        component.sort();
        components.push(component);
    }
    components
}
