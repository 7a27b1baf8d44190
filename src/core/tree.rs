//! Baum-Operationen über einer Wurzel-Sequenz.
//!
//! Alle Suchen laufen depth-first: Geschwister in Sequenz-Reihenfolge,
//! Success-Teilbaum vor Failure-Teilbaum. Da IDs eindeutig sind, gibt es
//! keinen weiteren Tie-Break.

use super::node::{BranchSide, Node, NodeKind};

/// Maximale Schachtelungstiefe eines Baums (Wurzel-Ebene zählt als 1).
///
/// Begrenzt die Rekursion beim Traversieren und beim JSON-Import.
pub const MAX_TREE_DEPTH: usize = 100;

/// Position eines Knotens in seinem Baum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLocation {
    /// Elternknoten und Seite, `None` für die Wurzel-Sequenz
    pub parent: Option<(u64, BranchSide)>,
    /// Index innerhalb der enthaltenden Sequenz
    pub index: usize,
}

/// Sucht einen Knoten per ID.
pub fn find(nodes: &[Node], id: u64) -> Option<&Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children() {
            if let Some(found) = find(&children.on_success, id) {
                return Some(found);
            }
            if let Some(found) = find(&children.on_failure, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Sucht einen Knoten per ID (mutable).
pub fn find_mut(nodes: &mut [Node], id: u64) -> Option<&mut Node> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let NodeKind::Branch { children, .. } = &mut node.kind {
            if let Some(found) = find_mut(&mut children.on_success, id) {
                return Some(found);
            }
            if let Some(found) = find_mut(&mut children.on_failure, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Ermittelt die Position eines Knotens.
pub fn locate(nodes: &[Node], id: u64) -> Option<NodeLocation> {
    locate_in(nodes, id, None)
}

fn locate_in(nodes: &[Node], id: u64, parent: Option<(u64, BranchSide)>) -> Option<NodeLocation> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id == id {
            return Some(NodeLocation { parent, index });
        }
        if let Some(children) = node.children() {
            if let Some(found) =
                locate_in(&children.on_success, id, Some((node.id, BranchSide::Success)))
            {
                return Some(found);
            }
            if let Some(found) =
                locate_in(&children.on_failure, id, Some((node.id, BranchSide::Failure)))
            {
                return Some(found);
            }
        }
    }
    None
}

/// Löst einen Knoten samt Teilbaum aus der Sequenz, die ihn enthält.
pub fn remove(nodes: &mut Vec<Node>, id: u64) -> Option<Node> {
    for index in 0..nodes.len() {
        if nodes[index].id == id {
            return Some(nodes.remove(index));
        }
        if let NodeKind::Branch { children, .. } = &mut nodes[index].kind {
            if let Some(removed) = remove(&mut children.on_success, id) {
                return Some(removed);
            }
            if let Some(removed) = remove(&mut children.on_failure, id) {
                return Some(removed);
            }
        }
    }
    None
}

/// Fügt einen Knoten an einer Position ein. Der Index wird auf die
/// Sequenzlänge begrenzt. Gibt den Knoten zurück, wenn der Elternknoten fehlt.
pub fn insert_at(nodes: &mut Vec<Node>, location: NodeLocation, node: Node) -> Result<(), Node> {
    let target = match location.parent {
        None => nodes,
        Some((parent_id, side)) => match find_mut(nodes, parent_id).and_then(|p| p.branch_mut(side)) {
            Some(seq) => seq,
            None => return Err(node),
        },
    };
    let index = location.index.min(target.len());
    target.insert(index, node);
    Ok(())
}

/// Hängt einen Knoten an die benannte Sequenz eines Elternknotens an.
///
/// Schlägt fehl, wenn der Elternknoten fehlt oder keine Verzweigung ist,
/// oder wenn der Kindknoten fehlt. Der Kindknoten wird zuerst aus seiner
/// bisherigen Position gelöst und erst danach angehängt, nie kopiert.
///
/// Vorbedingung für Aufrufer: `parent_id` darf nicht im Teilbaum von
/// `child_id` liegen (siehe [`is_in_subtree`]). Hier findet keine
/// Abstammungsprüfung statt. Wird die Vorbedingung verletzt, ist der
/// Elternknoten nach dem Lösen nicht mehr erreichbar; der Teilbaum wird
/// dann an seine alte Position zurückgesetzt und `false` geliefert.
pub fn attach(nodes: &mut Vec<Node>, child_id: u64, parent_id: u64, side: BranchSide) -> bool {
    if !find(nodes, parent_id).is_some_and(Node::is_branch) {
        return false;
    }
    let Some(origin) = locate(nodes, child_id) else {
        return false;
    };
    let Some(child) = remove(nodes, child_id) else {
        return false;
    };

    match find_mut(nodes, parent_id).and_then(|p| p.branch_mut(side)) {
        Some(seq) => {
            seq.push(child);
            true
        }
        None => {
            log::warn!(
                "Attach {} → {} verletzt die Abstammungs-Vorbedingung, Teilbaum wird zurückgesetzt",
                child_id,
                parent_id
            );
            if let Err(child) = insert_at(nodes, origin, child) {
                // Ursprünglicher Elternknoten liegt außerhalb des gelösten Teilbaums
                // und existiert daher weiterhin; dieser Zweig ist nur Absicherung.
                nodes.push(child);
            }
            false
        }
    }
}

/// Gibt `true` zurück, wenn `id` gleich `root_id` ist oder im Teilbaum von
/// `root_id` liegt.
pub fn is_in_subtree(nodes: &[Node], root_id: u64, id: u64) -> bool {
    let Some(root) = find(nodes, root_id) else {
        return false;
    };
    if root.id == id {
        return true;
    }
    root.children().is_some_and(|children| {
        find(&children.on_success, id).is_some() || find(&children.on_failure, id).is_some()
    })
}

/// Besucht alle Knoten in Pre-Order mit ihrer Tiefe (Wurzeln: 0).
pub fn walk_preorder<'a>(nodes: &'a [Node], visit: &mut impl FnMut(&'a Node, usize)) {
    walk_at_depth(nodes, 0, visit);
}

fn walk_at_depth<'a>(nodes: &'a [Node], depth: usize, visit: &mut impl FnMut(&'a Node, usize)) {
    for node in nodes {
        visit(node, depth);
        if let Some(children) = node.children() {
            walk_at_depth(&children.on_success, depth + 1, visit);
            walk_at_depth(&children.on_failure, depth + 1, visit);
        }
    }
}

/// Alle IDs in Pre-Order.
pub fn collect_ids(nodes: &[Node]) -> Vec<u64> {
    let mut ids = Vec::new();
    walk_preorder(nodes, &mut |node, _| ids.push(node.id));
    ids
}

/// Größte vorkommende ID.
pub fn max_id(nodes: &[Node]) -> Option<u64> {
    let mut max: Option<u64> = None;
    walk_preorder(nodes, &mut |node, _| {
        max = Some(max.map_or(node.id, |m| m.max(node.id)));
    });
    max
}

/// Anzahl aller Knoten.
pub fn count(nodes: &[Node]) -> usize {
    let mut total = 0;
    walk_preorder(nodes, &mut |_, _| total += 1);
    total
}

/// Tiefe eines Knotens (Wurzeln: 0).
pub fn depth_of(nodes: &[Node], id: u64) -> Option<usize> {
    let mut found = None;
    walk_preorder(nodes, &mut |node, depth| {
        if found.is_none() && node.id == id {
            found = Some(depth);
        }
    });
    found
}

/// Anzahl der Ebenen (leere Sequenz: 0, nur Wurzeln: 1).
pub fn height(nodes: &[Node]) -> usize {
    let mut levels = 0;
    walk_preorder(nodes, &mut |_, depth| levels = levels.max(depth + 1));
    levels
}
