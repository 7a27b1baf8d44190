//! Use-Case-Funktionen für Knoten im aktiven Event.
//!
//! Jede Funktion prüft zuerst alle Vorbedingungen und legt erst danach
//! genau einen Undo-Snapshot an, damit fehlgeschlagene Aktionen keine
//! leeren History-Einträge erzeugen.

use crate::app::{InsertTarget, SessionState};
use crate::core::tree;
use crate::core::{
    BranchParams, BranchSide, EditError, EditResult, Node, NodeKindTag, NodeParams, MAX_NODE_ID,
    MAX_TREE_DEPTH,
};
use std::collections::HashSet;

/// Erzeugt einen Knoten mit frischer ID, ohne ihn einzufügen.
///
/// Verändert keinen sichtbaren Zustand und legt daher keinen Snapshot an.
pub fn create_node(state: &mut SessionState, kind: NodeKindTag) -> EditResult<Node> {
    let mut node = state
        .store
        .create_node(kind)
        .ok_or_else(|| EditError::InvalidOperation("ID-Bereich erschöpft".to_string()))?;
    if kind == NodeKindTag::Branch {
        node.set_params(NodeParams::Branch(BranchParams {
            split_probability: state.options.default_split_probability,
        }));
    }
    log::debug!("Knoten {} ({:?}) erzeugt", node.id, kind);
    Ok(node)
}

/// Prüft das Ziel und ob ein Teilbaum mit `levels` Ebenen dort noch in
/// [`MAX_TREE_DEPTH`] passt.
fn check_target(state: &SessionState, target: InsertTarget, levels: usize) -> EditResult<()> {
    let first_depth = match target {
        InsertTarget::Root => 0,
        InsertTarget::Branch { parent_id, .. } => {
            let parent = state
                .store
                .find_by_id(parent_id)
                .ok_or(EditError::NotFound(parent_id))?;
            if !parent.is_branch() {
                return Err(EditError::InvalidOperation(format!(
                    "Knoten {} ist keine Verzweigung",
                    parent_id
                )));
            }
            parent_depth(state, parent_id)? + 1
        }
    };
    check_depth(first_depth, levels)
}

fn parent_depth(state: &SessionState, parent_id: u64) -> EditResult<usize> {
    tree::depth_of(&state.store.active_event().model, parent_id).ok_or(EditError::NotFound(parent_id))
}

fn check_depth(first_depth: usize, levels: usize) -> EditResult<()> {
    if first_depth + levels > MAX_TREE_DEPTH {
        return Err(EditError::InvalidOperation(format!(
            "maximale Schachtelungstiefe {} überschritten",
            MAX_TREE_DEPTH
        )));
    }
    Ok(())
}

fn insert_checked(state: &mut SessionState, node: Node, target: InsertTarget) -> EditResult<()> {
    match target {
        InsertTarget::Root => {
            state.store.insert_root(node);
            Ok(())
        }
        InsertTarget::Branch { parent_id, side } => state
            .store
            .insert_into(parent_id, side, node)
            .map_err(|_| EditError::NotFound(parent_id)),
    }
}

/// Erzeugt einen Knoten und fügt ihn am Ziel ein. Gibt die neue ID zurück.
pub fn add_node(state: &mut SessionState, kind: NodeKindTag, target: InsertTarget) -> EditResult<u64> {
    check_target(state, target, 1)?;
    if !state.store.can_allocate() {
        return Err(EditError::InvalidOperation("ID-Bereich erschöpft".to_string()));
    }

    // Snapshot VOR Mutation
    state.record_undo_snapshot("Knoten hinzufügen");
    let node = create_node(state, kind)?;
    let id = node.id;
    insert_checked(state, node, target)?;
    log::info!("Knoten {} ({:?}) eingefügt: {:?}", id, kind, target);
    Ok(id)
}

/// Fügt einen zuvor mit [`create_node`] erzeugten Knoten (samt Teilbaum) ein.
///
/// Die IDs des Teilbaums müssen untereinander und gegenüber allen Events
/// eindeutig sein und dürfen [`MAX_NODE_ID`] nicht überschreiten.
pub fn insert_node(state: &mut SessionState, node: Node, target: InsertTarget) -> EditResult<u64> {
    let subtree = std::slice::from_ref(&node);
    check_target(state, target, tree::height(subtree))?;

    let incoming = tree::collect_ids(subtree);
    if let Some(reserved) = incoming.iter().find(|&&id| id > MAX_NODE_ID) {
        return Err(EditError::InvalidOperation(format!(
            "ID {} liegt außerhalb des vergebbaren Bereichs",
            reserved
        )));
    }
    let mut live: HashSet<u64> = HashSet::new();
    for event in state.store.events() {
        live.extend(tree::collect_ids(&event.model));
    }
    let mut seen: HashSet<u64> = HashSet::with_capacity(incoming.len());
    if let Some(clash) = incoming
        .iter()
        .find(|&&id| live.contains(&id) || !seen.insert(id))
    {
        return Err(EditError::InvalidOperation(format!(
            "ID {} ist bereits vergeben",
            clash
        )));
    }

    state.record_undo_snapshot("Knoten einfügen");
    let id = node.id;
    insert_checked(state, node, target)?;
    if incoming.iter().any(|&i| i >= state.store.next_id()) {
        state.store.reconcile_id_allocator();
    }
    log::info!("Knoten {} eingefügt: {:?}", id, target);
    Ok(id)
}

/// Entfernt einen Knoten samt Teilbaum und gibt ihn zurück.
pub fn remove_node(state: &mut SessionState, id: u64) -> EditResult<Node> {
    if state.store.find_by_id(id).is_none() {
        log::debug!("Knoten {} nicht gefunden", id);
        return Err(EditError::NotFound(id));
    }

    state.record_undo_snapshot("Knoten löschen");
    let removed = state.store.remove_by_id(id).ok_or(EditError::NotFound(id))?;
    log::info!("Knoten {} gelöscht ({} inkl. Teilbaum)", id, tree::count(std::slice::from_ref(&removed)));
    Ok(removed)
}

/// Entfernt mehrere Knoten in einem einzigen Undo-Schritt.
///
/// Nicht vorhandene IDs werden übersprungen; IDs innerhalb eines bereits
/// entfernten Teilbaums ebenso. Schlägt fehl, wenn keine ID existiert.
pub fn remove_nodes(state: &mut SessionState, ids: &[u64]) -> EditResult<Vec<Node>> {
    let Some(&first) = ids.first() else {
        return Err(EditError::InvalidOperation("keine IDs angegeben".to_string()));
    };
    let existing: Vec<u64> = ids
        .iter()
        .copied()
        .filter(|&id| state.store.find_by_id(id).is_some())
        .collect();
    if existing.is_empty() {
        log::debug!("Nichts zum Löschen gefunden");
        return Err(EditError::NotFound(first));
    }

    state.record_undo_snapshot(&format!("{} Knoten löschen", existing.len()));
    let removed: Vec<Node> = existing
        .iter()
        .filter_map(|&id| state.store.remove_by_id(id))
        .collect();
    log::info!("{} Knoten gelöscht", removed.len());
    Ok(removed)
}

/// Verschiebt einen Knoten in die benannte Sequenz einer Verzweigung.
///
/// Setzt die Vorbedingung von [`tree::attach`] durch: Ein Knoten kann nicht
/// in seinen eigenen Teilbaum verschoben werden.
pub fn attach_node(
    state: &mut SessionState,
    child_id: u64,
    parent_id: u64,
    side: BranchSide,
) -> EditResult<()> {
    if state.store.find_by_id(child_id).is_none() {
        return Err(EditError::InvalidOperation(format!(
            "Knoten {} nicht gefunden",
            child_id
        )));
    }
    match state.store.find_by_id(parent_id) {
        None => {
            return Err(EditError::InvalidOperation(format!(
                "Zielknoten {} nicht gefunden",
                parent_id
            )))
        }
        Some(parent) if !parent.is_branch() => {
            return Err(EditError::InvalidOperation(format!(
                "Zielknoten {} ist keine Verzweigung",
                parent_id
            )))
        }
        Some(_) => {}
    }
    if state.store.is_in_subtree(child_id, parent_id) {
        log::warn!(
            "Knoten {} kann nicht in den eigenen Teilbaum ({}) verschoben werden",
            child_id,
            parent_id
        );
        return Err(EditError::InvalidOperation(format!(
            "Knoten {} liegt im Teilbaum von {}",
            parent_id, child_id
        )));
    }

    let child_levels = state
        .store
        .find_by_id(child_id)
        .map_or(0, |child| tree::height(std::slice::from_ref(child)));
    check_depth(parent_depth(state, parent_id)? + 1, child_levels)?;

    state.record_undo_snapshot("Knoten verschieben");
    if !state.store.attach(child_id, parent_id, side) {
        return Err(EditError::InvalidOperation(format!(
            "Verschieben {} → {} fehlgeschlagen",
            child_id, parent_id
        )));
    }
    log::info!("Knoten {} → {} ({:?})", child_id, parent_id, side);
    Ok(())
}

/// Verschiebt einen Knoten ans Ende der Wurzel-Sequenz.
pub fn move_node_to_root(state: &mut SessionState, id: u64) -> EditResult<()> {
    if state.store.find_by_id(id).is_none() {
        return Err(EditError::NotFound(id));
    }

    state.record_undo_snapshot("Knoten an Wurzel verschieben");
    state.store.move_to_root(id);
    log::info!("Knoten {} an Wurzel verschoben", id);
    Ok(())
}

/// Ersetzt die Parameter eines Knotens. Werte werden in ihren gültigen
/// Bereich geklemmt.
pub fn set_node_params(state: &mut SessionState, id: u64, params: NodeParams) -> EditResult<()> {
    let node = state.store.find_by_id(id).ok_or(EditError::NotFound(id))?;
    if node.tag() != params.tag() {
        return Err(EditError::InvalidOperation(format!(
            "Parameter {:?} passen nicht zu Knoten {} ({:?})",
            params.tag(),
            id,
            node.tag()
        )));
    }

    state.record_undo_snapshot("Parameter ändern");
    let node = state.store.find_by_id_mut(id).ok_or(EditError::NotFound(id))?;
    node.set_params(params);
    log::info!("Parameter von Knoten {} geändert", id);
    Ok(())
}

/// Setzt die Split-Wahrscheinlichkeit einer Verzweigung.
pub fn set_split_probability(state: &mut SessionState, id: u64, probability: f64) -> EditResult<()> {
    set_node_params(
        state,
        id,
        NodeParams::Branch(BranchParams {
            split_probability: probability,
        }),
    )
}
