//! Shortcut table: one precomputed record per legal turn

use h3o::Resolution;
use log::info;

use crate::model::{EdgeRecord, ShortcutRecord, TransitionRecord};
use crate::{EdgeIndex, Error};

fn edge(edges: &[EdgeRecord], index: EdgeIndex) -> Result<&EdgeRecord, Error> {
    edges.get(index).ok_or(Error::InconsistentTables(index))
}

/// Joins both edges of a turn into a shortcut record
pub fn shortcut(
    turn: TransitionRecord,
    edges: &[EdgeRecord],
    via_cell_res: Resolution,
) -> Result<ShortcutRecord, Error> {
    let incoming = edge(edges, turn.incoming_edge)?;
    let outgoing = edge(edges, turn.outgoing_edge)?;

    Ok(ShortcutRecord {
        incoming_edge: turn.incoming_edge,
        outgoing_edge: turn.outgoing_edge,
        via_edge: turn.outgoing_edge,
        cost: incoming.cost,
        via_cell: incoming.incoming_cell,
        via_cell_res: u8::from(via_cell_res),
        lca_res_incoming: incoming.lca_res,
        lca_res_outgoing: outgoing.lca_res,
        lca_res: incoming.lca_res.max(outgoing.lca_res),
    })
}

/// # Errors
///
/// Returns [`Error::InconsistentTables`] if a transition references an edge
/// that is not in `edges`. That can only happen through a bug upstream.
pub fn build_shortcuts(
    transitions: &[TransitionRecord],
    edges: &[EdgeRecord],
    via_cell_res: Resolution,
) -> Result<Vec<ShortcutRecord>, Error> {
    let shortcuts = transitions
        .iter()
        .map(|&turn| shortcut(turn, edges, via_cell_res))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Created {} shortcut records", shortcuts.len());
    Ok(shortcuts)
}
