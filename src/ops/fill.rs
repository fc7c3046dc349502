// ============================================================================
// FLOOD FILL - 4-connected region replacement on the cell grid
// ============================================================================

use crate::canvas::{CanvasState, CellColor, CellPos, GRID_HEIGHT, GRID_WIDTH};
use crate::components::history::CellChange;

/// Replace the 4-connected region of `target`-colored cells containing `start`
/// with `new_color`. Returns one `CellChange` per repainted cell, in visiting order.
///
/// Visiting order matches a recursive fill that descends down, right, up, left:
/// the DFS stack receives neighbors in reverse so `down` is popped first, and a
/// cell is tested against `target` only when popped. Filling a region with its
/// own color changes nothing and returns an empty list.
pub fn flood_fill(
    canvas: &mut CanvasState,
    start: CellPos,
    target: Option<CellColor>,
    new_color: CellColor,
) -> Vec<CellChange> {
    let mut changes = Vec::new();
    if target == Some(new_color) || !canvas.contains(start) {
        return changes;
    }

    // visited doubles as the "already repainted" mask
    let mut visited = vec![false; (GRID_WIDTH * GRID_HEIGHT) as usize];
    let index = |pos: CellPos| (pos.row() * GRID_WIDTH + pos.col()) as usize;

    let mut stack: Vec<CellPos> = Vec::with_capacity(64);
    stack.push(start);

    while let Some(pos) = stack.pop() {
        let idx = index(pos);
        if visited[idx] || canvas.sample_color(pos) != target {
            continue;
        }
        visited[idx] = true;

        canvas.paint_cell(pos, new_color);
        changes.push(CellChange::new(pos, target));

        let neighbors: Vec<CellPos> = pos.neighbors().collect();
        for next in neighbors.into_iter().rev() {
            if !visited[index(next)] {
                stack.push(next);
            }
        }
    }

    changes
}
