use crate::*;

/// Relative weights of the swap / rotate / shift / repack operators.
const OPERATOR_WEIGHTS: [u32; 4] = [20, 30, 30, 20];

/// Produces a candidate neighboring solution: deep-copies the plan, applies
/// one randomly chosen operator and compacts the result. The input plan is
/// never touched.
pub fn generate_neighbor(current: &FloorPlan, rng: &mut StdRng) -> FloorPlan {
    let mut fp = current.clone();
    if fp.blocks.is_empty() {
        return fp;
    }
    let operator = WeightedIndex::new(OPERATOR_WEIGHTS).unwrap().sample(rng);
    match operator {
        0 => swap_positions(&mut fp, rng),
        1 => rotate_blocks(&mut fp, rng),
        2 => shift_block(&mut fp, rng),
        _ => repack(&mut fp, rng),
    }
    compact(&mut fp);
    fp
}

/// Indices of blocks with no abutment request; operators prefer these so a
/// satisfied neighbor constraint is not broken gratuitously.
fn unconstrained(fp: &FloorPlan) -> Vec<usize> {
    fp.blocks
        .iter()
        .positions(|b| b.neighbor.is_none())
        .collect()
}

fn swap_positions(fp: &mut FloorPlan, rng: &mut StdRng) {
    if fp.blocks.len() < 2 {
        return;
    }
    let free = unconstrained(fp);
    let (a, b) = if free.len() >= 2 {
        let picks = rand::seq::index::sample(rng, free.len(), 2);
        (free[picks.index(0)], free[picks.index(1)])
    } else {
        let picks = rand::seq::index::sample(rng, fp.blocks.len(), 2);
        (picks.index(0), picks.index(1))
    };
    let (ax, ay) = (fp.blocks[a].x, fp.blocks[a].y);
    let (bx, by) = (fp.blocks[b].x, fp.blocks[b].y);
    fp.blocks[a].x = bx;
    fp.blocks[a].y = by;
    fp.blocks[b].x = ax;
    fp.blocks[b].y = ay;
}

fn rotate_blocks(fp: &mut FloorPlan, rng: &mut StdRng) {
    let mut pool = unconstrained(fp);
    if pool.is_empty() {
        pool = (0..fp.blocks.len()).collect();
    }
    let count = rng.gen_range(1..=pool.len().min(3));
    let picks = rand::seq::index::sample(rng, pool.len(), count);
    for p in picks.iter() {
        fp.blocks[pool[p]].rotate();
    }
}

/// Relocates one block by a random offset bounded by half the largest
/// bounding dimension. Offsets stay integral so integral inputs keep exact
/// abutment reachable. A declared neighbor is dragged by the same delta.
fn shift_block(fp: &mut FloorPlan, rng: &mut StdRng) {
    let pool = {
        let free = unconstrained(fp);
        if free.is_empty() {
            (0..fp.blocks.len()).collect()
        } else {
            free
        }
    };
    let idx = pool[rng.gen_range(0..pool.len())];
    fp.update_bounding_box();
    let half = ((fp.bounding_width.max(fp.bounding_height) * 0.5) as i64).max(1);
    let dx = rng.gen_range(-half..=half) as float;
    let dy = rng.gen_range(-half..=half) as float;
    let (old_x, old_y) = (fp.blocks[idx].x, fp.blocks[idx].y);
    let new_x = (old_x + dx).max(0.0);
    let new_y = (old_y + dy).max(0.0);
    fp.blocks[idx].x = new_x;
    fp.blocks[idx].y = new_y;

    if let Some(wanted) = fp.blocks[idx].neighbor.clone() {
        if let Some(j) = fp.blocks.iter().position(|b| b.name == wanted) {
            fp.blocks[j].x = (fp.blocks[j].x + (new_x - old_x)).max(0.0);
            fp.blocks[j].y = (fp.blocks[j].y + (new_y - old_y)).max(0.0);
        }
    }
}

/// Shuffles the block order and lays everything out again in greedy rows,
/// targeting a row width derived from the total block area and the current
/// aspect ratio.
fn repack(fp: &mut FloorPlan, rng: &mut StdRng) {
    fp.blocks.shuffle(rng);
    fp.update_bounding_box();
    let total_area: float = fp.blocks.iter().map(Block::area).sum();
    let target_width =
        (total_area * fp.bounding_width / fp.bounding_height.max(1.0)).sqrt();

    let (mut current_x, mut current_y) = (0.0, 0.0);
    let mut row_height = 0.0;
    for block in &mut fp.blocks {
        if current_x > target_width && current_x > 0.0 {
            current_x = 0.0;
            current_y += row_height;
            row_height = 0.0;
        }
        block.x = current_x;
        block.y = current_y;
        current_x += block.width;
        row_height = row_height.max(block.height);
    }
}
