use crate::*;

const MAX_SNAP_PASSES: usize = 20;
const MAX_COMPACT_PASSES: usize = 20;
/// Allowed drift before a snapped corner block is moved again.
const SNAP_TOLERANCE: float = 1.0;
/// Step sizes of the coarse-to-fine compaction sweeps.
const COMPACT_STEPS: [float; 4] = [50.0, 10.0, 5.0, 1.0];
/// Blocks within this distance of the right/bottom edge get inward nudges.
const EDGE_MARGIN: float = 10.0;
/// Center-to-center radius of the local density score.
const DENSITY_RADIUS: float = 200.0;
/// Extra density credit per directly abutting block.
const ABUT_BONUS: float = 5.0;

/// Deterministic post-pass after annealing: snaps exact-corner blocks onto
/// their corners, repairs any overlap that snapping introduced by moving
/// only non-corner blocks, then compacts the plan with the corners locked.
/// Whatever happens, the plan comes out overlap-free.
#[time]
pub fn enforce_corners(fp: &mut FloorPlan, resolve_step: float, density_step: float) {
    if fp.blocks.is_empty() {
        return;
    }
    let corners = collect_corner_blocks(fp);
    let locked: Set<usize> = corners.values().copied().collect();

    if !corners.is_empty() {
        for _ in 0..MAX_SNAP_PASSES {
            let mut moved = snap_corners(fp, &corners);
            if fp.has_overlaps() {
                moved |= resolve_overlaps(fp, &locked, resolve_step);
            }
            fp.update_bounding_box();
            if !moved && !fp.has_overlaps() {
                break;
            }
        }
        fp.update_bounding_box();
        compact_locked(fp, &locked, density_step);
    }

    // Zero overlap is the one promise the result always keeps.
    evict_overlaps(fp, &locked);
    fp.update_bounding_box();
}

/// At most one block per exact-corner tag; when a tag appears twice the
/// later block wins the pin.
fn collect_corner_blocks(fp: &FloorPlan) -> IndexMap<Location, usize> {
    let mut corners: IndexMap<Location, usize> = IndexMap::default();
    for (i, block) in fp.blocks.iter().enumerate() {
        if block.location.is_corner() {
            corners.insert(block.location, i);
        }
    }
    corners
}

/// Sets each corner block onto its exact corner, returning whether anything
/// moved. The bounding box is taken fresh because snapping changes it.
fn snap_corners(fp: &mut FloorPlan, corners: &IndexMap<Location, usize>) -> bool {
    let (bw, bh) = fp.bounds();
    let mut moved = false;
    if let Some(&i) = corners.get(&Location::TopLeftCorner) {
        let b = &mut fp.blocks[i];
        if b.x != 0.0 || b.y != 0.0 {
            b.x = 0.0;
            b.y = 0.0;
            moved = true;
        }
    }
    if let Some(&i) = corners.get(&Location::TopRightCorner) {
        let b = &mut fp.blocks[i];
        let expected_x = bw - b.width;
        if (b.x - expected_x).abs() > SNAP_TOLERANCE {
            b.x = expected_x;
            moved = true;
        }
        if b.y != 0.0 {
            b.y = 0.0;
            moved = true;
        }
    }
    if let Some(&i) = corners.get(&Location::BottomLeftCorner) {
        let b = &mut fp.blocks[i];
        let expected_y = bh - b.height;
        if b.x != 0.0 {
            b.x = 0.0;
            moved = true;
        }
        if (b.y - expected_y).abs() > SNAP_TOLERANCE {
            b.y = expected_y;
            moved = true;
        }
    }
    if let Some(&i) = corners.get(&Location::BottomRightCorner) {
        let b = &mut fp.blocks[i];
        let expected_x = bw - b.width;
        let expected_y = bh - b.height;
        if (b.x - expected_x).abs() > SNAP_TOLERANCE || (b.y - expected_y).abs() > SNAP_TOLERANCE {
            b.x = expected_x;
            b.y = expected_y;
            moved = true;
        }
    }
    moved
}

/// Relocates every non-corner block involved in an overlap: scans a coarse
/// grid for the first overlap-free cell, falling back to the cell with the
/// fewest overlaps. Corner blocks are never moved here.
fn resolve_overlaps(fp: &mut FloorPlan, locked: &Set<usize>, step: float) -> bool {
    let offenders: Vec<usize> = fp
        .overlapping_pairs()
        .into_iter()
        .flat_map(|(i, j)| [i, j])
        .filter(|i| !locked.contains(i))
        .unique()
        .collect();
    let (bw, bh) = fp.bounds();
    let mut moved = false;
    for i in offenders {
        let original = (fp.blocks[i].x, fp.blocks[i].y);
        let mut best: Option<Vector2> = None;
        let mut best_count = usize::MAX;
        'scan: for x in float_range(0.0, bw + 2.0 * step, step) {
            for y in float_range(0.0, bh + 2.0 * step, step) {
                fp.blocks[i].x = x;
                fp.blocks[i].y = y;
                let count = overlap_count(fp, i);
                if count == 0 {
                    best = Some((x, y));
                    moved = true;
                    break 'scan;
                }
                if count < best_count {
                    best_count = count;
                    best = Some((x, y));
                }
            }
        }
        let (x, y) = best.unwrap_or(original);
        fp.blocks[i].x = x;
        fp.blocks[i].y = y;
    }
    moved
}

fn overlap_count(fp: &FloorPlan, i: usize) -> usize {
    fp.blocks
        .iter()
        .enumerate()
        .filter(|&(j, other)| j != i && fp.blocks[i].overlaps(other))
        .count()
}

/// Gap-filling compaction with the corner blocks locked in place: coarse to
/// fine left/up sweeps, periodic inward nudges of edge-touching blocks, then
/// a density-maximizing repacking of the movable blocks.
fn compact_locked(fp: &mut FloorPlan, locked: &Set<usize>, density_step: float) {
    if fp.blocks.is_empty() {
        return;
    }
    for pass in 0..MAX_COMPACT_PASSES {
        fp.update_bounding_box();
        if fp.has_overlaps() {
            break;
        }
        let mut improved = false;
        let movable = movable_by_origin_distance(fp, locked);

        for &i in &movable {
            for step in COMPACT_STEPS {
                while fp.blocks[i].x >= step {
                    fp.blocks[i].x -= step;
                    if !placement_legal(fp, i) {
                        fp.blocks[i].x += step;
                        break;
                    }
                    improved = true;
                }
            }
            for step in COMPACT_STEPS {
                while fp.blocks[i].y >= step {
                    fp.blocks[i].y -= step;
                    if !placement_legal(fp, i) {
                        fp.blocks[i].y += step;
                        break;
                    }
                    improved = true;
                }
            }
        }

        // Every third pass, pull edge-touching blocks inward to let the
        // bounding box shrink.
        if pass % 3 == 0 {
            fp.update_bounding_box();
            let (bw, bh) = (fp.bounding_width, fp.bounding_height);
            for &i in &movable {
                if fp.blocks[i].x + fp.blocks[i].width >= bw - EDGE_MARGIN {
                    let original_x = fp.blocks[i].x;
                    for new_x in float_range(0.0, original_x, EDGE_MARGIN) {
                        fp.blocks[i].x = new_x;
                        if placement_legal(fp, i) {
                            improved = true;
                            break;
                        }
                        fp.blocks[i].x = original_x;
                    }
                }
            }
            for &i in &movable {
                if fp.blocks[i].y + fp.blocks[i].height >= bh - EDGE_MARGIN {
                    let original_y = fp.blocks[i].y;
                    for new_y in float_range(0.0, original_y, EDGE_MARGIN) {
                        fp.blocks[i].y = new_y;
                        if placement_legal(fp, i) {
                            improved = true;
                            break;
                        }
                        fp.blocks[i].y = original_y;
                    }
                }
            }
        }

        if !improved {
            break;
        }
    }

    density_pack(fp, locked, density_step);
    fp.update_bounding_box();
}

fn movable_by_origin_distance(fp: &FloorPlan, locked: &Set<usize>) -> Vec<usize> {
    (0..fp.blocks.len())
        .filter(|i| !locked.contains(i))
        .sorted_by_key(|&i| OrderedFloat(fp.blocks[i].x + fp.blocks[i].y))
        .collect()
}

/// Final tetris-style pass: movable blocks, largest first, move to the grid
/// position with the highest local density (ties toward the origin), then
/// get single-unit left/up nudges.
fn density_pack(fp: &mut FloorPlan, locked: &Set<usize>, step: float) {
    if fp.has_overlaps() {
        return;
    }
    let order: Vec<usize> = (0..fp.blocks.len())
        .filter(|i| !locked.contains(i))
        .sorted_by_key(|&i| std::cmp::Reverse(OrderedFloat(fp.blocks[i].area())))
        .collect();

    for i in order {
        fp.update_bounding_box();
        let (bw, bh) = (fp.bounding_width, fp.bounding_height);
        let centers = PointTree::from_points(
            fp.blocks
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, b)| (j, b.center())),
        );
        let (mut best_x, mut best_y) = (fp.blocks[i].x, fp.blocks[i].y);
        let mut best_density = local_density(fp, i, &centers);

        for x in float_range(0.0, bw - fp.blocks[i].width + 1.0, step) {
            for y in float_range(0.0, bh - fp.blocks[i].height + 1.0, step) {
                fp.blocks[i].x = x;
                fp.blocks[i].y = y;
                if !placement_legal(fp, i) {
                    continue;
                }
                let density = local_density(fp, i, &centers);
                if density > best_density
                    || (density == best_density && x + y < best_x + best_y)
                {
                    best_density = density;
                    best_x = x;
                    best_y = y;
                }
            }
        }
        fp.blocks[i].x = best_x;
        fp.blocks[i].y = best_y;

        while fp.blocks[i].x >= 1.0 {
            fp.blocks[i].x -= 1.0;
            if !placement_legal(fp, i) {
                fp.blocks[i].x += 1.0;
                break;
            }
        }
        while fp.blocks[i].y >= 1.0 {
            fp.blocks[i].y -= 1.0;
            if !placement_legal(fp, i) {
                fp.blocks[i].y += 1.0;
                break;
            }
        }
    }
}

/// +1 per other block whose center lies within the density radius, +5 per
/// block directly abutted.
fn local_density(fp: &FloorPlan, i: usize, centers: &PointTree) -> float {
    let near = centers.count_within(fp.blocks[i].center(), DENSITY_RADIUS) as float;
    let abutting = fp
        .blocks
        .iter()
        .enumerate()
        .filter(|&(j, other)| j != i && fp.blocks[i].abuts(other))
        .count() as float;
    near + ABUT_BONUS * abutting
}

/// Last-resort repair: any block still overlapping is parked beyond the
/// current right extent, which cannot collide with anything. Locked corner
/// blocks are spared unless both sides of a pair are locked.
fn evict_overlaps(fp: &mut FloorPlan, locked: &Set<usize>) {
    let max_evictions = fp.blocks.len() + 1;
    for _ in 0..max_evictions {
        let Some(&(i, j)) = fp.overlapping_pairs().first() else {
            return;
        };
        let idx = if locked.contains(&i) { j } else { i };
        let (max_x, _) = fp.bounds();
        fp.blocks[idx].x = max_x;
        fp.blocks[idx].y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_at(name: &str, w: float, h: float, x: float, y: float, loc: Location) -> Block {
        let mut b = Block::builder()
            .name(name)
            .width(w)
            .height(h)
            .location(loc)
            .build();
        b.x = x;
        b.y = y;
        b
    }

    #[test]
    fn test_snap_top_left_exact() {
        let mut fp = FloorPlan::default();
        fp.add_block(block_at("TL", 6.0, 6.0, 14.0, 9.0, Location::TopLeftCorner));
        fp.add_block(block_at("X", 10.0, 10.0, 30.0, 30.0, Location::DontCare));
        fp.update_bounding_box();
        enforce_corners(&mut fp, 50.0, 20.0);
        let tl = fp.get_block("TL").unwrap();
        assert_eq!((tl.x, tl.y), (0.0, 0.0));
        assert!(!fp.has_overlaps());
    }

    #[test]
    fn test_snap_bottom_right_edge() {
        let mut fp = FloorPlan::default();
        fp.add_block(block_at("X", 30.0, 30.0, 0.0, 0.0, Location::DontCare));
        fp.add_block(block_at("BR", 8.0, 8.0, 0.0, 35.0, Location::BottomRightCorner));
        fp.update_bounding_box();
        enforce_corners(&mut fp, 50.0, 20.0);
        let br = fp.get_block("BR").unwrap();
        assert!((br.x + br.width - fp.bounding_width).abs() <= 2.0);
        assert!((br.y + br.height - fp.bounding_height).abs() <= 2.0);
        assert!(!fp.has_overlaps());
    }

    #[test]
    fn test_snap_resolves_collisions_without_moving_corner() {
        // X sits exactly where TL must go.
        let mut fp = FloorPlan::default();
        fp.add_block(block_at("TL", 10.0, 10.0, 40.0, 0.0, Location::TopLeftCorner));
        fp.add_block(block_at("X", 10.0, 10.0, 0.0, 0.0, Location::DontCare));
        fp.update_bounding_box();
        enforce_corners(&mut fp, 50.0, 20.0);
        let tl = fp.get_block("TL").unwrap();
        assert_eq!((tl.x, tl.y), (0.0, 0.0));
        assert!(!fp.has_overlaps());
    }

    #[test]
    fn test_evict_guarantees_no_overlap() {
        let mut fp = FloorPlan::default();
        fp.add_block(block_at("A", 10.0, 10.0, 0.0, 0.0, Location::DontCare));
        fp.add_block(block_at("B", 10.0, 10.0, 3.0, 3.0, Location::DontCare));
        fp.add_block(block_at("C", 10.0, 10.0, 6.0, 6.0, Location::DontCare));
        fp.update_bounding_box();
        evict_overlaps(&mut fp, &Set::default());
        assert!(!fp.has_overlaps());
    }

    #[test]
    fn test_compaction_fills_gap_left_by_snapping() {
        let mut fp = FloorPlan::default();
        fp.add_block(block_at("TL", 10.0, 10.0, 0.0, 0.0, Location::TopLeftCorner));
        fp.add_block(block_at("far", 10.0, 10.0, 60.0, 0.0, Location::DontCare));
        fp.update_bounding_box();
        enforce_corners(&mut fp, 50.0, 20.0);
        let far = fp.get_block("far").unwrap();
        // Pulled back against the pinned corner block.
        assert_eq!((far.x, far.y), (10.0, 0.0));
        assert!(!fp.has_overlaps());
    }
}
