use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    CornersFirst,
    RowBased,
    ColumnBased,
}

/// Builds the initial solution: runs the three greedy strategies over the
/// same groups, keeps the smallest-area plan (stable tie-break by strategy
/// order) and compacts it.
#[time]
pub fn initial_solution(groups: &[Vec<Block>], quadrant_step: float) -> FloorPlan {
    let strategies = [Strategy::CornersFirst, Strategy::RowBased, Strategy::ColumnBased];
    let mut best = strategies
        .into_par_iter()
        .enumerate()
        .map(|(order, strategy)| {
            let fp = place_with_strategy(groups.to_vec(), strategy, quadrant_step);
            (order, fp)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .min_by_key(|(order, fp)| (OrderedFloat(fp.area()), *order))
        .map(|(_, fp)| fp)
        .unwrap_or_default();
    compact(&mut best);
    best
}

pub fn place_with_strategy(groups: Vec<Vec<Block>>, strategy: Strategy, quadrant_step: float) -> FloorPlan {
    let mut fp = FloorPlan::default();
    match strategy {
        Strategy::CornersFirst => place_corners_first(&mut fp, groups, quadrant_step),
        Strategy::RowBased => place_row_based(&mut fp, groups),
        Strategy::ColumnBased => place_column_based(&mut fp, groups),
    }
    fp.update_bounding_box();
    fp
}

fn group_width(group: &[Block]) -> float {
    if group.len() > 1 {
        group.iter().map(|b| b.width).sum()
    } else {
        group[0].width
    }
}
fn group_height(group: &[Block]) -> float {
    group
        .iter()
        .map(|b| OrderedFloat(b.height))
        .max()
        .map_or(0.0, |m| m.0)
}
fn max_width(group: &[Block]) -> float {
    group
        .iter()
        .map(|b| OrderedFloat(b.width))
        .max()
        .map_or(0.0, |m| m.0)
}

/// Location-preference-first strategy. Exact-corner groups go down first at
/// provisional positions and are back-solved to their edges once the
/// bounding box is known; quadrant, center and don't-care groups follow.
fn place_corners_first(fp: &mut FloorPlan, groups: Vec<Vec<Block>>, quadrant_step: float) {
    let mut buckets: IndexMap<Location, Vec<Vec<Block>>> = IndexMap::default();
    for group in groups {
        buckets.entry(group[0].location).or_default().push(group);
    }

    let mut current_y = 0.0;
    for group in buckets.shift_remove(&Location::TopLeftCorner).unwrap_or_default() {
        let h = group_height(&group);
        place_group_at(group, 0.0, current_y, fp);
        current_y += h;
    }

    // Right/bottom corner groups stack at a provisional origin; remember the
    // block ranges so they can be shifted to the true edge afterwards.
    let mut trc_ranges = Vec::new();
    current_y = 0.0;
    for group in buckets.shift_remove(&Location::TopRightCorner).unwrap_or_default() {
        let (w, h) = (max_width(&group), group_height(&group));
        let start = fp.blocks.len();
        place_group_at(group, 0.0, current_y, fp);
        trc_ranges.push((start..fp.blocks.len(), w));
        current_y += h;
    }
    let mut blc_ranges = Vec::new();
    let mut current_x = 0.0;
    for group in buckets.shift_remove(&Location::BottomLeftCorner).unwrap_or_default() {
        let (w, h) = (max_width(&group), group_height(&group));
        let start = fp.blocks.len();
        place_group_at(group, current_x, 0.0, fp);
        blc_ranges.push((start..fp.blocks.len(), h));
        current_x += w;
    }
    let mut brc_ranges = Vec::new();
    for group in buckets.shift_remove(&Location::BottomRightCorner).unwrap_or_default() {
        let (w, h) = (max_width(&group), group_height(&group));
        let start = fp.blocks.len();
        place_group_at(group, 0.0, 0.0, fp);
        brc_ranges.push((start..fp.blocks.len(), w, h));
    }

    for quad in [
        Location::TopLeftQuad,
        Location::TopRightQuad,
        Location::BottomLeftQuad,
        Location::BottomRightQuad,
    ] {
        for group in buckets.shift_remove(&quad).unwrap_or_default() {
            let (x, y) = find_quadrant_position(&group, fp, quad, quadrant_step);
            place_group_at(group, x, y, fp);
        }
    }
    for group in buckets.shift_remove(&Location::Center).unwrap_or_default() {
        let (x, y) = find_center_position(&group, fp);
        place_group_at(group, x, y, fp);
    }
    // Everything left behaves as don't-care.
    for (_, bucket) in buckets {
        for group in bucket {
            let (x, y) = find_best_position(&group, fp);
            place_group_at(group, x, y, fp);
        }
    }

    fp.update_bounding_box();
    for (range, w) in trc_ranges {
        for i in range {
            fp.blocks[i].x += fp.bounding_width - w;
        }
    }
    for (range, h) in blc_ranges {
        for i in range {
            fp.blocks[i].y += fp.bounding_height - h;
        }
    }
    for (range, w, h) in brc_ranges {
        for i in range {
            fp.blocks[i].x += fp.bounding_width - w;
            fp.blocks[i].y += fp.bounding_height - h;
        }
    }
}

/// Scans a coarse grid confined to the quadrant half-planes for the
/// non-overlapping candidate with the smallest resulting bounding box.
fn find_quadrant_position(
    group: &[Block],
    fp: &FloorPlan,
    quadrant: Location,
    step: float,
) -> Vector2 {
    if fp.blocks.is_empty() {
        return (0.0, 0.0);
    }
    let (bw, bh) = fp.bounds();
    let (mid_x, mid_y) = (bw / 2.0, bh / 2.0);
    let (xs, ys) = match quadrant {
        Location::TopLeftQuad => (float_range(0.0, mid_x, step), float_range(0.0, mid_y, step)),
        Location::TopRightQuad => (float_range(mid_x, bw, step), float_range(0.0, mid_y, step)),
        Location::BottomLeftQuad => (float_range(0.0, mid_x, step), float_range(mid_y, bh, step)),
        _ => (float_range(mid_x, bw, step), float_range(mid_y, bh, step)),
    };
    let mut candidates = xs
        .iter()
        .cartesian_product(ys.iter())
        .map(|(&x, &y)| (x, y))
        .collect_vec();
    candidates.push((0.0, 0.0));
    best_from_candidates(fp, &candidates, group_width(group), group_height(group))
}

fn find_center_position(group: &[Block], fp: &FloorPlan) -> Vector2 {
    if fp.blocks.is_empty() {
        return (0.0, 0.0);
    }
    let (bw, bh) = fp.bounds();
    let (mid_x, mid_y) = (bw / 2.0, bh / 2.0);
    let (gw, gh) = (group_width(group), group_height(group));
    let candidates = [
        (mid_x - gw / 2.0, mid_y - gh / 2.0),
        (mid_x, mid_y),
        (mid_x - gw, mid_y),
        (mid_x, mid_y - gh),
        (0.0, 0.0),
    ];
    best_from_candidates(fp, &candidates, gw, gh)
}

/// Candidate positions for an unconstrained group: the origin, the two
/// bounding-box extensions and the right/below slot of every placed block.
pub fn find_best_position(group: &[Block], fp: &FloorPlan) -> Vector2 {
    if fp.blocks.is_empty() {
        return (0.0, 0.0);
    }
    let (bw, bh) = fp.bounds();
    let mut candidates = vec![(0.0, 0.0), (bw, 0.0), (0.0, bh)];
    for b in &fp.blocks {
        candidates.push((b.x + b.width, b.y));
        candidates.push((b.x, b.y + b.height));
    }
    best_from_candidates(fp, &candidates, group_width(group), group_height(group))
}

/// Keeps the overlap-free candidate minimizing the resulting bounding area;
/// ties go to the earlier candidate. Falls back to the first candidate when
/// every position collides (the overlap is repaired or penalized later).
fn best_from_candidates(
    fp: &FloorPlan,
    candidates: &[Vector2],
    gw: float,
    gh: float,
) -> Vector2 {
    let (bw, bh) = fp.bounds();
    let mut best = candidates
        .first()
        .map_or((0.0, 0.0), |&(x, y)| (x.max(0.0), y.max(0.0)));
    let mut best_area = float::INFINITY;
    for &(cx, cy) in candidates {
        let (x, y) = (cx.max(0.0), cy.max(0.0));
        let probe = Rect::from_size(x, y, gw, gh);
        if fp.blocks.iter().any(|b| probe.overlaps(&b.rect())) {
            continue;
        }
        let area = bw.max(x + gw) * bh.max(y + gh);
        if area < best_area {
            best_area = area;
            best = (x, y);
        }
    }
    best
}

fn place_row_based(fp: &mut FloorPlan, groups: Vec<Vec<Block>>) {
    let (mut current_x, mut current_y) = (0.0, 0.0);
    let mut row_height = 0.0;
    let mut max_row_width = 0.0f64;
    for mut group in groups {
        if should_rotate(&group) {
            for b in &mut group {
                b.rotate();
            }
        }
        let gw = group_width(&group);
        let gh = group_height(&group);
        if current_x > 0.0 && current_x + gw > max_row_width + gw * 2.0 {
            current_x = 0.0;
            current_y += row_height;
            row_height = 0.0;
        }
        place_group_at(group, current_x, current_y, fp);
        current_x += gw;
        row_height = row_height.max(gh);
        max_row_width = max_row_width.max(current_x);
    }
}

fn place_column_based(fp: &mut FloorPlan, groups: Vec<Vec<Block>>) {
    let (mut current_x, mut current_y) = (0.0, 0.0);
    let mut col_width = 0.0;
    let mut max_col_height = 0.0f64;
    for mut group in groups {
        if should_rotate(&group) {
            for b in &mut group {
                b.rotate();
            }
        }
        let gw = max_width(&group);
        let gh: float = group.iter().map(|b| b.height).sum();
        if current_y > 0.0 && current_y + gh > max_col_height + gh * 2.0 {
            current_y = 0.0;
            current_x += col_width;
            col_width = 0.0;
        }
        place_group_at(group, current_x, current_y, fp);
        current_y += gh;
        col_width = col_width.max(gw);
        max_col_height = max_col_height.max(current_y);
    }
}

/// Squareness heuristic: rotate the whole group when the swapped orientation
/// brings the row aspect closer to 1.0.
fn should_rotate(group: &[Block]) -> bool {
    let sum_w: float = group.iter().map(|b| b.width).sum();
    let sum_h: float = group.iter().map(|b| b.height).sum();
    let max_h = group_height(group);
    let max_w = max_width(group);
    let original = sum_w / max_h;
    let rotated = sum_h / max_w;
    (rotated - 1.0).abs() < (original - 1.0).abs()
}

/// Places a whole group at an anchor, resolving in-group abutment requests.
///
/// The root (the member nothing in-group depends on, or the first member for
/// circular chains) takes the anchor; every other member goes right of its
/// placed neighbor, or below it when the right slot collides with a placed
/// group member. Members whose dependency cannot be resolved within
/// `2 x group_len` passes land on the anchor verbatim; that overlap is
/// tolerated here and repaired or penalized downstream.
pub fn place_group_at(mut group: Vec<Block>, x: float, y: float, fp: &mut FloorPlan) {
    if group.is_empty() {
        return;
    }
    if group.len() == 1 {
        let mut block = group.pop().unwrap();
        block.x = x;
        block.y = y;
        fp.add_block(block);
        return;
    }

    let index_of: Dict<String, usize> = group
        .iter()
        .enumerate()
        .map(|(i, b)| (b.name.clone(), i))
        .collect();
    let in_group_dep: Vec<Option<usize>> = group
        .iter()
        .map(|b| {
            b.neighbor
                .as_deref()
                .and_then(|n| index_of.get(n).copied())
        })
        .collect();
    let root = in_group_dep.iter().position(Option::is_none).unwrap_or(0);

    let mut placed = vec![false; group.len()];
    group[root].x = x;
    group[root].y = y;
    placed[root] = true;

    for _ in 0..group.len() * 2 {
        let mut placed_any = false;
        for i in 0..group.len() {
            if placed[i] {
                continue;
            }
            let Some(dep) = in_group_dep[i] else { continue };
            if !placed[dep] {
                continue;
            }
            let (nx, ny, nw, nh) = (group[dep].x, group[dep].y, group[dep].width, group[dep].height);
            group[i].x = nx + nw;
            group[i].y = ny;
            let collides = (0..group.len())
                .any(|j| j != i && placed[j] && group[i].overlaps(&group[j]));
            if collides {
                group[i].x = nx;
                group[i].y = ny + nh;
            }
            placed[i] = true;
            placed_any = true;
        }
        if !placed_any {
            break;
        }
    }
    for i in 0..group.len() {
        if !placed[i] {
            group[i].x = x;
            group[i].y = y;
        }
    }
    for block in group {
        fp.add_block(block);
    }
}

/// Greedy gap-closing sweep: every movable block slides left then up one
/// unit at a time while the move keeps the plan overlap-free and inside its
/// quadrant. A plan that already carries overlaps is left untouched.
pub fn compact(fp: &mut FloorPlan) {
    if fp.blocks.is_empty() || fp.has_overlaps() {
        fp.update_bounding_box();
        return;
    }
    for _ in 0..10 {
        let mut improved = false;
        for i in 0..fp.blocks.len() {
            if fp.blocks[i].location.is_strict() {
                continue;
            }
            while fp.blocks[i].x >= 1.0 {
                fp.blocks[i].x -= 1.0;
                if !placement_legal(fp, i) {
                    fp.blocks[i].x += 1.0;
                    break;
                }
                improved = true;
            }
            while fp.blocks[i].y >= 1.0 {
                fp.blocks[i].y -= 1.0;
                if !placement_legal(fp, i) {
                    fp.blocks[i].y += 1.0;
                    break;
                }
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }
    fp.update_bounding_box();
}

/// A position is legal when the block overlaps nothing and stays inside its
/// quadrant half-planes.
pub fn placement_legal(fp: &FloorPlan, i: usize) -> bool {
    let block = &fp.blocks[i];
    if fp
        .blocks
        .iter()
        .enumerate()
        .any(|(j, other)| j != i && block.overlaps(other))
    {
        return false;
    }
    !violates_location(fp, i)
}

/// Quadrant membership of a block's center; corner and center preferences
/// are handled by snapping and the cost function instead.
pub fn violates_location(fp: &FloorPlan, i: usize) -> bool {
    let block = &fp.blocks[i];
    if !block.location.is_quad() {
        return false;
    }
    let (bw, bh) = fp.bounds();
    let (mid_x, mid_y) = (bw / 2.0, bh / 2.0);
    let (cx, cy) = block.center();
    match block.location {
        Location::TopLeftQuad => cx > mid_x || cy > mid_y,
        Location::TopRightQuad => cx < mid_x || cy > mid_y,
        Location::BottomLeftQuad => cx > mid_x || cy < mid_y,
        Location::BottomRightQuad => cx < mid_x || cy < mid_y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(name: &str, w: float, h: float) -> Block {
        Block::builder().name(name).width(w).height(h).build()
    }

    fn pair(a: &str, b: &str) -> Vec<Block> {
        vec![
            block(a, 10.0, 10.0),
            Block::builder()
                .name(b)
                .width(6.0)
                .height(6.0)
                .neighbor(a)
                .build(),
        ]
    }

    #[test]
    fn test_place_group_pair_abuts() {
        let mut fp = FloorPlan::default();
        place_group_at(pair("A", "B"), 0.0, 0.0, &mut fp);
        let a = fp.get_block("A").unwrap();
        let b = fp.get_block("B").unwrap();
        assert_eq!((a.x, a.y), (0.0, 0.0));
        assert!(a.abuts(b));
        assert!(!a.overlaps(b));
    }

    #[test]
    fn test_place_group_falls_back_below() {
        // C already occupies the slot right of A, so B must go below.
        let mut fp = FloorPlan::default();
        let group = vec![
            block("A", 10.0, 10.0),
            Block::builder()
                .name("C")
                .width(5.0)
                .height(5.0)
                .neighbor("A")
                .build(),
            Block::builder()
                .name("B")
                .width(5.0)
                .height(5.0)
                .neighbor("A")
                .build(),
        ];
        place_group_at(group, 0.0, 0.0, &mut fp);
        assert!(!fp.has_overlaps());
        let a = fp.get_block("A").unwrap();
        assert!(fp.get_block("B").unwrap().abuts(a));
        assert!(fp.get_block("C").unwrap().abuts(a));
    }

    #[test]
    fn test_row_strategy_no_overlap() {
        let groups = vec![
            vec![block("A", 10.0, 4.0)],
            vec![block("B", 8.0, 8.0)],
            vec![block("C", 3.0, 12.0)],
        ];
        let fp = place_with_strategy(groups, Strategy::RowBased, 10.0);
        assert_eq!(fp.blocks.len(), 3);
        assert!(!fp.has_overlaps());
    }

    #[test]
    fn test_corners_first_pins_top_left() {
        let groups = vec![
            vec![Block::builder()
                .name("TL")
                .width(6.0)
                .height(6.0)
                .location(Location::TopLeftCorner)
                .build()],
            vec![block("X", 10.0, 10.0)],
        ];
        let fp = place_with_strategy(groups, Strategy::CornersFirst, 10.0);
        let tl = fp.get_block("TL").unwrap();
        assert_eq!((tl.x, tl.y), (0.0, 0.0));
        assert!(!fp.has_overlaps());
    }

    #[test]
    fn test_corners_first_back_solves_right_edge() {
        let groups = vec![
            vec![block("X", 20.0, 10.0)],
            vec![Block::builder()
                .name("TR")
                .width(6.0)
                .height(6.0)
                .location(Location::TopRightCorner)
                .build()],
        ];
        let fp = place_with_strategy(groups, Strategy::CornersFirst, 10.0);
        let tr = fp.get_block("TR").unwrap();
        assert_eq!(tr.x + tr.width, fp.bounding_width);
        assert_eq!(tr.y, 0.0);
    }

    #[test]
    fn test_find_best_position_avoids_overlap() {
        let mut fp = FloorPlan::default();
        fp.add_block(block("A", 10.0, 10.0));
        fp.update_bounding_box();
        let group = vec![block("B", 10.0, 10.0)];
        let (x, y) = find_best_position(&group, &fp);
        let probe = Rect::from_size(x, y, 10.0, 10.0);
        assert!(!probe.overlaps(&fp.blocks[0].rect()));
    }

    #[test]
    fn test_compact_pulls_block_home() {
        let mut fp = FloorPlan::default();
        fp.add_block(block("A", 5.0, 5.0));
        let mut b = block("B", 5.0, 5.0);
        b.x = 30.0;
        b.y = 12.0;
        fp.add_block(b);
        compact(&mut fp);
        let b = fp.get_block("B").unwrap();
        // Slides all the way left, then up until it touches A.
        assert_eq!((b.x, b.y), (0.0, 5.0));
        assert!(!fp.has_overlaps());
    }

    #[test]
    fn test_compact_leaves_overlapping_plan_alone() {
        let mut fp = FloorPlan::default();
        fp.add_block(block("A", 5.0, 5.0));
        let mut b = block("B", 5.0, 5.0);
        b.x = 2.0;
        fp.add_block(b);
        compact(&mut fp);
        assert_eq!(fp.get_block("B").unwrap().x, 2.0);
    }

    #[test]
    fn test_violates_location_quadrant() {
        let mut fp = FloorPlan::default();
        fp.add_block(block("big", 100.0, 100.0));
        let mut q = Block::builder()
            .name("Q")
            .width(10.0)
            .height(10.0)
            .location(Location::TopLeftQuad)
            .build();
        q.x = 80.0;
        q.y = 80.0;
        fp.add_block(q);
        assert!(violates_location(&fp, 1));
        fp.blocks[1].x = 0.0;
        fp.blocks[1].y = 0.0;
        assert!(!violates_location(&fp, 1));
    }
}
