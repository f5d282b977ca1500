use crate::*;

/// Weights of the cost terms. The defaults keep the priority order
/// no-overlap > explicit constraints > aspect ratio > raw area: a single
/// constraint violation scales with `constraint_scale x area`, which stays
/// strictly below `overlap x area` for any violation count seen in practice.
#[derive(Debug, Clone)]
pub struct CostWeights {
    pub overlap: float,
    pub constraint_scale: float,
    pub aspect_excess: float,
    pub aspect_shaping: float,
    /// Allowed deviation, in position units, before an exact-corner block
    /// counts as violated.
    pub corner_tolerance: float,
    /// Fraction of the layout-relative distance threshold a center block's
    /// center may drift before it counts as violated.
    pub center_slack: float,
}
impl Default for CostWeights {
    fn default() -> Self {
        Self {
            overlap: 100_000.0,
            constraint_scale: 10_000.0,
            aspect_excess: 100.0,
            aspect_shaping: 0.5,
            corner_tolerance: 2.0,
            center_slack: 0.6,
        }
    }
}

/// Scores a plan: bounding area, aspect-ratio shaping, a dominant overlap
/// term and the location/neighbor constraint penalties. Degenerate plans
/// score infinite.
pub fn calculate_cost(fp: &mut FloorPlan, max_aspect_ratio: float, weights: &CostWeights) -> float {
    fp.update_bounding_box();
    if fp.bounding_width <= 0.0 || fp.bounding_height <= 0.0 {
        return float::INFINITY;
    }
    let area = fp.area();
    let ratio = fp.aspect_ratio();

    let mut penalty = if ratio > max_aspect_ratio {
        area * (ratio - max_aspect_ratio) * weights.aspect_excess
    } else {
        // Small shaping term nudging the search toward squarer plans.
        area * (ratio - 1.0) * weights.aspect_shaping
    };
    if fp.has_overlaps() {
        penalty += area * weights.overlap;
    }
    penalty += (location_penalty(fp, weights) + neighbor_penalty(fp)) * area * weights.constraint_scale;
    area + penalty
}

/// 1.0 per exact-corner block off its corner, 0.5 per quadrant block whose
/// center leaves its half-planes, 0.5 per drifting center block.
pub fn location_penalty(fp: &FloorPlan, weights: &CostWeights) -> float {
    if fp.blocks.is_empty() {
        return 0.0;
    }
    let (bw, bh) = fp.bounds();
    let (mid_x, mid_y) = (bw / 2.0, bh / 2.0);
    let tolerance = weights.corner_tolerance;
    let mut penalty = 0.0;
    for block in &fp.blocks {
        let (cx, cy) = block.center();
        match block.location {
            Location::TopLeftCorner => {
                if block.x > tolerance || block.y > tolerance {
                    penalty += 1.0;
                }
            }
            Location::TopRightCorner => {
                let expected_x = bw - block.width;
                if (block.x - expected_x).abs() > tolerance || block.y > tolerance {
                    penalty += 1.0;
                }
            }
            Location::BottomLeftCorner => {
                let expected_y = bh - block.height;
                if block.x > tolerance || (block.y - expected_y).abs() > tolerance {
                    penalty += 1.0;
                }
            }
            Location::BottomRightCorner => {
                let expected_x = bw - block.width;
                let expected_y = bh - block.height;
                if (block.x - expected_x).abs() > tolerance
                    || (block.y - expected_y).abs() > tolerance
                {
                    penalty += 1.0;
                }
            }
            Location::TopLeftQuad => {
                if cx > mid_x || cy > mid_y {
                    penalty += 0.5;
                }
            }
            Location::TopRightQuad => {
                if cx < mid_x || cy > mid_y {
                    penalty += 0.5;
                }
            }
            Location::BottomLeftQuad => {
                if cx > mid_x || cy < mid_y {
                    penalty += 0.5;
                }
            }
            Location::BottomRightQuad => {
                if cx < mid_x || cy < mid_y {
                    penalty += 0.5;
                }
            }
            Location::Center => {
                let distance = norm1((cx, cy), (mid_x, mid_y));
                let max_distance = (bw + bh) / 4.0;
                if distance > max_distance * weights.center_slack {
                    penalty += 0.5;
                }
            }
            Location::DontCare => {}
        }
    }
    penalty
}

/// 1.0 per block whose requested neighbor is missing from the plan or
/// present but not abutting it.
pub fn neighbor_penalty(fp: &FloorPlan) -> float {
    if fp.blocks.is_empty() {
        return 0.0;
    }
    let by_name: Dict<&str, &Block> = fp.blocks.iter().map(|b| (b.name.as_str(), b)).collect();
    let mut penalty = 0.0;
    for block in &fp.blocks {
        if let Some(wanted) = block.neighbor.as_deref() {
            match by_name.get(wanted) {
                Some(other) if block.abuts(other) => {}
                _ => penalty += 1.0,
            }
        }
    }
    penalty
}
