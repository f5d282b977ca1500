use crate::*;

#[derive(Debug, thiserror::Error)]
pub enum FloorplanError {
    #[error("block '{name}' has invalid dimensions {width}x{height}")]
    InvalidDimension {
        name: String,
        width: float,
        height: float,
    },
    #[error("maximum aspect ratio must be at least 1.0, got {0}")]
    InvalidAspectRatio(float),
}

/// Runs the full pipeline with the default configuration.
pub fn compute_floorplan(
    blocks: &[Block],
    max_aspect_ratio: float,
) -> Result<FloorPlan, FloorplanError> {
    compute_floorplan_with(blocks, max_aspect_ratio, &AnnealConfig::default())
}

/// Greedy construction, annealing, then the deterministic corner and
/// compaction post-pass. The returned plan never contains overlapping
/// blocks; preferred locations and adjacency requests are best-effort and
/// reported as warnings when unmet.
#[time]
pub fn compute_floorplan_with(
    blocks: &[Block],
    max_aspect_ratio: float,
    config: &AnnealConfig,
) -> Result<FloorPlan, FloorplanError> {
    if blocks.is_empty() {
        return Ok(FloorPlan::default());
    }
    for block in blocks {
        if block.width <= 0.0 || block.height <= 0.0 {
            return Err(FloorplanError::InvalidDimension {
                name: block.name.clone(),
                width: block.width,
                height: block.height,
            });
        }
    }
    if max_aspect_ratio < 1.0 {
        return Err(FloorplanError::InvalidAspectRatio(max_aspect_ratio));
    }

    info!("{} grouping {} blocks", "[1/3]".bold().dimmed(), blocks.len());
    let groups = group_neighbors(blocks.to_vec());
    let initial = initial_solution(&groups, config.quadrant_grid_step);

    info!(
        "{} annealing from cost-relevant area {:.1}",
        "[2/3]".bold().dimmed(),
        initial.area()
    );
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut fp = anneal(initial, max_aspect_ratio, config, &mut rng);

    info!("{} corner enforcement and compaction", "[3/3]".bold().dimmed());
    enforce_corners(&mut fp, config.resolve_grid_step, config.density_grid_step);
    fp.update_bounding_box();

    report_violations(&fp);
    Ok(fp)
}

fn report_violations(fp: &FloorPlan) {
    for (i, block) in fp.blocks.iter().enumerate() {
        if block.location != Location::DontCare && violates_location(fp, i) {
            warn!(
                "block '{}' missed its preferred location {}",
                block.name.red(),
                block.location
            );
        }
        if let Some(neighbor) = &block.neighbor {
            let satisfied = fp
                .get_block(neighbor)
                .is_some_and(|other| block.abuts(other));
            if !satisfied {
                warn!(
                    "block '{}' is not adjacent to requested neighbor '{}'",
                    block.name.red(),
                    neighbor
                );
            }
        }
    }
}
