use floorplan::*;
use prettytable::{row, Table};

fn print_report(fp: &FloorPlan) {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Block", "Size", "Position", "Location", "Neighbor"]);
    for block in &fp.blocks {
        table.add_row(row![
            block.name,
            format!("{:.0}x{:.0}", block.width, block.height),
            format!("({:.0}, {:.0})", block.x, block.y),
            block.location.to_string(),
            block.neighbor.as_deref().unwrap_or("-"),
        ]);
    }
    table.printstd();

    let location_misses = (0..fp.blocks.len())
        .filter(|&i| fp.blocks[i].location != Location::DontCare && violates_location(fp, i))
        .count();
    let neighbor_misses = fp
        .blocks
        .iter()
        .filter(|b| {
            b.neighbor.as_ref().is_some_and(|n| {
                !fp.get_block(n).is_some_and(|other| b.abuts(other))
            })
        })
        .count();

    let mut summary = Table::new();
    summary.set_format(*prettytable::format::consts::FORMAT_BOX_CHARS);
    summary.add_row(row![
        "Bounding box",
        format!("{:.0} x {:.0}", fp.bounding_width, fp.bounding_height)
    ]);
    summary.add_row(row!["Area", format!("{:.0}", fp.area())]);
    summary.add_row(row!["Aspect ratio", format!("{:.3}", fp.aspect_ratio())]);
    summary.add_row(row!["Location misses", location_misses.to_string()]);
    summary.add_row(row!["Neighbor misses", neighbor_misses.to_string()]);
    summary.printstd();
}

fn run(case_path: &str, max_aspect_ratio: float) -> Result<(), Box<dyn std::error::Error>> {
    let blocks = load_blocks(case_path)?;
    info!(
        "loaded {} blocks from {}",
        blocks.len(),
        case_path.bold()
    );
    let config = AnnealConfig::builder().quiet(false).build();
    let fp = compute_floorplan_with(&blocks, max_aspect_ratio, &config)?;
    print_report(&fp);
    Ok(())
}

fn main() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args: Vec<String> = std::env::args().collect();
    let Some(case_path) = args.get(1) else {
        eprintln!("usage: {} <case.json> [max-aspect-ratio]", args[0]);
        std::process::exit(1);
    };
    let max_aspect_ratio = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2.0);

    let tmr = timer!("total");
    if let Err(e) = run(case_path, max_aspect_ratio) {
        error!("{}", e.to_string().red());
        std::process::exit(1);
    }
    finish!(tmr);
}
