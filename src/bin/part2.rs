use anyhow::{Context, Result};
use clap::Parser;
use day15::{CLIArgs, Position, RiskGrid, DEFAULT_TILE_N};

fn main() -> Result<()> {
    env_logger::init();
    let args = CLIArgs::parse();
    let map = day15::read_risk_map(&args.input_path).with_context(|| {
        format!(
            "Failed to read risk map from given file({}).",
            args.input_path.display()
        )
    })?;

    let tile_n = args.tile_n.unwrap_or(DEFAULT_TILE_N);
    let full_map = map
        .tiled(tile_n)
        .with_context(|| format!("Failed to repeat the risk map {} time(s).", tile_n))?;
    let start_pos = args.start.unwrap_or(Position::new(0, 0));
    let end_pos = args
        .target
        .or_else(|| full_map.bottom_right())
        .context("No bottom right position in an empty risk map.")?;
    if let Some(lowest_risk) = day15::find_path(&full_map, start_pos, end_pos) {
        println!(
            "The lowest total risk of any path from {} to {} in the full map is {}.",
            start_pos, end_pos, lowest_risk
        );
    } else {
        eprintln!(
            "There's no path from {} to {} in the full map.",
            start_pos, end_pos
        );
    }

    Ok(())
}
