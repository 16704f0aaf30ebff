use anyhow::{ensure, Context, Result};
use clap::Parser;
use day15::{CLIArgs, Position, RiskGrid};

fn main() -> Result<()> {
    env_logger::init();
    let args = CLIArgs::parse();
    ensure!(
        args.tile_n.is_none(),
        "Tile count is only used by part 2, the map isn't repeated in part 1."
    );
    let map = day15::read_risk_map(&args.input_path).with_context(|| {
        format!(
            "Failed to read risk map from given file({}).",
            args.input_path.display()
        )
    })?;

    let start_pos = args.start.unwrap_or(Position::new(0, 0));
    let end_pos = args
        .target
        .or_else(|| map.bottom_right())
        .context("No bottom right position in an empty risk map.")?;
    if let Some(lowest_risk) = day15::find_path(&map, start_pos, end_pos) {
        println!(
            "The lowest total risk of any path from {} to {} is {}.",
            start_pos, end_pos, lowest_risk
        );
    } else {
        eprintln!(
            "There's no path from {} to {} in the given risk map.",
            start_pos, end_pos
        );
    }

    Ok(())
}
