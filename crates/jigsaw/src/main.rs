use anyhow::{Context as _, bail};
use bevy::app::AppExit;
use jigsaw::PuzzleConfig;

fn main() -> anyhow::Result<()> {
    let config = PuzzleConfig::default();
    let grid = config.grid_size;
    let source_dir = config.source_dir.clone();

    let exit = jigsaw::run(config).with_context(|| {
        format!(
            "failed to start a {grid}x{grid} puzzle from {}",
            source_dir.display()
        )
    })?;

    if let AppExit::Error(code) = exit {
        bail!("puzzle exited with error code {code}");
    }
    Ok(())
}
