//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::info;

use crate::config::{
    PipelineConfig, ENV_ROOM_DEPTH, ENV_ROOM_HEIGHT, ENV_ROOM_WIDTH, ENV_SNAP_INCREMENT,
};
use crate::error::{FurnishError, Result};
use crate::layout::LayoutResult;
use crate::manifest::Manifest;
use crate::pipeline;

use super::GridArgs;

/// Run the full pipeline over a model response.
pub fn process(
    input: &Path,
    manifest: Option<&Path>,
    grid: &GridArgs,
    output: Option<&Path>,
) -> Result<()> {
    info!("Processing model output: {}", input.display());

    let config = resolve_config(grid);
    let manifest = load_manifest(manifest, &config)?;
    let raw = read_input(input)?;

    let layout = pipeline::run(&raw, &manifest, &config.sanitize_options())?;
    let content = serde_json::to_string_pretty(&layout)?;

    match output {
        Some(path) => {
            fs::write(path, content).map_err(|e| FurnishError::FileWriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
            println!("Layout written: {} ({} objects)", path.display(), layout.len());
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Print the recovered JSON and the strategy that found it.
pub fn extract(input: &Path) -> Result<()> {
    info!("Extracting JSON from: {}", input.display());

    let raw = read_input(input)?;
    let (value, strategy) = pipeline::extract_with_strategy(&raw)?;

    eprintln!("Recovered via {}", strategy.as_str());
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

/// Print the canonical layout before geometry correction.
pub fn normalize(input: &Path, manifest: Option<&Path>) -> Result<()> {
    info!("Normalizing model output: {}", input.display());

    let config = PipelineConfig::from_env();
    let manifest = load_manifest(manifest, &config)?;
    let raw = read_input(input)?;

    let value = pipeline::extract(&raw)?;
    let layout = pipeline::normalize(&value, &manifest, &config.room_fallback);
    println!("{}", serde_json::to_string_pretty(&layout)?);

    Ok(())
}

/// Sanitize a canonical layout file.
pub fn sanitize(layout: &Path, manifest: Option<&Path>, grid: &GridArgs) -> Result<()> {
    info!("Sanitizing layout: {}", layout.display());

    let config = resolve_config(grid);
    let manifest = load_manifest(manifest, &config)?;
    let layout: LayoutResult = serde_json::from_str(&read_input(layout)?)?;

    let layout = pipeline::sanitize_with_manifest(layout, &config.sanitize_options(), &manifest);
    println!("{}", serde_json::to_string_pretty(&layout)?);

    Ok(())
}

/// Environment configuration with command-line overrides applied.
pub fn resolve_config(grid: &GridArgs) -> PipelineConfig {
    let mut config = PipelineConfig::from_env();
    config.override_with(ENV_SNAP_INCREMENT, grid.snap);
    config.override_with(ENV_ROOM_WIDTH, grid.room_width);
    config.override_with(ENV_ROOM_DEPTH, grid.room_depth);
    config.override_with(ENV_ROOM_HEIGHT, grid.room_height);
    config
}

fn load_manifest(path: Option<&Path>, config: &PipelineConfig) -> Result<Manifest> {
    let manifest = match path {
        Some(path) => Manifest::load(path)?,
        None => Manifest::new(),
    };
    Ok(config.apply_to(manifest))
}

/// Read a whole file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    if !path.exists() {
        return Err(FurnishError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|e| FurnishError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })
}
