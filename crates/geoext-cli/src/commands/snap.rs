//! Snap command implementation

use super::{read_geometry, render_geometry};
use crate::cli::SnapArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use geoext_core::config::LayeredConfig;
use geoext_core::geo::{GridOffset, GridSpec, SnapToGrid};
use geoext_core::ReadOptions;

/// Execute the snap command
pub fn execute(args: SnapArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let geom = read_geometry(&args.input, &ReadOptions::new(), config)?;

    let mut spec = GridSpec::sizes(
        args.size_x.unwrap_or(args.size),
        args.size_y.unwrap_or(args.size),
        args.size_z.unwrap_or(args.size),
    );

    let origin = match &args.offset_geometry {
        Some(text) => Some(read_geometry(text, &ReadOptions::new(), config)?),
        None => None,
    };
    if let Some(origin) = &origin {
        spec = spec.with_offset(GridOffset::Centroid(origin))?;
    } else if let Some(offset) = &args.offset {
        spec = spec.with_offset(GridOffset::try_from(offset.as_slice())?)?;
    }

    tracing::debug!(?spec, "Snapping {}", geom.type_name());
    let snapped = geom.snap_to_grid(&spec, config.srid_copy_policy.value)?;

    render_geometry(&snapped, args.format, config, output)
}
