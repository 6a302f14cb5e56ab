//! Read command implementation

use super::{read_geometry, render_geometry};
use crate::cli::ReadArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use geoext_core::config::LayeredConfig;
use geoext_core::ReadOptions;

/// Execute the read command
pub fn execute(args: ReadArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut options = ReadOptions::new().points(args.points).excluded(args.excluded);
    if let Some(allowed) = args.allowed {
        options = options.allowed(allowed);
    }
    if let Some(srid) = args.srid {
        options = options.srid(srid);
    }

    let geom = read_geometry(&args.input, &options, config)?;
    if geom.is_empty() {
        output.warning(format!("{} is empty", geom.type_name()));
    }

    render_geometry(&geom, args.format, config, output)
}
