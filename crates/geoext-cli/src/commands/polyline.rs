//! Polyline command implementation

use super::read_geometry;
use crate::cli::{PolylineArgs, PolylineCommands};
use crate::output::OutputWriter;
use anyhow::Result;
use geoext_core::config::{CliConfigOverrides, LayeredConfig};
use geoext_core::formats::polyline::{decode, encode_geometry};
use geoext_core::ReadOptions;

/// Execute the polyline command
pub fn execute(args: PolylineArgs, mut config: LayeredConfig, output: &OutputWriter) -> Result<()> {
    match args.command {
        PolylineCommands::Encode { input, level } => {
            config.update_from_cli(CliConfigOverrides {
                polyline_level: level,
                ..Default::default()
            });

            let geom = read_geometry(&input, &ReadOptions::new(), &config)?;
            let encoded = encode_geometry(&geom, config.polyline_level.value)?;

            if output.is_json() {
                output.result(&encoded)
            } else {
                output.kv("points", &encoded.points);
                output.kv("levels", &encoded.levels);
                Ok(())
            }
        }
        PolylineCommands::Decode { encoded } => {
            let points = decode(&encoded)?;
            if points.is_empty() {
                output.info("No points decoded");
            }
            output.result(points)
        }
    }
}
