//! Command implementations

mod config;
mod polyline;
mod read;
mod snap;
mod transform;

use crate::cli::{Cli, Commands, GeometryFormat};
use crate::output::OutputWriter;
use anyhow::{bail, Context, Result};
use geoext_core::config::{CliConfigOverrides, LayeredConfig};
use geoext_core::formats::{
    as_json, to_geojson, to_georss, to_kml, JsonOptions, KmlOptions, WkbWriter, WktWriter,
};
use geoext_core::{Geometry, ReadOptions};
use std::io::Read;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Read(args) => read::execute(args, &config, &output),
        Commands::Snap(args) => snap::execute(args, &config, &output),
        Commands::Transform(args) => transform::execute(args, &config, &output),
        Commands::Polyline(args) => polyline::execute(args, config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Build the layered configuration: defaults, then file, environment and flags
fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = &cli.config {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }
    let mut config = config.load_from_env();

    config.update_from_cli(CliConfigOverrides {
        srid_copy_policy: cli.policy.map(Into::into),
        wkt_precision: cli.precision,
        ..Default::default()
    });

    Ok(config)
}

/// Resolve "-" to the raw bytes of standard input
fn input_bytes(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read geometry from stdin")?;
        Ok(buffer)
    } else {
        Ok(input.as_bytes().to_vec())
    }
}

/// Read a geometry argument, applying the configured default SRID when the
/// input carries none and no SRID was forced
fn read_geometry(input: &str, options: &ReadOptions, config: &LayeredConfig) -> Result<Geometry> {
    let bytes = input_bytes(input)?;
    let Some(mut geom) = geoext_core::read(bytes.as_slice(), options)? else {
        bail!("No geometry in input");
    };

    if options.srid.is_none() && geom.srid() == 0 && config.default_srid.value != 0 {
        tracing::debug!(srid = config.default_srid.value, "Applying default SRID");
        geom.set_srid(config.default_srid.value);
    }
    Ok(geom)
}

/// Write a geometry in the requested notation
fn render_geometry(geom: &Geometry, format: GeometryFormat, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut writer = WktWriter::new();
    if let Some(precision) = config.wkt_precision.value {
        writer = writer.with_precision(precision);
    }

    match format {
        GeometryFormat::Wkt => output.text(writer.write(geom)),
        GeometryFormat::Ewkt => output.text(writer.extended().write(geom)),
        GeometryFormat::Wkb => output.text(WkbWriter::new().write_hex(geom)?),
        GeometryFormat::Ewkb => output.text(WkbWriter::extended().write_hex(geom)?),
        GeometryFormat::Geojson => output.result(to_geojson(geom, &Default::default()))?,
        GeometryFormat::Json => {
            let options = JsonOptions {
                level: config.polyline_level.value,
                ..Default::default()
            };
            output.result(as_json(geom, &options)?)?
        }
        GeometryFormat::Kml => output.text(to_kml(geom, &KmlOptions::default())?),
        GeometryFormat::Georss => output.text(to_georss(geom)?),
    }
    Ok(())
}
