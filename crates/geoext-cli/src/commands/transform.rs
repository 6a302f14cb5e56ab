//! Transform command implementation

use super::{read_geometry, render_geometry};
use crate::cli::{TransformArgs, TransformOp};
use crate::output::OutputWriter;
use anyhow::{bail, Context, Result};
use geoext_core::config::LayeredConfig;
use geoext_core::geo::{AffineTransform, Origin, Scale, TransScale, Translate};
use geoext_core::ReadOptions;

/// Operation arguments as given on the command line
enum OpArgs {
    Positional(Vec<f64>),
    Pairs(Vec<(String, f64)>),
}

impl OpArgs {
    /// `key=value` pairs select the mapping form; everything else must be numeric
    fn parse(args: &[String]) -> Result<Self> {
        if !args.is_empty() && args.iter().all(|arg| arg.contains('=')) {
            let pairs = args
                .iter()
                .map(|arg| {
                    let (key, value) = arg.split_once('=').unwrap_or((arg.as_str(), ""));
                    let value: f64 = value
                        .trim()
                        .parse()
                        .with_context(|| format!("Invalid number in '{}'", arg))?;
                    Ok((key.trim().to_string(), value))
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(OpArgs::Pairs(pairs));
        }

        let values = args
            .iter()
            .map(|arg| {
                arg.trim()
                    .parse::<f64>()
                    .with_context(|| format!("Invalid number '{}'", arg))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(OpArgs::Positional(values))
    }

    /// The single angle taken by the rotations
    fn radians(&self, op: &str) -> Result<f64> {
        match self {
            OpArgs::Positional(values) if values.len() == 1 => Ok(values[0]),
            OpArgs::Pairs(pairs) if pairs.len() == 1 && pairs[0].0 == "radians" => Ok(pairs[0].1),
            _ => bail!("{} expects a single angle in radians", op),
        }
    }
}

/// Execute the transform command
pub fn execute(args: TransformArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let geom = read_geometry(&args.input, &ReadOptions::new(), config)?;
    let op_args = OpArgs::parse(&args.args)?;
    let policy = config.srid_copy_policy.value;

    let origin_geom = match &args.origin_geometry {
        Some(text) => Some(read_geometry(text, &ReadOptions::new(), config)?),
        None => None,
    };

    let result = match args.op {
        TransformOp::Rotate => {
            let origin = match (&origin_geom, &args.origin) {
                (Some(geom), _) => Origin::Centroid(geom),
                (None, Some(xy)) => Origin::try_from(xy.as_slice())?,
                (None, None) => Origin::Zero,
            };
            geom.rotate(op_args.radians("rotate")?, origin, policy)?
        }
        TransformOp::RotateX => geom.rotate_x(op_args.radians("rotate-x")?, policy)?,
        TransformOp::RotateY => geom.rotate_y(op_args.radians("rotate-y")?, policy)?,
        TransformOp::RotateZ => geom.rotate_z(op_args.radians("rotate-z")?, policy)?,
        TransformOp::Scale => {
            let scale = match op_args {
                OpArgs::Positional(values) => Scale::try_from(values.as_slice())?,
                OpArgs::Pairs(pairs) => Scale::from_pairs(pairs)?,
            };
            geom.scale(scale, policy)?
        }
        TransformOp::TransScale => {
            let trans_scale = match op_args {
                OpArgs::Positional(values) => TransScale::try_from(values.as_slice())?,
                OpArgs::Pairs(pairs) => TransScale::from_pairs(pairs)?,
            };
            geom.trans_scale(trans_scale, policy)?
        }
        TransformOp::Translate => {
            let offset = match op_args {
                OpArgs::Positional(values) => Translate::try_from(values.as_slice())?,
                OpArgs::Pairs(pairs) => Translate::from_pairs(pairs)?,
            };
            geom.translate(offset, policy)?
        }
    };

    tracing::debug!(op = ?args.op, srid = result.srid(), "Transformed {}", result.type_name());
    render_geometry(&result, args.format, config, output)
}
