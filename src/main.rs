//! regionheat CLI - Render region metric heatmaps from annotation volumes.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser};
use regionheat::colormap::{parse_hex_color, Colormap};
use regionheat::config::RegionHeatConfig;
use regionheat::figure::{render_figure, FigureLayout, FigureParams};
use regionheat::frames::{export_frames, save_png};
use regionheat::lookup::LookupArray;
use regionheat::metrics::{DisplayBound, MetricTable};
use regionheat::summary::Summary;
use regionheat::volume::LabelVolume;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "regionheat")]
#[command(about = "Render brain-region metric heatmaps with boundary overlays")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "regionheat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Render selected z-slices into one figure
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Z-slices to render (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        slices: Vec<usize>,

        /// Grid rows
        #[arg(long)]
        rows: Option<usize>,

        /// Grid columns
        #[arg(long)]
        cols: Option<usize>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export one numbered PNG per z-slice for animation
    Frames {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// First z-slice
        #[arg(long, default_value = "0")]
        start: usize,

        /// End z-slice, exclusive (defaults to the volume depth)
        #[arg(long)]
        end: Option<usize>,

        /// Step between z-slices
        #[arg(long, default_value = "1")]
        step: usize,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Frame file prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Pad frames to even width and height
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        even: Option<bool>,
    },

    /// Summarize table coverage and the display bound
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Legend rounding granularity
        #[arg(long)]
        round_to: Option<f64>,

        /// Also save the summary as JSON
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        save_summary: Option<bool>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Label volume (multi-page TIFF)
    #[arg(long)]
    volume: PathBuf,

    /// Metric table (CSV with an `id` column)
    #[arg(long)]
    table: PathBuf,

    /// Metric column to map, e.g. density or mean_intensity
    #[arg(long)]
    column: Option<String>,

    /// Multiplicative correction applied to every metric value
    #[arg(long)]
    correction_factor: Option<f64>,
}

#[derive(Args)]
struct StyleArgs {
    /// Colormap name
    #[arg(long)]
    colormap: Option<String>,

    /// Legend rounding granularity
    #[arg(long)]
    round_to: Option<f64>,

    /// Integer upscaling per panel
    #[arg(long)]
    scale: Option<u32>,

    /// Mirror slices left-right (`--flip-x=false` overrides the config)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    flip_x: Option<bool>,

    /// Mirror slices top-bottom
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    flip_y: Option<bool>,

    /// Hide panel frames and colorbar ticks
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    hide_axes: Option<bool>,

    /// Boundary line color (hex, e.g. "#ffffff")
    #[arg(long)]
    line_color: Option<String>,

    /// Boundary overlay opacity
    #[arg(long)]
    alpha: Option<f32>,
}

impl StyleArgs {
    fn apply(&self, params: &mut FigureParams) -> Result<()> {
        if let Some(name) = &self.colormap {
            params.colormap = Colormap::from_name(name)?;
        }
        if let Some(round_to) = self.round_to {
            params.round_to = round_to;
        }
        if let Some(scale) = self.scale {
            params.scale = scale;
        }
        if let Some(flip_x) = self.flip_x {
            params.flip_x = flip_x;
        }
        if let Some(flip_y) = self.flip_y {
            params.flip_y = flip_y;
        }
        if let Some(hide_axes) = self.hide_axes {
            params.hide_axes = hide_axes;
        }
        if let Some(color) = &self.line_color {
            params.overlay.line_color = parse_hex_color(color)?;
        }
        if let Some(alpha) = self.alpha {
            params.overlay = regionheat::style::OverlayStyle::new(
                params.overlay.line_color,
                alpha,
                params.overlay.transparent_unmarked,
            )?;
        }
        Ok(())
    }
}

struct Loaded {
    volume: LabelVolume,
    table: MetricTable,
}

impl Loaded {
    fn open(input: &InputArgs, config: &RegionHeatConfig) -> Result<Self> {
        let column = input
            .column
            .clone()
            .unwrap_or_else(|| config.input.metric_column.clone());
        let volume = LabelVolume::open(&input.volume)
            .with_context(|| format!("loading label volume {}", input.volume.display()))?;
        let table = MetricTable::open(&input.table, &column)
            .with_context(|| format!("loading metric table {}", input.table.display()))?;
        Ok(Self { volume, table })
    }

    fn lookup(&self, input: &InputArgs, config: &RegionHeatConfig) -> Result<LookupArray> {
        let factor = correction_factor(input, config);
        Ok(LookupArray::build(&self.volume, &self.table, factor)?)
    }
}

fn correction_factor(input: &InputArgs, config: &RegionHeatConfig) -> f64 {
    input
        .correction_factor
        .unwrap_or(config.input.correction_factor)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("regionheat=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = RegionHeatConfig::load(Path::new(&cli.config))?;

    match cli.command {
        Commands::Render {
            input,
            style,
            slices,
            rows,
            cols,
            output,
        } => {
            let mut params = config.figure_params()?;
            style.apply(&mut params)?;
            params.layout = FigureLayout::new(
                rows.unwrap_or(config.figure.rows),
                cols.unwrap_or(config.figure.cols),
            );
            // Fail on layout before touching any input file.
            params.layout.check(slices.len())?;

            let loaded = Loaded::open(&input, &config)?;
            let lookup = loaded.lookup(&input, &config)?;

            println!(
                "Rendering {} slice(s) on a {}x{} grid...",
                slices.len(),
                params.layout.rows,
                params.layout.cols
            );
            let figure = render_figure(&loaded.volume, &loaded.table, &lookup, &slices, &params)?;

            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(&config.output.directory).join(format!(
                    "{}_{}.png",
                    loaded.table.column(),
                    slices
                        .iter()
                        .map(|z| z.to_string())
                        .collect::<Vec<_>>()
                        .join("-")
                ))
            });
            save_png(&figure, &output_path)?;
            println!("Saved to {}", output_path.display());
        }

        Commands::Frames {
            input,
            style,
            start,
            end,
            step,
            output_dir,
            prefix,
            even,
        } => {
            if step == 0 {
                bail!("--step must be at least 1");
            }
            let mut params = config.figure_params()?;
            style.apply(&mut params)?;
            let mut settings = config.frame_settings();
            if let Some(prefix) = prefix {
                settings.prefix = prefix;
            }
            if let Some(even) = even {
                settings.even_dimensions = even;
            }

            let loaded = Loaded::open(&input, &config)?;
            let lookup = loaded.lookup(&input, &config)?;

            let end = end.unwrap_or(loaded.volume.depth());
            let slices: Vec<usize> = (start..end).step_by(step).collect();
            let output_dir = output_dir
                .unwrap_or_else(|| PathBuf::from(&config.output.directory).join("frames"));

            println!(
                "Exporting {} frame(s) to {}...",
                slices.len(),
                output_dir.display()
            );
            let paths = export_frames(
                &loaded.volume,
                &loaded.table,
                &lookup,
                &slices,
                &params,
                &output_dir,
                &settings,
            )?;
            if let (Some(first), Some(last)) = (paths.first(), paths.last()) {
                println!("  {} .. {}", first.display(), last.display());
            }
            println!("Done! {} frames saved", paths.len());
        }

        Commands::Inspect {
            input,
            round_to,
            save_summary,
        } => {
            let loaded = Loaded::open(&input, &config)?;
            let round_to = round_to.unwrap_or(config.figure.round_to);
            let factor = correction_factor(&input, &config);
            let bound = DisplayBound::from_corrected(&loaded.table, factor, round_to)?;
            let summary = Summary::new(&loaded.volume, &loaded.table, factor, bound);

            let (depth, height, width) = summary.shape;
            println!("Volume:");
            println!("  Shape: {} x {} x {} (z, y, x)", depth, height, width);
            println!("  Regions: {}", summary.regions_in_volume);
            println!("  Largest id: {}", summary.max_id);
            println!("\nTable ({}):", summary.metric_column);
            println!("  Entries: {}", summary.regions_in_table);
            println!("  Covered regions: {}", summary.covered);
            println!("  Missing (drawn as 0): {}", summary.missing_from_table.len());
            println!("  Unused ids: {}", summary.unused_table_ids);
            println!("\nScale:");
            println!("  Correction factor: {}", summary.correction_factor);
            println!("  Max value: {:.3}", summary.max_value);
            println!("  Display bound: {}", summary.display_bound.max);

            if save_summary.unwrap_or(config.output.save_summary) {
                let output_dir = PathBuf::from(&config.output.directory);
                fs::create_dir_all(&output_dir)?;
                let summary_path = output_dir.join(format!("summary_{}.json", summary.metric_column));
                let summary_json = serde_json::to_string_pretty(&summary)?;
                fs::write(&summary_path, summary_json)
                    .with_context(|| format!("writing {}", summary_path.display()))?;
                info!(path = %summary_path.display(), "saved summary");
                println!("Saved summary to {}", summary_path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_from(args: &[&str]) -> StyleArgs {
        let base = ["regionheat", "render", "--volume", "v.tif", "--table", "t.csv", "-s", "0"];
        let cli = Cli::try_parse_from(base.iter().chain(args)).unwrap();
        match cli.command {
            Commands::Render { style, .. } => style,
            _ => unreachable!("parsed a render command"),
        }
    }

    fn configured() -> FigureParams {
        FigureParams {
            flip_x: true,
            flip_y: true,
            hide_axes: true,
            ..FigureParams::default()
        }
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut params = configured();
        style_from(&[]).apply(&mut params).unwrap();
        assert!(params.flip_x && params.flip_y && params.hide_axes);
    }

    #[test]
    fn flags_can_switch_config_values_off() {
        let mut params = configured();
        style_from(&["--flip-x=false", "--hide-axes=false"])
            .apply(&mut params)
            .unwrap();
        assert!(!params.flip_x);
        assert!(params.flip_y);
        assert!(!params.hide_axes);
    }

    #[test]
    fn bare_flags_switch_values_on() {
        let mut params = FigureParams::default();
        style_from(&["--flip-y", "--hide-axes"])
            .apply(&mut params)
            .unwrap();
        assert!(!params.flip_x);
        assert!(params.flip_y);
        assert!(params.hide_axes);
    }
}
