//! AI Badges CLI
//!
//! Commands: build, list, validate, render
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation or badge failure

use base64::Engine as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use aibadges_core::{
    compute_layout, BackendPreference, BadgePipeline, BadgeSpec, BuildOptions, Catalog,
    FailureMode, OutputDir, PipelineError, Rasterizer, Scale,
};

#[derive(Parser)]
#[command(name = "aibadges-cli", version)]
#[command(about = "AI Badges CLI - disclosure badge compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog JSON file (defaults to the built-in disclosure levels)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Renderer: auto, vector or procedural
    #[arg(short, long, global = true, default_value = "auto")]
    backend: BackendPreference,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging
    #[arg(long, global = true)]
    trace: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate SVGs, PNGs, sprite and manifest
    Build {
        /// Output root; badges/ and sprites/ are created below it
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Keep building after a badge fails and leave it out of the manifest
        #[arg(long)]
        keep_going: bool,

        /// Render threads at once (defaults to the available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List catalog badges with slug and width
    List,

    /// Validate the catalog
    Validate,

    /// Render one label and print SVG and base64 PNG
    Render {
        /// Badge label
        #[arg(short, long)]
        label: String,

        /// Raster scale (1 or 2)
        #[arg(short, long, default_value_t = 1)]
        scale: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let catalog = match Catalog::load_or_default(cli.catalog.as_deref()) {
        Ok(c) => c,
        Err(e) => return fail(ExitCode::FAILURE, &e.to_string()),
    };

    // list and validate never rasterize, so they skip the font probe
    let rasterizer = || Rasterizer::probe(cli.backend);

    match cli.command {
        Commands::List => {
            let badges: Vec<_> = catalog
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "label": b.label,
                        "slug": b.slug(),
                        "width": compute_layout(&b.label).total_width,
                    })
                })
                .collect();
            print_json(&badges)
        }

        Commands::Validate => {
            let pipeline = BadgePipeline::new(Rasterizer::with_renderer(Box::new(
                aibadges_core::raster::ProceduralRenderer,
            )));
            match pipeline.validate_catalog(&catalog) {
                Ok(result) => {
                    let code = print_json(&result);
                    if result.valid {
                        code
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e) => fail(ExitCode::FAILURE, &e.to_string()),
            }
        }

        Commands::Build {
            out,
            keep_going,
            jobs,
        } => {
            let rasterizer = match rasterizer() {
                Ok(r) => r,
                Err(e) => return fail(ExitCode::FAILURE, &e.to_string()),
            };
            let options = BuildOptions {
                failure_mode: if keep_going {
                    FailureMode::Continue
                } else {
                    FailureMode::Abort
                },
                jobs,
            };
            let pipeline = BadgePipeline::with_options(rasterizer, options);

            match pipeline.build(&catalog, &OutputDir::new(out)) {
                Ok(report) => {
                    let code = print_json(&serde_json::json!({
                        "success": report.succeeded(),
                        "report": report,
                    }));
                    if report.succeeded() {
                        code
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e @ (PipelineError::ValidationFailed(_) | PipelineError::Badge { .. })) => {
                    fail(ExitCode::from(2), &e.to_string())
                }
                Err(e) => fail(ExitCode::FAILURE, &e.to_string()),
            }
        }

        Commands::Render { label, scale } => {
            let scale = match Scale::try_from(scale) {
                Ok(s) => s,
                Err(e) => return fail(ExitCode::FAILURE, &e.to_string()),
            };
            let rasterizer = match rasterizer() {
                Ok(r) => r,
                Err(e) => return fail(ExitCode::FAILURE, &e.to_string()),
            };
            let pipeline = BadgePipeline::new(rasterizer);

            match pipeline.compile_badge(&BadgeSpec::new(label)) {
                Ok(badge) => {
                    let Some(png) = badge.raster(scale) else {
                        return fail(ExitCode::FAILURE, "missing raster export");
                    };
                    print_json(&serde_json::json!({
                        "success": true,
                        "slug": badge.slug(),
                        "width": badge.svg.width(),
                        "height": badge.svg.height(),
                        "svg": badge.svg.markup(),
                        "png": {
                            "scale": png.scale,
                            "width": png.width_px,
                            "height": png.height_px,
                            "backend": png.backend,
                            "dataBase64": base64::engine::general_purpose::STANDARD.encode(&png.bytes),
                        },
                    }))
                }
                Err(e) => fail(ExitCode::from(2), &e.to_string()),
            }
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("AIBADGES_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(ExitCode::FAILURE, &format!("Serialization error: {e}")),
    }
}

fn fail(code: ExitCode, message: &str) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": message,
    });
    println!("{output}");
    code
}
