use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use macvec_format::{decode, parse_hex_row, units_to_bytes, ByteOrder, StorageFormat, TensorData};
use macvec_manifest::{
    Manifest, OperandLayout, ReferenceLayout, DEFAULT_MANIFEST, MANIFEST_FILE_NAME,
};
use macvec_testing::{generate, GenerationPlan};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// macvec - FP8 MAC test vectors and golden references
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate operand and reference hex artifacts
    Generate {
        /// Manifest file (defaults to ./macvec.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of test rows (N)
        #[arg(short = 'n', long)]
        rows: Option<usize>,

        /// Reduction width per row (K)
        #[arg(short = 'k', long)]
        width: Option<usize>,

        /// Byte order of bf16 reference bytes: little or big
        #[arg(short, long)]
        byte_order: Option<String>,

        /// Operand generator seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Operand lines: element or row
        #[arg(long)]
        operand_layout: Option<OperandLayout>,

        /// Reference lines: bytes or word
        #[arg(long)]
        reference_layout: Option<ReferenceLayout>,

        /// Operand A (activations) artifact path
        #[arg(long)]
        activations: Option<PathBuf>,

        /// Operand B (weights) artifact path
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Reference artifact path
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// Write a default macvec.toml
    Init {
        /// Where to write the manifest
        #[arg(default_value = MANIFEST_FILE_NAME)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Decode a hex artifact back into values
    Decode {
        /// Artifact to read
        file: PathBuf,

        /// Element format: narrow or wide
        #[arg(short, long)]
        format: StorageFormat,

        /// Byte order the artifact was written with
        #[arg(short, long, default_value = "little")]
        byte_order: String,

        /// Bytes per hex token (2 for word-layout reference files)
        #[arg(short, long, default_value_t = 1)]
        unit_size: usize,
    },
}

/// Command-line overrides applied on top of the manifest
#[derive(Default)]
struct Overrides {
    rows: Option<usize>,
    width: Option<usize>,
    byte_order: Option<String>,
    seed: Option<u64>,
    operand_layout: Option<OperandLayout>,
    reference_layout: Option<ReferenceLayout>,
    activations: Option<PathBuf>,
    weights: Option<PathBuf>,
    reference: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Generate {
            config,
            rows,
            width,
            byte_order,
            seed,
            operand_layout,
            reference_layout,
            activations,
            weights,
            reference,
        } => {
            let overrides = Overrides {
                rows,
                width,
                byte_order,
                seed,
                operand_layout,
                reference_layout,
                activations,
                weights,
                reference,
            };
            generate_vectors(config.as_deref(), overrides)?;
        }

        Commands::Init { path, force } => {
            init_manifest(&path, force)?;
        }

        Commands::Decode {
            file,
            format,
            byte_order,
            unit_size,
        } => {
            decode_artifact(&file, format, &byte_order, unit_size)?;
        }
    }

    Ok(())
}

/// Load the manifest: explicit path, then ./macvec.toml, then defaults
fn load_manifest(config: Option<&Path>) -> Result<Manifest> {
    if let Some(path) = config {
        info!("Loading manifest from {}", path.display());
        return macvec_manifest::from_path(path)
            .with_context(|| format!("Failed to load manifest {}", path.display()));
    }

    let local = Path::new(MANIFEST_FILE_NAME);
    if local.exists() {
        info!("Loading manifest from ./{}", MANIFEST_FILE_NAME);
        return macvec_manifest::from_path(local)
            .with_context(|| format!("Failed to load ./{}", MANIFEST_FILE_NAME));
    }

    info!("No manifest found, using defaults");
    Ok(Manifest::default())
}

fn apply_overrides(manifest: &mut Manifest, overrides: Overrides) {
    let generator = &mut manifest.generator;
    if let Some(rows) = overrides.rows {
        generator.rows = rows;
    }
    if let Some(width) = overrides.width {
        generator.reduction_width = width;
    }
    if let Some(byte_order) = overrides.byte_order {
        generator.byte_order = byte_order;
    }
    if overrides.seed.is_some() {
        generator.seed = overrides.seed;
    }

    let output = &mut manifest.output;
    if let Some(layout) = overrides.operand_layout {
        output.operand_layout = layout;
    }
    if let Some(layout) = overrides.reference_layout {
        output.reference_layout = layout;
    }
    if let Some(path) = overrides.activations {
        output.activations = path;
    }
    if let Some(path) = overrides.weights {
        output.weights = path;
    }
    if let Some(path) = overrides.reference {
        output.reference = path;
    }
}

/// Generate one complete artifact set
fn generate_vectors(config: Option<&Path>, overrides: Overrides) -> Result<()> {
    let mut manifest = load_manifest(config)?;
    apply_overrides(&mut manifest, overrides);

    let plan = GenerationPlan::from_manifest(&manifest).context("Invalid generation parameters")?;
    let report = generate(&plan).context("Test-vector generation failed")?;

    println!(
        "✅ Generated {} rows x {} MAC vectors (seed {})",
        report.rows, report.reduction_width, report.seed
    );
    println!(
        "   activations: {} ({} lines)",
        plan.paths.activations.display(),
        report.lines.activations
    );
    println!(
        "   weights:     {} ({} lines)",
        plan.paths.weights.display(),
        report.lines.weights
    );
    println!(
        "   reference:   {} ({} lines)",
        plan.paths.reference.display(),
        report.lines.reference
    );

    Ok(())
}

/// Write the commented default manifest
fn init_manifest(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    fs::write(path, DEFAULT_MANIFEST)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {}", path.display());
    Ok(())
}

/// Print every element of a hex artifact with its decoded value
fn decode_artifact(
    file: &Path,
    format: StorageFormat,
    byte_order: &str,
    unit_size: usize,
) -> Result<()> {
    let order: ByteOrder = byte_order.parse()?;
    let contents =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    // Word-layout files hold the little-endian host view of each byte pair
    let mut bytes = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let units = parse_hex_row(line, unit_size)
            .with_context(|| format!("{}:{}", file.display(), line_no + 1))?;
        bytes.extend(units_to_bytes(&units, unit_size, ByteOrder::Little)?);
    }

    let tensor = decode(&bytes, format, order)?;
    info!("Decoded {} {} elements", tensor.len(), format);

    match tensor.data() {
        TensorData::F8E4M3(values) => {
            for value in values {
                println!("{:02X}  {}", value.to_bits(), value);
            }
        }
        TensorData::BF16(values) => {
            for value in values {
                println!("{:04X}  {}", value.to_bits(), value);
            }
        }
        TensorData::F32(values) => {
            for value in values {
                println!("{:08X}  {}", value.to_bits(), value);
            }
        }
    }

    Ok(())
}
