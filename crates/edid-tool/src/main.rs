use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use edid_tool::{hex, inspect, synth, RoundTrip};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use vesa_timing::{GtfParams, ReducedBlanking, TimingParameterSet};

#[derive(Parser)]
#[command(name = "edid-tool")]
#[command(about = "Convert EDID blobs to and from JSON and generate VESA timings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress warnings (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a binary or hex EDID to JSON
    Decode {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,
    },
    /// Encode JSON back to an EDID
    Encode {
        /// Input JSON file (stdin if omitted)
        input: Option<PathBuf>,

        /// Write raw bytes instead of a hex dump
        #[arg(long)]
        binary: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a human-readable summary of an EDID
    Show {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,
    },
    /// Generate a CVT timing
    Cvt {
        #[command(flatten)]
        mode: ModeArgs,

        /// Reduced blanking version: off, v1, v2 or v2-video
        #[arg(long, default_value = "off")]
        reduced_blanking: ReducedBlanking,

        #[command(flatten)]
        dtd: DtdArgs,
    },
    /// Generate a GTF timing
    Gtf {
        #[command(flatten)]
        mode: ModeArgs,

        /// Blanking formula gradient M
        #[arg(long, default_value_t = 600.0)]
        m: f64,

        /// Blanking formula offset C
        #[arg(long, default_value_t = 40.0)]
        c: f64,

        /// Blanking formula scaling factor K
        #[arg(long, default_value_t = 128.0)]
        k: f64,

        /// Scaling factor weighting J
        #[arg(long, default_value_t = 20.0)]
        j: f64,

        #[command(flatten)]
        dtd: DtdArgs,
    },
}

#[derive(Args)]
struct ModeArgs {
    /// Horizontal active pixels
    h_active: u32,

    /// Vertical active lines (frame height when interlaced)
    v_active: u32,

    /// Refresh rate in Hz
    #[arg(default_value_t = 60.0)]
    refresh_rate: f64,

    /// Generate an interlaced mode
    #[arg(long)]
    interlaced: bool,

    /// Add 1.8% margins
    #[arg(long)]
    margins: bool,
}

#[derive(Args)]
struct DtdArgs {
    /// Print the mode as a hex detailed timing descriptor instead of JSON
    #[arg(long)]
    dtd: bool,

    /// Image width in mm for the descriptor
    #[arg(long, default_value_t = 0)]
    h_size: u16,

    /// Image height in mm for the descriptor
    #[arg(long, default_value_t = 0)]
    v_size: u16,
}

fn decode(input: Option<&Path>) -> anyhow::Result<()> {
    let raw = edid_tool::read_input(input).context("Failed to read EDID input")?;
    let decoded = edid_tool::decode(&raw)?;
    match &decoded.round_trip {
        RoundTrip::Exact => {}
        RoundTrip::Differs(out) => log::warn!(
            "EDID did not round-trip\n{}\n ^-- new   v-- orig\n{}",
            hex::hex16(out),
            hex::hex16(&decoded.bytes)
        ),
        RoundTrip::Unwritable(e) => log::warn!("EDID was not re-serializable: {}", e),
    }
    println!("{}", edid_tool::to_json(&decoded.record)?);
    Ok(())
}

fn encode(input: Option<&Path>, binary: bool, output: Option<&Path>) -> anyhow::Result<()> {
    let json = edid_tool::read_input(input).context("Failed to read JSON input")?;
    let bytes = edid_tool::encode_json(&json).context("Serialization failed")?;
    let payload = if binary {
        bytes
    } else {
        let mut text = hex::hex16(&bytes);
        text.push('\n');
        text.into_bytes()
    };
    match output {
        Some(path) => fs::write(path, &payload)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => io::stdout().write_all(&payload)?,
    }
    Ok(())
}

fn show(input: Option<&Path>) -> anyhow::Result<()> {
    let raw = edid_tool::read_input(input).context("Failed to read EDID input")?;
    let decoded = edid_tool::decode(&raw)?;
    for line in inspect::describe(&decoded.record) {
        println!("{}", line);
    }
    Ok(())
}

fn print_timing(timing: &TimingParameterSet, dtd: &DtdArgs) -> anyhow::Result<()> {
    if dtd.dtd {
        let desc = synth::dtd_from_timing(timing, dtd.h_size, dtd.v_size)?;
        let bytes = edid_codec::dtd::encode(&desc)?;
        println!("{}", hex::hex16(&bytes));
    } else {
        println!("{}", serde_json::to_string_pretty(timing)?);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Decode { input } => decode(input.as_deref()),
        Commands::Encode {
            input,
            binary,
            output,
        } => encode(input.as_deref(), binary, output.as_deref()),
        Commands::Show { input } => show(input.as_deref()),
        Commands::Cvt {
            mode,
            reduced_blanking,
            dtd,
        } => {
            let timing = vesa_timing::cvt(
                mode.h_active,
                mode.v_active,
                mode.refresh_rate,
                reduced_blanking,
                mode.interlaced,
                mode.margins,
            )?;
            print_timing(&timing, &dtd)
        }
        Commands::Gtf {
            mode,
            m,
            c,
            k,
            j,
            dtd,
        } => {
            let timing = vesa_timing::gtf(
                mode.h_active,
                mode.v_active,
                mode.refresh_rate,
                mode.interlaced,
                mode.margins,
                &GtfParams { m, c, k, j },
            )?;
            print_timing(&timing, &dtd)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging (suppressed if --quiet)
    if !cli.quiet {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
