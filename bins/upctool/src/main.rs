use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use cellbuf::{Atom, Buffer, CellPart};
use clap::{Parser, Subcommand, ValueEnum};
use geometry::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Import { input, out } => import(&input, out.as_deref()),
        Command::Info { input } => info(&input.load()?),
        Command::ToBase64 { input } => {
            println!("{}", load_file(&input)?.to_base64_string());
            Ok(())
        }
        Command::FromBase64 { text, out } => {
            let buffer = Buffer::from_base64_string(&text)
                .with_context(|| "Failed to decode base64 buffer.")?;
            write_file(&buffer, &out)
        }
        Command::Trace { input, x, y, part } => {
            trace_net(&input.load()?, Atom::new(CellCoord::new(x, y), part.into()))
        }
    }
}

/// Tools for packed-cell layout buffers.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a legacy JSON layout into a binary buffer.
    Import {
        /// The legacy JSON file.
        input: PathBuf,
        /// Where to write the buffer. Defaults to the input path with a `.upcb` extension.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print cell counts and validation issues.
    Info {
        #[command(flatten)]
        input: Input,
    },
    /// Print a binary buffer as base64.
    ToBase64 {
        /// The binary buffer.
        input: PathBuf,
    },
    /// Write a base64 buffer to a binary file.
    FromBase64 {
        /// The base64 text.
        text: String,
        /// The output file.
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Print every atom connected to one atom.
    Trace {
        #[command(flatten)]
        input: Input,
        /// The x coordinate of the seed cell.
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        /// The y coordinate of the seed cell.
        #[arg(long, allow_hyphen_values = true)]
        y: i32,
        /// The layer to start from.
        #[arg(long, value_enum, default_value_t = Part::Metal)]
        part: Part,
    },
}

/// A buffer given as a file or inline base64.
#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct Input {
    /// The binary buffer file.
    file: Option<PathBuf>,
    /// The buffer as base64 text.
    #[arg(short, long)]
    base64: Option<String>,
}

impl Input {
    fn load(&self) -> anyhow::Result<Buffer> {
        match (&self.file, &self.base64) {
            (Some(path), _) => load_file(path),
            (None, Some(text)) => Buffer::from_base64_string(text)
                .with_context(|| "Failed to decode base64 buffer."),
            (None, None) => bail!("no input buffer given"),
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum Part {
    Metal,
    Si,
    EcUpLeft,
    EcDownRight,
}

impl From<Part> for CellPart {
    fn from(value: Part) -> Self {
        match value {
            Part::Metal => CellPart::Metal,
            Part::Si => CellPart::Si,
            Part::EcUpLeft => CellPart::EcUpLeft,
            Part::EcDownRight => CellPart::EcDownRight,
        }
    }
}

fn load_file(path: &Path) -> anyhow::Result<Buffer> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}.", path))?;
    Buffer::from_bytes(&bytes).with_context(|| format!("Failed to decode buffer {:?}.", path))
}

fn write_file(buffer: &Buffer, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}.", parent))?;
    }
    fs::write(path, buffer.to_bytes()).with_context(|| format!("Failed to write {:?}.", path))?;
    tracing::info!(path = ?path, cells = buffer.cell_count(), "wrote buffer");
    Ok(())
}

fn import(input: &Path, out: Option<&Path>) -> anyhow::Result<()> {
    let json =
        fs::read_to_string(input).with_context(|| format!("Failed to read {:?}.", input))?;
    let buffer = Buffer::from_legacy_json(&json)
        .with_context(|| format!("Failed to import legacy layout {:?}.", input))?;
    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("upcb"));
    write_file(&buffer, &out)?;
    println!("imported {} cells into {:?}", buffer.cell_count(), out);
    Ok(())
}

fn info(buffer: &Buffer) -> anyhow::Result<()> {
    println!("cells: {}", buffer.cell_count());
    println!("chunks: {}", buffer.chunk_count());
    match buffer.bounds() {
        Some(bounds) => println!("bounds: {} to {}", bounds.ll(), bounds.ur()),
        None => println!("bounds: empty"),
    }
    let issues = buffer.validate();
    if issues.is_empty() {
        println!("no issues");
    } else {
        println!("{} issues:", issues.len());
        print!("{issues}");
    }
    Ok(())
}

fn trace_net(buffer: &Buffer, seed: Atom) -> anyhow::Result<()> {
    if !buffer.has_atom(seed) {
        bail!("no {} at {}", seed.part, seed.coord);
    }
    let atoms = trace::get_trace_atoms(buffer, seed);
    println!("{} atoms", atoms.len());
    for atom in atoms {
        println!("{atom}");
    }
    Ok(())
}
