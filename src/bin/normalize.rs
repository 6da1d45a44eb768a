#[macro_use]
extern crate tracing;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use schema_normalization::{utils, Batch, BatchEntry, Config, NormalizationReport};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Instant,
};

#[derive(Debug, Parser)]
struct Args {
    /// Request file, or a directory of `*.json` request files
    #[clap(short, long, value_parser)]
    input: PathBuf,

    /// Output file (stdout if omitted)
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,

    /// Output format
    #[clap(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Number of threads
    #[clap(short = 't', long)]
    num_threads: Option<usize>,

    /// Refuse universes with more attributes than this
    #[clap(short, long)]
    max_attributes: Option<usize>,

    /// Drop invalid dependencies instead of rejecting the request
    #[clap(long)]
    skip_invalid: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    /// Human-readable summary with the decomposition tree
    Text,
}

fn main() -> Result<()> {
    utils::init_tracing_subscriber("info")?;
    let args = Args::parse();
    info!("args: {:#?}", args);
    utils::setup_rayon(args.num_threads)?;

    let mut config = Config::default().with_skip_invalid_dependencies(args.skip_invalid);
    if let Some(max_attributes) = args.max_attributes {
        config = config.with_max_attributes(max_attributes);
    }

    let begin = Instant::now();
    let batch = Batch::load(&args.input)?;
    let entries = batch.run(&config);
    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    info!(
        "{} requests done in {:?}, {} failed",
        entries.len(),
        begin.elapsed(),
        failed
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    match args.format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &entries)?;
            writeln!(out)?;
        }
        Format::Text => {
            for entry in &entries {
                write_text(&mut out, entry)?;
            }
        }
    }
    out.flush()?;

    Ok(())
}

fn write_text(out: &mut impl Write, entry: &BatchEntry) -> Result<()> {
    writeln!(out, "== {}", entry.source)?;
    match (&entry.report, &entry.error) {
        (Some(report), _) => write_report(out, report)?,
        (None, Some(error)) => writeln!(out, "error: {error}")?,
        (None, None) => {}
    }
    writeln!(out)?;
    Ok(())
}

fn write_report(out: &mut impl Write, report: &NormalizationReport) -> Result<()> {
    let forms = &report.normal_forms;
    let mark = |b: bool| if b { "yes" } else { "no" };
    writeln!(
        out,
        "1NF: {}  2NF: {}  3NF: {}  BCNF: {}",
        mark(forms.is_1nf),
        mark(forms.is_2nf),
        mark(forms.is_3nf),
        mark(forms.is_bcnf)
    )?;

    if report.candidate_keys.is_empty() {
        writeln!(out, "no candidate keys")?;
    }
    for (i, key) in report.candidate_keys.iter().enumerate() {
        writeln!(out, "key {}: {}", i + 1, key)?;
    }
    for c in &report.closures {
        writeln!(out, "{}+ = {}", c.attribute, c.closure)?;
    }
    for violation in &report.violations {
        writeln!(out, "  {violation}")?;
    }

    for table in &report.decomposition {
        writeln!(
            out,
            "table {} {} primary key {}",
            table.name, table.attributes, table.primary_key
        )?;
        for fd in &table.dependencies {
            writeln!(out, "  {fd}")?;
        }
    }
    if let Some(tree) = &report.tree {
        ptree::write_tree(tree, &mut *out)?;
    }
    Ok(())
}
