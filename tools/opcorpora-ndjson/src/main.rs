mod progress;
mod sink;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use opcorpora_parser::{convert_with, ConvertError, XmlEventSource};
use tracing_subscriber::EnvFilter;

use crate::progress::ProgressTracker;
use crate::sink::NdjsonWriter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Flattens the OpenCorpora XML dictionary into NDJSON records")]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "dict.opcorpora.xml")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE", default_value = "dict.ndjson")]
    output: PathBuf,

    /// Log progress every N records (0 disables)
    #[arg(long, value_name = "N", default_value_t = 100_000)]
    progress_every: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    tracing::info!(input = %cli.input.display(), output = %cli.output.display(), "Converting dictionary");

    // 1. Open both ends of the pipeline
    let source = XmlEventSource::from_path(&cli.input)
        .with_context(|| format!("cannot open {}", cli.input.display()))?;
    let file = File::create(&cli.output)
        .with_context(|| format!("cannot create {}", cli.output.display()))?;
    let mut writer = NdjsonWriter::new(BufWriter::new(file));

    // 2. Stream records straight into the output file
    let mut progress = ProgressTracker::new(cli.progress_every);
    let stats = convert_with(source, &mut writer, |stats| progress.observe(stats)).map_err(|e| match e {
        ConvertError::Parse(e) => anyhow::Error::new(e).context(format!("failed to parse {}", cli.input.display())),
        ConvertError::Sink(e) => anyhow::Error::new(e).context(format!("failed to write {}", cli.output.display())),
    })?;

    // 3. Nothing counts as written until the buffer is flushed
    let lines = writer.lines();
    writer
        .finish()
        .with_context(|| format!("failed to flush {}", cli.output.display()))?;

    progress.finish(&stats);
    tracing::info!(lines, output = %cli.output.display(), "NDJSON written");
    Ok(())
}
