pub mod aggregate;
pub mod summary;

use anyhow::{Context, Result};
use tracing::info;
use vansetu::{read_records_file, CorridorSet};

use crate::cli::AggregateArgs;

/// Load records and run the aggregation described by `args`.
pub(crate) fn load_and_aggregate(args: &AggregateArgs) -> Result<CorridorSet> {
    let config = args.corridor_config()?;

    info!(path = %args.records.display(), "loading records");
    let records = read_records_file(&args.records)?;

    let mut set = vansetu::aggregate(&records, args.mode.into(), &config)
        .context("[aggregate] invalid configuration")?;
    if args.classify { set.classify() }

    for diagnostic in &set.diagnostics {
        tracing::debug!("{diagnostic}");
    }
    Ok(set)
}

/// Write pretty JSON to the output file, or stdout when none is given.
pub(crate) fn write_json(value: &serde_json::Value, output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("[write_json] creating {}", path.display()))?;
            serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)
                .with_context(|| format!("[write_json] writing {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            let stdout = std::io::stdout();
            serde_json::to_writer_pretty(stdout.lock(), value).context("[write_json] writing stdout")?;
            println!();
        }
    }
    Ok(())
}
