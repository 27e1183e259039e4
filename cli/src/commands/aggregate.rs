use anyhow::Result;

use crate::cli::{AggregateArgs, Cli};
use crate::commands::{load_and_aggregate, write_json};

pub fn run(_cli: &Cli, args: &AggregateArgs) -> Result<()> {
    let set = load_and_aggregate(args)?;
    tracing::info!(corridors = set.len(), orphans = set.orphan_ids.len(), "writing corridors");
    write_json(&set.to_geojson(), args.output.as_deref())
}
