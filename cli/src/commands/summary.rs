use anyhow::Result;

use crate::cli::{AggregateArgs, Cli};
use crate::commands::{load_and_aggregate, write_json};

pub fn run(_cli: &Cli, args: &AggregateArgs) -> Result<()> {
    let summary = load_and_aggregate(args)?.summary();
    write_json(&serde_json::to_value(&summary)?, args.output.as_deref())
}
