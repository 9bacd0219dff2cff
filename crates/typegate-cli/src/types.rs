//! `typegate types` — list the registry's message types.

use clap::Args;

use crate::context::ClientOptions;

#[derive(Debug, Args)]
pub struct TypesArgs {
    /// Emit the raw JSON listing instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub fn run_types(options: &ClientOptions, args: &TypesArgs) -> anyhow::Result<()> {
    let service = options.schema_service()?;
    let summaries = service.list_types();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for summary in &summaries {
        println!("{:<40} {}", summary.fully_qualified_name, summary.description);
    }
    Ok(())
}
