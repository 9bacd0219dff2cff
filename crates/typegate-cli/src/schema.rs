//! `typegate schema` — fetch the JSON-schema bundle for a type.

use clap::Args;

use crate::context::ClientOptions;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Fully-qualified type name, e.g. `example.User`.
    pub type_name: String,
}

pub async fn run_schema(options: &ClientOptions, args: &SchemaArgs) -> anyhow::Result<()> {
    let service = options.schema_service()?;
    let bytes = service.get_schema(&args.type_name).await?;
    // Bundles are already JSON; print them untouched.
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
