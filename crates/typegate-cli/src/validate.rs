//! `typegate validate` — validate a JSON document against a named type.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use crate::context::ClientOptions;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Fully-qualified type name, e.g. `example.User`.
    pub type_name: String,

    /// Path to the JSON payload; `-` reads standard input.
    #[arg(default_value = "-")]
    pub payload: PathBuf,

    /// Registry commit or label to resolve the descriptor at.
    #[arg(long)]
    pub commit: Option<String>,
}

/// Returns `true` when the payload validated cleanly.
pub async fn run_validate(options: &ClientOptions, args: &ValidateArgs) -> anyhow::Result<bool> {
    let payload = read_payload(&args.payload)?;
    let engine = options.validation_engine()?;

    let outcome = engine
        .validate(&args.type_name, &payload, args.commit.as_deref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(outcome.success)
}

fn read_payload(path: &PathBuf) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read(path)?)
    }
}
