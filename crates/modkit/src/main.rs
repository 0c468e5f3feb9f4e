mod cli;
mod demo;

use std::process::ExitCode;

use clap::Parser;
use core_logging::LoggingBundle;
use log::info;
use modkit_core::{Kernel, Parameters, Result};

use crate::cli::CliArgs;
use crate::demo::Greeter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &CliArgs) -> Result<()> {
    let parameters = match &args.params_file {
        Some(path) => Parameters::from_path(path).await?,
        None => Parameters::default(),
    };
    let kernel = Kernel::with_parameters(parameters.merged(args.overrides()));

    // Logging goes first so later bundles' hooks are already logged.
    kernel
        .add_bundle_with_config(LoggingBundle::new(), args.logging_config())?
        .add_bundle(Greeter)?;

    kernel.init().await?;
    info!("Kernel initialised in context '{}'", context_name(&kernel));

    println!("Bundles:");
    for bundle in kernel.bundles() {
        println!("  - {} ({})", bundle.name(), bundle.phase());
    }
    Ok(())
}

fn context_name(kernel: &Kernel) -> String {
    kernel
        .parameters()
        .context()
        .map(|context| context.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
