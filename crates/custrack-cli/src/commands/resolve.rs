//! Identity resolution command

use super::{print_json, CliResult, Context};
use clap::Args;
use custrack_engine::{apply_engine_command, EngineCommand};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Site URL reported by the installation
    #[arg(long)]
    pub site: String,

    /// Licensed-to name reported by the installation
    #[arg(long)]
    pub license: String,
}

pub fn execute(ctx: &Context, args: ResolveArgs) -> CliResult {
    let service = ctx.service()?;
    let result = apply_engine_command(
        EngineCommand::ResolveCustomer {
            site_url: args.site,
            licensed_to: args.license,
        },
        &service,
    )?;
    print_json(&result)
}
