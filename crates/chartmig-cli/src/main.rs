//! Chartmig CLI - migrate raw Deployment manifests onto shared template helpers

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

mod driver;

#[derive(Parser)]
#[command(name = "chartmig")]
#[command(author = "Chartmig Contributors")]
#[command(version)]
#[command(about = "Rewrites templates/**/deployment.yaml onto shared naming and label helpers", long_about = None)]
struct Cli {
    /// Directory to walk for candidate files
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Rewrite every container name directly under the containers list,
    /// not just the first entry
    #[arg(long)]
    all_containers: bool,

    /// Helper name prefix used in the injected header and includes
    #[arg(long, default_value = "common")]
    helper_prefix: String,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    driver::run(
        &cli.root,
        driver::DriverOptions {
            all_containers: cli.all_containers,
            helper_prefix: cli.helper_prefix,
            dry_run: cli.dry_run,
        },
    )
}
