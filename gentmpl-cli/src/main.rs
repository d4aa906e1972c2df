//! Command-line wrapper around the `gentmpl` template generation engine
//! (§6 "Command-line surface (thin wrapper, not part of the core)").
//!
//! ```text
//! USAGE:
//!     gentmpl-cli [OPTIONS] --template <PATH> --out <PATH>
//!
//! OPTIONS:
//!     -h, --help                Prints help information
//!     -V, --version             Prints version information
//!     -t, --template <PATH>     Template file to compile
//!     -o, --out <PATH>          Output path (zero-padded document index
//!                               inserted before the final '.' when num > 1)
//!     -n, --num <N>             Number of documents to generate (default: 1)
//!     -s, --start <CONTEXT>     Root context for document 0; later documents
//!                               get start+index (default: 0)
//!         --vars <SPEC>         set_variables spec: none, {k=v,...}, or a
//!                               properties file path (default: none)
//!         --format <FMT>        Output format tag, passed through as-is
//!     -v, --verbose             Verbose output
//! ```
//!
//! # Logging
//! Use the `-v` flag or the `RUST_LOG` environment variable to control
//! logging output. `-v` sets the log level to `info` and ignores `RUST_LOG`.
mod plan;

use crate::plan::DocPlan;
use clap::Parser;
use gentmpl::Tree;
use log::{debug, info, LevelFilter};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gentmpl-cli")]
#[command(version)]
#[command(about = "Template generation engine CLI", long_about = None)]
struct Cli {
    /// Template file to compile
    #[arg(short, long)]
    template: PathBuf,

    /// Output path (for num > 1, the zero-padded document index is inserted
    /// before the final '.' in the path)
    #[arg(short, long)]
    out: PathBuf,

    /// Number of documents to generate
    #[arg(short, long, default_value_t = 1)]
    num: u32,

    /// Root context to generate from
    #[arg(short, long, default_value_t = 0)]
    start: i64,

    /// set_variables spec: none, {k=v,...}, or a properties file path
    #[arg(long, default_value = "none")]
    vars: String,

    /// Output format tag (passed through as-is; the engine itself has no
    /// notion of output format beyond the template's own content)
    #[arg(long, default_value = "")]
    format: String,

    /// Verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    cli.main()
}

impl Cli {
    fn main(self) -> io::Result<()> {
        if self.verbose {
            env_logger::builder().filter_level(LevelFilter::Info).init();
            info!("Verbose output enabled (ignoring RUST_LOG environment variable)");
        } else {
            env_logger::init();
            debug!("Logging configured from environment variables");
        }

        if !self.format.is_empty() {
            debug!("Output format tag: {}", self.format);
        }

        let plan = DocPlan::try_new(self.out.clone(), self.num)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let mut tree = Tree::parse_file(&self.template)?;
        tree.set_variables(&self.vars)?;

        for index in 0..plan.len() {
            let context = plan.context_for(self.start, index);
            let path = plan.path_for(index);
            debug!("Generating document {index} (context={context}) to {}", path.display());

            let file = File::create(&path)?;
            let mut writer = BufWriter::new(file);
            let bytes = tree.generate(context, &mut writer)?;
            info!("Wrote {bytes} bytes to {}", path.display());
        }

        info!("Generation complete!");
        Ok(())
    }
}
