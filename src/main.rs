//! Vocab Filter - vocabulary extraction and filtering
//!
//! Main entry point for the command-line application.

use anyhow::Context;
use clap::Parser;
use std::process;

use vocab_filter::cli::Args;
use vocab_filter::output::{open_destination, write_vocabulary, OutputOptions};
use vocab_filter::processor::{Processor, ProcessorConfig};
use vocab_filter::progress::{print_error, print_success};

fn main() {
    // Usage errors exit with 1; help and version exit with 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    // Set up logging
    if std::env::var_os("RUST_LOG").is_none() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else if !args.quiet {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        for cause in e.chain().skip(1) {
            print_error(&format!("  Caused by: {}", cause));
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    args.validate()?;

    let config = ProcessorConfig::from_args(&args)?;
    let quiet = config.quiet;

    let mut processor = Processor::new(config);
    let vocabulary = processor
        .run(&args.source, &args.exclusions)
        .context("Fatal: could not build vocabulary")?;

    let options = OutputOptions {
        path: args.output.clone(),
        no_header: args.no_header,
        sort: args.sort,
    };
    let dest = open_destination(options.path.as_deref())
        .with_context(|| format!("Could not open output {:?}", options.path))?;
    let written = write_vocabulary(&vocabulary, dest, &options)?;

    if let Some(ref path) = options.path {
        if !quiet {
            print_success(&format!("{} words written to {:?}", written, path));
        }
    }

    if args.stats {
        processor.stats().print_summary(&vocabulary);
    }

    Ok(())
}
