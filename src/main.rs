use std::path::{Path, PathBuf};

use clap::Parser;
use markdown2html::{CONFIG_FILE_NAME, Config};

#[derive(Parser)]
#[command(name = "markdown2html")]
#[command(about = "Convert Markdown files to HTML")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output HTML file
    output: PathBuf,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help and --version exit 0
            let code = if e.use_stderr() { 1 } else { 0 };
            if e.print().is_err() {
                eprintln!("{}", e);
            }
            std::process::exit(code);
        }
    };

    // Pick up markdown2html.toml from the working directory, if any
    let config = match Config::load(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Convert markdown to HTML
    if let Err(e) = markdown2html::convert_file(&cli.input, &cli.output, &config) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
