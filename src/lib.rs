mod block;
mod config;
mod error;
mod html;
mod inline;
mod parser;

pub use block::{BlockContext, Line};
pub use config::{CONFIG_FILE_NAME, Config, ConfigError};
pub use error::{Error, Result};
pub use html::HtmlRenderer;
pub use inline::{Decoration, Decorator, Unterminated, decorate};

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Parse markdown text into one classified line per input line.
pub fn parse(markdown: &str) -> Vec<Line<'_>> {
    parser::parse(markdown)
}

/// Convert markdown to HTML using the compiled default config.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    markdown_to_html_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to HTML with a custom config.
pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> Result<String> {
    let mut renderer = HtmlRenderer::new(Vec::new(), config);
    for line in markdown.lines() {
        renderer.push_line(line)?;
    }
    let html = renderer.finish()?;
    Ok(String::from_utf8_lossy(&html).into_owned())
}

/// Stream `reader` line by line into `writer` as HTML, returning the writer.
pub fn convert<R: BufRead, W: Write>(reader: R, writer: W, config: &Config) -> Result<W> {
    let mut renderer = HtmlRenderer::new(writer, config);
    for line in reader.lines() {
        renderer.push_line(&line?)?;
    }
    renderer.finish()
}

/// Convert the markdown file at `input` into an HTML file at `output`.
///
/// Output goes to a temporary file next to `output` and is renamed into place
/// only once the whole document converted, so a failure leaves no output file.
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<()> {
    // Open input file
    let source = File::open(input).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::InputNotFound {
            path: input.to_path_buf(),
        },
        _ => Error::from(e),
    })?;

    // Stage output next to its final path so the rename stays on one filesystem
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode `File::create` would give, still subject to umask
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;

    convert(BufReader::new(source), BufWriter::new(&mut tmp), config)?;

    // Replacing an existing output keeps its mode
    if let Ok(metadata) = fs::metadata(output) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }

    tmp.persist(output).map_err(|e| e.error)?;
    log::info!("converted {} -> {}", input.display(), output.display());
    Ok(())
}
