//! Renders the résumé page: applies a template to the résumé document and
//! writes the result to a file or to stdout. Templates can call
//! `markdown_links` to turn `[label](url)` text into anchors.
//!
//! Résumé strings reach the template HTML-escaped (see [`crate::value`]), so
//! only the anchors `markdown_links` produces are emitted as markup.

use crate::config;
use crate::links;
use crate::resume::ResumeData;
use gtmpl::{Context, Template, Value};
use log::info;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where rendered output goes.
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl From<&str> for Output {
    /// Converts a command-line argument into an [`Output`]; `-` means stdout.
    fn from(arg: &str) -> Output {
        match arg {
            "-" => Output::Stdout,
            path => Output::File(PathBuf::from(path)),
        }
    }
}

/// Renders the template at `template_file` with the résumé at `data_file`
/// and writes the result to `output`. Parent directories of a file output are
/// created as needed.
pub fn render_site(template_file: &Path, data_file: &Path, output: &Output) -> Result<()> {
    let data = ResumeData::from_file(data_file)?;
    let template = parse_template(template_file)?;
    let html = render(&template, &data)?;

    match output {
        Output::Stdout => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(html.as_bytes())?;
            lock.write_all(b"\n")?;
        }
        Output::File(path) => {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    std::fs::create_dir_all(dir)?;
                }
            }
            File::create(path)?.write_all(html.as_bytes())?;
            info!(
                "Successfully rendered {} -> {}",
                template_file.display(),
                path.display()
            );
        }
    }
    Ok(())
}

/// Applies `template` to `data` and returns the rendered text.
pub fn render(template: &Template, data: &ResumeData) -> Result<String> {
    let context = Context::from(Value::from(data)).map_err(Error::Template)?;
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &context).map_err(Error::Template)?;
    String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
}

/// Loads and parses the template file, with `markdown_links` available to it.
pub fn parse_template(template_file: &Path) -> Result<Template> {
    let contents = std::fs::read_to_string(template_file).map_err(|e| Error::OpenTemplateFile {
        path: template_file.to_owned(),
        err: e,
    })?;
    parse_template_str(&contents)
}

fn parse_template_str(contents: &str) -> Result<Template> {
    let mut template = Template::default();
    template.add_func("markdown_links", markdown_links);
    template.parse(contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

// Template function wrapping `links::markdown_links`. Anything that isn't a
// string is handed back unchanged.
fn markdown_links(args: &[Value]) -> std::result::Result<Value, String> {
    match args {
        [Value::String(text)] => Ok(Value::String(links::markdown_links(text).into_owned())),
        [other] => Ok(other.clone()),
        _ => Err(format!("markdown_links takes 1 argument, got {}", args.len())),
    }
}

/// The result of rendering the site.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for rendering the site.
#[derive(Debug)]
pub enum Error {
    /// Returned when the résumé document can't be loaded.
    Config(config::Error),

    /// Returned for I/O problems while opening the template file.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing the template file.
    ParseTemplate(String),

    /// Returned for errors executing the template.
    Template(String),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
            Error::Template(err) => write!(f, "Template rendering failed: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<config::Error> for Error {
    /// Converts [`config::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: config::Error) -> Error {
        Error::Config(err)
    }
}
