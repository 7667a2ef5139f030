//! Loads the résumé YAML document and pulls out the handful of fields the
//! build steps need. Also defines [`PdfSettings`], the fixed inputs of the PDF
//! build.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The fixed inputs and outputs of the PDF build step. The [`Default`] impl
/// describes the project layout; tests override individual fields.
#[derive(Clone, Debug)]
pub struct PdfSettings {
    /// The YAML document holding `pdf_filename`.
    pub data_file: PathBuf,

    /// The directory the PDF is written into. Created if absent.
    pub output_directory: PathBuf,

    /// The typesetting compiler, looked up on `PATH` when not absolute.
    pub compiler: PathBuf,

    /// The project root handed to the compiler via `--root`.
    pub root: PathBuf,

    /// The typst document to compile.
    pub document: PathBuf,

    /// Extra font directory handed to the compiler via `--font-path`.
    pub font_path: PathBuf,
}

impl Default for PdfSettings {
    fn default() -> Self {
        PdfSettings {
            data_file: PathBuf::from("data.yaml"),
            output_directory: PathBuf::from("public"),
            compiler: PathBuf::from("typst"),
            root: PathBuf::from("."),
            document: PathBuf::from("typst/cv.typ"),
            font_path: PathBuf::from("typst/fonts/"),
        }
    }
}

#[derive(Deserialize)]
struct PdfFields {
    #[serde(default)]
    pdf_filename: Option<String>,
}

#[derive(Deserialize)]
struct PhotoFields {
    #[serde(default)]
    photo: Option<String>,
}

/// Reads the `pdf_filename` field from the YAML document at `path`.
pub fn pdf_filename(path: &Path) -> Result<String> {
    let fields: PdfFields = load(path)?;
    require(fields.pdf_filename, "pdf_filename", path)
}

/// Reads the `photo` field from the YAML document at `path`.
pub fn photo(path: &Path) -> Result<PathBuf> {
    let fields: PhotoFields = load(path)?;
    require(fields.photo, "photo", path).map(PathBuf::from)
}

/// Opens and deserializes the YAML document at `path`. Unknown fields are
/// ignored so each caller only declares what it consumes.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|err| Error::Open {
        path: path.to_owned(),
        err,
    })?;
    serde_yaml::from_reader(file).map_err(|err| Error::DeserializeYaml {
        path: path.to_owned(),
        err,
    })
}

// An empty string is as good as absent.
fn require(value: Option<String>, field: &'static str, path: &Path) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingField {
            field,
            path: path.to_owned(),
        }),
    }
}

/// The result of loading a YAML document.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the YAML document.
#[derive(Debug)]
pub enum Error {
    /// Returned when the document can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the document isn't valid YAML or doesn't match the
    /// expected shape.
    DeserializeYaml {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when a required field is absent or empty.
    MissingField { field: &'static str, path: PathBuf },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening data file `{}`: {}", path.display(), err)
            }
            Error::DeserializeYaml { path, err } => {
                write!(f, "Parsing data file `{}`: {}", path.display(), err)
            }
            Error::MissingField { field, path } => {
                write!(f, "\"{}\" field not found in {}", field, path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml { path: _, err } => Some(err),
            Error::MissingField { .. } => None,
        }
    }
}
