//! Builds the résumé PDF by handing the typst document to the `typst`
//! compiler. The compiler's output goes straight to our console and its exit
//! code is passed back to the caller untouched.

use crate::config::{self, PdfSettings};
use log::debug;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Compiles the PDF described by `settings` and returns the path it was
/// written to. The YAML document is validated before the output directory is
/// created or the compiler is started.
pub fn build_pdf(settings: &PdfSettings) -> Result<PathBuf> {
    let pdf_filename = config::pdf_filename(&settings.data_file)?;
    let output_path = settings.output_directory.join(pdf_filename);

    std::fs::create_dir_all(&settings.output_directory).map_err(|err| {
        Error::CreateOutputDirectory {
            path: settings.output_directory.clone(),
            err,
        }
    })?;

    let args = compiler_args(settings, &output_path);
    debug!("running {} {:?}", settings.compiler.display(), args);
    let status = Command::new(&settings.compiler)
        .args(&args)
        .status()
        .map_err(|err| Error::Spawn {
            program: settings.compiler.clone(),
            err,
        })?;

    if !status.success() {
        return Err(Error::Compiler {
            code: status.code(),
        });
    }
    Ok(output_path)
}

/// The arguments for `typst compile`, in order: project root, input document,
/// font directory, output file.
pub fn compiler_args(settings: &PdfSettings, output_path: &Path) -> Vec<OsString> {
    vec![
        "compile".into(),
        "--root".into(),
        settings.root.clone().into_os_string(),
        settings.document.clone().into_os_string(),
        "--font-path".into(),
        settings.font_path.clone().into_os_string(),
        output_path.as_os_str().to_owned(),
    ]
}

/// The result of building the PDF.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem building the PDF.
#[derive(Debug)]
pub enum Error {
    /// Returned when the YAML document can't be loaded or lacks
    /// `pdf_filename`.
    Config(config::Error),

    /// Returned when the output directory can't be created.
    CreateOutputDirectory { path: PathBuf, err: std::io::Error },

    /// Returned when the compiler can't be started.
    Spawn {
        program: PathBuf,
        err: std::io::Error,
    },

    /// Returned when the compiler exits unsuccessfully. `code` is `None` when
    /// the compiler was killed by a signal.
    Compiler { code: Option<i32> },
}

impl Error {
    /// The exit status the process should terminate with: the compiler's own
    /// code when it ran and failed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Compiler { code: Some(code) } => *code,
            _ => 1,
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::CreateOutputDirectory { path, err } => {
                write!(f, "Creating output directory '{}': {}", path.display(), err)
            }
            Error::Spawn { program, err } => {
                write!(f, "Running '{}': {}", program.display(), err)
            }
            Error::Compiler { code: Some(code) } => {
                write!(f, "Typst compilation failed with exit code {}", code)
            }
            Error::Compiler { code: None } => {
                write!(f, "Typst compilation was terminated by a signal")
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::CreateOutputDirectory { path: _, err } => Some(err),
            Error::Spawn { program: _, err } => Some(err),
            Error::Compiler { .. } => None,
        }
    }
}

impl From<config::Error> for Error {
    /// Converts a [`config::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when loading the YAML document.
    fn from(err: config::Error) -> Error {
        Error::Config(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    fn settings(dir: &TempDir, yaml: &str, compiler: &str) -> PdfSettings {
        let data_file = dir.path().join("data.yaml");
        std::fs::write(&data_file, yaml).unwrap();
        PdfSettings {
            data_file,
            output_directory: dir.path().join("public"),
            compiler: PathBuf::from(compiler),
            ..PdfSettings::default()
        }
    }

    #[test]
    fn test_compiler_args() {
        let args = compiler_args(&PdfSettings::default(), Path::new("public/cv.pdf"));
        let wanted: Vec<OsString> = [
            "compile",
            "--root",
            ".",
            "typst/cv.typ",
            "--font-path",
            "typst/fonts/",
            "public/cv.pdf",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(wanted, args);
    }

    #[test]
    fn test_missing_pdf_filename_fails_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        // A compiler that doesn't exist would fail with `Spawn` if reached.
        let settings = settings(&dir, "author: Jane Doe\n", "/nonexistent/typst");
        match build_pdf(&settings) {
            Err(Error::Config(config::Error::MissingField { field, .. })) => {
                assert_eq!("pdf_filename", field)
            }
            other => panic!("expected missing field, got {:?}", other),
        }
        assert!(!settings.output_directory.exists());
    }

    #[test]
    fn test_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(&dir, "pdf_filename: cv.pdf\n", "/nonexistent/typst");
        let err = build_pdf(&settings).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert_eq!(1, err.exit_code());
        assert!(settings.output_directory.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_success() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(&dir, "pdf_filename: cv.pdf\n", "true");
        assert_eq!(dir.path().join("public").join("cv.pdf"), build_pdf(&settings)?);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_compiler_exit_code_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(&dir, "pdf_filename: cv.pdf\n", "false");
        let err = build_pdf(&settings).unwrap_err();
        assert!(matches!(err, Error::Compiler { code: Some(1) }));
        assert_eq!(1, err.exit_code());
    }

    #[test]
    fn test_compiler_error_message() {
        assert_eq!(
            "Typst compilation failed with exit code 2",
            Error::Compiler { code: Some(2) }.to_string()
        );
        assert_eq!(
            "Typst compilation was terminated by a signal",
            Error::Compiler { code: None }.to_string()
        );
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(3, Error::Compiler { code: Some(3) }.exit_code());
        assert_eq!(1, Error::Compiler { code: None }.exit_code());
    }
}
