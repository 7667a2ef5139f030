//! Command-line definitions for the binaries. Each binary builds its [`App`]
//! here and turns the matches into library options, so the argument contract
//! can be tested without spawning a process.

use crate::favicon::Options;
use crate::site::Output;
use clap::{crate_version, App, Arg, ArgMatches};
use std::path::PathBuf;

/// The `build-pdf` command. It takes no arguments.
pub fn pdf_app() -> App<'static, 'static> {
    App::new("build-pdf")
        .version(crate_version!())
        .about("Compiles typst/cv.typ into public/<pdf_filename> as named in data.yaml")
}

/// The `generate-favicons` command: a required `DATA` path, `-o`/`--output-dir`
/// (default `.`), and `--no-enhance`.
pub fn favicons_app() -> App<'static, 'static> {
    App::new("generate-favicons")
        .version(crate_version!())
        .about("Generates the favicon set from the photo named in a résumé YAML file")
        .arg(
            Arg::with_name("DATA")
                .help("YAML file with a `photo` field")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output-dir")
                .short("o")
                .long("output-dir")
                .takes_value(true)
                .default_value(".")
                .help("Directory the favicons are written to"),
        )
        .arg(
            Arg::with_name("no-enhance")
                .long("no-enhance")
                .help("Skip sharpening and contrast enhancement"),
        )
}

/// Builds favicon [`Options`] from matches of [`favicons_app`].
pub fn favicon_options(matches: &ArgMatches) -> Options {
    let mut options = Options::new(matches.value_of("DATA").unwrap_or_default());
    if let Some(dir) = matches.value_of("output-dir") {
        options.output_directory = PathBuf::from(dir);
    }
    options.enhance = !matches.is_present("no-enhance");
    options
}

/// The `render-site` command: `TEMPLATE`, `DATA`, and `OUTPUT`, all required.
pub fn site_app() -> App<'static, 'static> {
    App::new("render-site")
        .version(crate_version!())
        .about("Renders a template with résumé data and markdown link conversion")
        .arg(
            Arg::with_name("TEMPLATE")
                .help("Template file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("DATA")
                .help("Résumé YAML file")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Output file path (use \"-\" for stdout)")
                .required(true)
                .index(3),
        )
}

/// The arguments of `render-site`.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteArgs {
    pub template: PathBuf,
    pub data: PathBuf,
    pub output: Output,
}

/// Builds [`SiteArgs`] from matches of [`site_app`].
pub fn site_args(matches: &ArgMatches) -> SiteArgs {
    let arg = |name: &'static str| matches.value_of(name).unwrap_or_default();
    SiteArgs {
        template: PathBuf::from(arg("TEMPLATE")),
        data: PathBuf::from(arg("DATA")),
        output: Output::from(arg("OUTPUT")),
    }
}
