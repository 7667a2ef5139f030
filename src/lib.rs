//! The library code behind the `vitae` résumé site tools. A single YAML
//! document ([`crate::resume::ResumeData`]) drives three independent build
//! steps, each with its own binary:
//!
//! 1. `build-pdf` hands the typst document to the `typst` compiler
//!    ([`crate::pdf`])
//! 2. `generate-favicons` derives the favicon set and `favicon.ico` from the
//!    author's photo ([`crate::favicon`], [`crate::ico`])
//! 3. `render-site` applies a template to the document to produce the HTML
//!    page ([`crate::site`], [`crate::value`], [`crate::links`])
//!
//! Each step reads the document once, runs to completion, and reports the
//! first error it hits. Files written before a failure are left on disk.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod cli;
pub mod config;
pub mod favicon;
pub mod ico;
pub mod links;
pub mod pdf;
pub mod resume;
pub mod site;
pub mod value;

/// Sets up `env_logger` for the binaries. Logs at `info` unless `RUST_LOG`
/// says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}
