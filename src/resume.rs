//! Defines the shape of the résumé document ([`ResumeData`]) and its parts.
//! Every list keeps the order it has in the source document.

use crate::config;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use url::Url;

/// The root of the résumé document.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ResumeData {
    pub author: String,
    pub base_url: Url,

    /// Path to the source photo, relative to the project root.
    pub photo: String,

    /// The file name of the generated PDF.
    pub pdf_filename: String,

    pub about: String,

    /// Job titles shown under the author's name.
    pub positions: Vec<String>,

    pub location: String,
    pub contacts: Contact,
    pub experience: Vec<Job>,
    pub education: Vec<Education>,
    pub skills: Skills,
    pub patents: Vec<Patent>,
}

impl ResumeData {
    /// Parses a [`ResumeData`] from the YAML document at `path`.
    pub fn from_file(path: &Path) -> config::Result<ResumeData> {
        config::load(path)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Contact {
    pub email: String,
    pub github: String,
    pub linkedin: String,
}

/// A span of time. A missing `end` means the span is ongoing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: String,

    #[serde(default)]
    pub end: Option<String>,
}

impl DateRange {
    /// Returns `true` if the range has no end, i.e., it runs to the present.
    pub fn is_present(&self) -> bool {
        self.end.is_none()
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Job {
    pub position: String,
    pub company: String,
    pub location: String,
    pub dates: DateRange,
    pub highlights: Vec<String>,

    #[serde(default, rename = "techStack")]
    pub tech_stack: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Education {
    pub institution: String,
    pub major: String,
    pub degree: String,

    #[serde(default)]
    pub honor: Option<bool>,

    #[serde(default)]
    pub graduated: Option<bool>,

    pub dates: DateRange,

    #[serde(default)]
    pub gpa: Option<Gpa>,

    pub highlights: Vec<String>,
}

/// A number or a bit of text, e.g. `4.0` or `"First Class"`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Number(n) => n.fmt(f),
            Scalar::Text(s) => s.fmt(f),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Gpa {
    pub value: Scalar,
    pub max: Scalar,
}

impl fmt::Display for Gpa {
    /// Displays a [`Gpa`] as `value/max`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.max)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Skills {
    pub languages: Vec<Language>,
}

/// A spoken or programming language and the author's proficiency in it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Language {
    pub name: String,
    pub level: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Patent {
    pub code: String,
    pub title: String,
    pub link: String,
}
