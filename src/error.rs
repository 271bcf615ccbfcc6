use std::path::PathBuf;

use crate::template::TemplateName;

/// How a failure is tagged when it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something about the invocation or the filesystem is wrong.
    Error,
    /// The program reached a state its own argument handling should rule out.
    Internal,
}

/// Every way an instantiation can fail. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "no `templates` directory in {}; run from the top-level directory containing templates/",
        .cwd.display()
    )]
    MissingTemplatesDir { cwd: PathBuf },

    #[error("failed to read the current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("missing argument to `{option}`")]
    MissingOptionArgument { option: String },

    #[error("invalid template name `{name}`: only letters A-Z, a-z and digits 0-9 are allowed")]
    InvalidTemplateName { name: String },

    #[error("invalid option `{option}`")]
    InvalidOption { option: String },

    #[error("missing argument; see `{} --help`", crate::log::PROGRAM)]
    MissingOutput,

    #[error("template `{name}` does not exist{}", available_hint(.available))]
    TemplateNotFound {
        name: TemplateName,
        available: Vec<String>,
    },

    #[error("Output file '{}' exists", .path.display())]
    OutputExists { path: PathBuf },

    #[error(
        "failed to copy template {} to {}",
        .template.display(),
        .output.display()
    )]
    Copy {
        template: PathBuf,
        output: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Internal { message: String },
}

impl Error {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Error::Internal { .. } => Severity::Internal,
            _ => Severity::Error,
        }
    }
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::from(" (templates/ holds no templates)")
    } else {
        format!(" (available: {})", available.join(", "))
    }
}
