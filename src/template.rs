use anyhow::Context;
use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
};
use walkdir::WalkDir;

use crate::error::Error;

/// Every template file is named `template.<name>`.
pub const FILE_PREFIX: &str = "template.";

/// Name selecting a template, restricted to ASCII letters and digits.
///
/// The unset name is empty. It never passes validation but can still be
/// resolved, yielding the path `templates/template.`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateName(String);

impl TemplateName {
    /// The name used when no template option was given.
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{FILE_PREFIX}{}", self.0)
    }
}

impl FromStr for TemplateName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(Error::InvalidTemplateName { name: s.to_owned() })
        }
    }
}

impl Display for TemplateName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A template that was found on disk.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: TemplateName,
    pub path: PathBuf,
}

impl Template {
    /// Resolves `name` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] if `dir/template.<name>` is not a
    /// regular file. The error lists what `dir` does provide.
    pub fn find(dir: &Path, name: &TemplateName) -> Result<Self, Error> {
        let path = dir.join(name.file_name());

        crate::trace!("Looking for template at {}", path.display());

        if path.is_file() {
            return Ok(Template {
                name: name.clone(),
                path,
            });
        }

        let available = available_in(dir).unwrap_or_else(|err| {
            crate::trace!("Could not list templates: {err:#}");
            Vec::new()
        });

        Err(Error::TemplateNotFound {
            name: name.clone(),
            available,
        })
    }
}

/// Names of every template file directly inside `dir`, sorted.
///
/// Files whose suffix is not a valid [`TemplateName`] are skipped.
///
/// # Errors
///
/// This function will return an error if `dir` can not be read.
pub fn available_in(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut res = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry
            .file_name()
            .to_str()
            .and_then(|n| n.strip_prefix(FILE_PREFIX))
        else {
            continue;
        };

        if TemplateName::is_valid(name) {
            res.push(name.to_owned());
        }
    }

    Ok(res)
}
