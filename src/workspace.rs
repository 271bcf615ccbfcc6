use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    template::{Template, TemplateName},
};

/// Directory, relative to the working directory, that holds the templates.
pub const TEMPLATES_DIR: &str = "templates";

/// The directory an invocation runs from.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    templates: PathBuf,
}

impl Workspace {
    /// Opens the current working directory as a [`Workspace`].
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the current directory can not be read or has no
    /// `templates` subdirectory.
    pub fn current() -> Result<Self, Error> {
        let cwd = std::env::current_dir().map_err(Error::CurrentDir)?;
        Self::open(cwd)
    }

    /// Opens `root` as a [`Workspace`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTemplatesDir`] if `root/templates` is not a
    /// directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        let templates = root.join(TEMPLATES_DIR);

        crate::trace!("Templates directory: {}", templates.display());

        if !templates.is_dir() {
            return Err(Error::MissingTemplatesDir { cwd: root });
        }

        Ok(Self { root, templates })
    }

    #[must_use]
    pub fn templates_dir(&self) -> &Path {
        self.templates.as_path()
    }

    /// Resolves a template of this workspace by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] if there is no such template.
    pub fn template(&self, name: &TemplateName) -> Result<Template, Error> {
        Template::find(&self.templates, name)
    }

    /// Resolves a caller-supplied output path. Relative paths are taken from
    /// the workspace root.
    #[must_use]
    pub fn output_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}
