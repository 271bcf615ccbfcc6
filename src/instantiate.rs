use derive_builder::Builder;
use fs_extra::file::CopyOptions;
use std::{
    fs::{File, FileTimes},
    path::{Path, PathBuf},
};

use crate::{error::Error, info, template::TemplateName, trace, workspace::Workspace};

/// One instantiation, as asked for on the command line.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Request {
    /// Empty when no template option was given.
    #[builder(default)]
    pub template: TemplateName,

    pub output: PathBuf,

    /// Positional arguments after the output path.
    #[builder(default)]
    pub ignored: Vec<PathBuf>,
}

impl Request {
    /// Create a new [`Request`] builder
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }
}

/// Copies the requested template into a new file, returning where it landed.
///
/// # Errors
///
/// Fails without touching the filesystem if the template does not exist or
/// the output path is taken. A failure during the copy itself may leave a
/// partially written output behind.
pub fn instantiate(workspace: &Workspace, request: &Request) -> Result<PathBuf, Error> {
    let template = workspace.template(&request.template)?;
    let output = workspace.output_path(&request.output);

    // A dangling symlink still occupies the name.
    if output.symlink_metadata().is_ok() {
        return Err(Error::OutputExists {
            path: request.output.clone(),
        });
    }

    if !request.ignored.is_empty() {
        trace!("Ignoring extra arguments: {:?}", request.ignored);
    }

    info!(
        "Instantiating `{}` template as `{}`",
        template.name,
        request.output.display()
    );

    archive_copy(&template.path, &output).map_err(|source| Error::Copy {
        template: template.path.clone(),
        output: request.output.clone(),
        source,
    })?;

    trace!("Wrote {}", output.display());

    Ok(output)
}

/// Copies contents and permissions, then carries over the access and
/// modification times. Never replaces an existing `to`.
fn archive_copy(from: &Path, to: &Path) -> std::io::Result<()> {
    let options = CopyOptions::new();

    fs_extra::file::copy(from, to, &options).map_err(std::io::Error::other)?;

    let meta = from.metadata()?;
    let mut times = FileTimes::new().set_modified(meta.modified()?);

    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }

    // Setting times needs a writable handle on Windows. Unix only needs ownership.
    File::options()
        .write(true)
        .open(to)
        .or_else(|_| File::open(to))?
        .set_times(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::TEMPLATES_DIR;
    use std::{
        fs,
        time::{Duration, SystemTime},
    };
    use tempfile::TempDir;

    fn workspace_with(templates: &[(&str, &str)]) -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(TEMPLATES_DIR)).unwrap();

        for (name, contents) in templates {
            fs::write(
                dir.path().join(TEMPLATES_DIR).join(format!("template.{name}")),
                contents,
            )
            .unwrap();
        }

        let ws = Workspace::open(dir.path()).unwrap();
        (dir, ws)
    }

    fn request(template: &str, output: &str) -> Request {
        Request::builder()
            .template(template.parse::<TemplateName>().unwrap())
            .output(output)
            .build()
            .unwrap()
    }

    #[test]
    fn copies_byte_for_byte() {
        let (dir, ws) = workspace_with(&[("py", "print(\"hi\")\n")]);

        let out = instantiate(&ws, &request("py", "out.py")).unwrap();

        assert_eq!(out, dir.path().join("out.py"));
        assert_eq!(fs::read(&out).unwrap(), b"print(\"hi\")\n");
    }

    #[test]
    fn refuses_existing_output() {
        let (dir, ws) = workspace_with(&[("py", "print(\"hi\")\n")]);
        let out = dir.path().join("out.py");
        fs::write(&out, "keep me").unwrap();

        match instantiate(&ws, &request("py", "out.py")) {
            Err(Error::OutputExists { path }) => assert_eq!(path, PathBuf::from("out.py")),
            other => panic!("unexpected result: {other:?}"),
        }

        assert_eq!(fs::read_to_string(&out).unwrap(), "keep me");
    }

    #[test]
    fn missing_template_writes_nothing() {
        let (dir, ws) = workspace_with(&[("py", "")]);

        assert!(matches!(
            instantiate(&ws, &request("rs", "main.rs")),
            Err(Error::TemplateNotFound { .. })
        ));
        assert!(!dir.path().join("main.rs").exists());
    }

    #[test]
    fn unset_template_falls_through_to_lookup() {
        let (_dir, ws) = workspace_with(&[("py", "")]);
        let req = Request::builder().output("out").build().unwrap();

        match instantiate(&ws, &req) {
            Err(Error::TemplateNotFound { name, available }) => {
                assert_eq!(name, TemplateName::unset());
                assert_eq!(available, vec!["py".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn copy_failure_is_reported() {
        let (_dir, ws) = workspace_with(&[("py", "x")]);

        assert!(matches!(
            instantiate(&ws, &request("py", "no/such/dir/out.py")),
            Err(Error::Copy { .. })
        ));
    }

    #[test]
    fn keeps_modification_time() {
        let (dir, ws) = workspace_with(&[("md", "# notes\n")]);
        let template = dir.path().join("templates/template.md");
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);

        File::options()
            .write(true)
            .open(&template)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let out = instantiate(&ws, &request("md", "notes.md")).unwrap();

        assert_eq!(fs::metadata(out).unwrap().modified().unwrap(), past);
    }

    #[cfg(unix)]
    #[test]
    fn read_only_template_keeps_mode_and_time() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, ws) = workspace_with(&[("txt", "frozen\n")]);
        let template = dir.path().join("templates/template.txt");
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_200_000_000);

        File::options()
            .write(true)
            .open(&template)
            .unwrap()
            .set_modified(past)
            .unwrap();
        fs::set_permissions(&template, fs::Permissions::from_mode(0o444)).unwrap();

        let out = instantiate(&ws, &request("txt", "frozen.txt")).unwrap();
        let meta = fs::metadata(&out).unwrap();

        assert_eq!(meta.permissions().mode() & 0o777, 0o444);
        assert_eq!(meta.modified().unwrap(), past);
        assert_eq!(fs::read_to_string(out).unwrap(), "frozen\n");
    }

    #[cfg(unix)]
    #[test]
    fn keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, ws) = workspace_with(&[("sh", "#!/bin/sh\necho hi\n")]);
        let template = dir.path().join("templates/template.sh");
        fs::set_permissions(&template, fs::Permissions::from_mode(0o750)).unwrap();

        let out = instantiate(&ws, &request("sh", "run.sh")).unwrap();

        assert_eq!(
            fs::metadata(out).unwrap().permissions().mode() & 0o777,
            0o750
        );
    }
}
