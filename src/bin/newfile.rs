use newfile::{
    args::{Action, Args},
    error, internal, instantiate, Error, Severity, Workspace,
};
use std::process::ExitCode;

fn app() -> Result<(), Error> {
    // The templates directory is checked before any argument, help included.
    let workspace = Workspace::current()?;

    match Args::action_from(std::env::args_os())? {
        Action::Show(usage) => usage.print().map_err(|e| Error::Internal {
            message: format!("failed to print usage: {e}"),
        }),
        Action::Instantiate(request) => instantiate(&workspace, &request).map(|_| ()),
    }
}

fn main() -> ExitCode {
    match app() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.severity() {
                Severity::Error => error!("{e}"),
                Severity::Internal => internal!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}
