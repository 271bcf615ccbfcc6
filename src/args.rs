use clap::error::{ContextKind, ErrorKind};
pub use clap::Parser;
use std::{ffi::OsString, path::PathBuf, str::FromStr};

use crate::{
    error::Error,
    instantiate::{Request, RequestBuilder, RequestBuilderError},
    template::TemplateName,
};

/// Create a new file from a template in ./templates
#[derive(Parser, Debug)]
#[command(
    about,
    override_usage = "newfile [options...] <path>",
    args_override_self = true
)]
pub struct Args {
    /// Name of the template, copied from templates/template.<NAME>
    #[arg(
        short = 't',
        long = "template",
        value_name = "NAME",
        allow_hyphen_values = true,
        value_parser = TemplateName::from_str
    )]
    pub template: Option<TemplateName>,

    /// File to create. Anything after it is ignored
    #[arg(value_name = "PATH", trailing_var_arg = true)]
    pub paths: Vec<PathBuf>,
}

/// What an invocation asks for once its arguments are understood.
#[derive(Debug)]
pub enum Action {
    Instantiate(Request),
    /// Help output, carried by clap as its printable error.
    Show(clap::Error),
}

impl Args {
    /// Parses command line arguments, first one being the program name.
    ///
    /// # Errors
    ///
    /// Returns the usage or validation [`Error`] for the first offending token.
    pub fn action_from<I, T>(args: I) -> Result<Action, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        check_options(&args)?;

        match Self::try_parse_from(args) {
            Ok(args) => args.into_request().map(Action::Instantiate),
            Err(err) => from_clap(err),
        }
    }

    /// Builds the [`Request`] out of the parsed values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingOutput`] if no path was given.
    pub fn into_request(self) -> Result<Request, Error> {
        let mut paths = self.paths.into_iter();
        let mut builder = RequestBuilder::default();

        builder.template(self.template.unwrap_or_default());

        if let Some(output) = paths.next() {
            builder.output(output);
        }

        builder.ignored(paths.collect::<Vec<PathBuf>>());

        builder.build().map_err(|err| match err {
            RequestBuilderError::UninitializedField("output") => {
                Error::MissingOutput
            }
            other => Error::Internal {
                message: format!("incomplete request: {other}"),
            },
        })
    }
}

/// Walks the option tokens ahead of clap, which would otherwise take `--`,
/// `-`, clustered shorts (`-tpy`, `-hx`) and `-t=<name>`.
///
/// Only `-h`, `--help`, `-t <name>`, `--template <name>` and
/// `--template=<name>` may appear before the first positional argument.
fn check_options(args: &[OsString]) -> Result<(), Error> {
    let mut tokens = args.iter().skip(1);

    while let Some(token) = tokens.next() {
        let lossy = token.to_string_lossy();

        if !lossy.starts_with('-') {
            break;
        }

        match &*lossy {
            "-h" | "--help" => break,
            "-t" | "--template" => {
                if let Some(value) = tokens.next() {
                    check_utf8(value)?;
                }
            }
            long if long.starts_with("--template=") => check_utf8(token)?,
            other => {
                return Err(Error::InvalidOption {
                    option: other.to_owned(),
                })
            }
        }
    }

    Ok(())
}

fn check_utf8(value: &OsString) -> Result<(), Error> {
    match value.to_str() {
        Some(_) => Ok(()),
        None => {
            let lossy = value.to_string_lossy();

            Err(Error::InvalidTemplateName {
                name: lossy
                    .strip_prefix("--template=")
                    .unwrap_or(&*lossy)
                    .to_owned(),
            })
        }
    }
}

fn from_clap(err: clap::Error) -> Result<Action, Error> {
    match err.kind() {
        ErrorKind::DisplayHelp => Ok(Action::Show(err)),
        ErrorKind::UnknownArgument => Err(Error::InvalidOption {
            option: context(&err, ContextKind::InvalidArg),
        }),
        ErrorKind::TooManyValues => Err(Error::InvalidOption {
            option: option_name(&err),
        }),
        ErrorKind::InvalidUtf8 => Err(Error::InvalidTemplateName {
            name: context(&err, ContextKind::InvalidValue),
        }),
        ErrorKind::InvalidValue
        | ErrorKind::NoEquals
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues => Err(Error::MissingOptionArgument {
            option: option_name(&err),
        }),
        ErrorKind::ValueValidation => {
            let name = context(&err, ContextKind::InvalidValue);

            if name.is_empty() {
                Err(Error::MissingOptionArgument {
                    option: option_name(&err),
                })
            } else {
                Err(Error::InvalidTemplateName { name })
            }
        }
        kind => Err(Error::Internal {
            message: format!("unexpected argument parser outcome {kind:?}"),
        }),
    }
}

fn context(err: &clap::Error, kind: ContextKind) -> String {
    err.get(kind).map(ToString::to_string).unwrap_or_default()
}

/// The option itself out of clap's `--template <NAME>` rendering.
fn option_name(err: &clap::Error) -> String {
    context(err, ContextKind::InvalidArg)
        .split_whitespace()
        .next()
        .unwrap_or("--template")
        .to_owned()
}
