/// Name used as the prefix of every diagnostic line.
pub const PROGRAM: &str = env!("CARGO_PKG_NAME");

#[macro_export]
macro_rules! error {
    ($single:ident) => {
        $crate::error!("{}", $single)
    };
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            eprintln!(
                "{}: {}: {}",
                $crate::log::PROGRAM,
                "error".if_supports_color(owo_colors::Stream::Stderr, |s| s
                        .style(owo_colors::Style::new().bold().red())),
                format_args!($($arg)*)
            );
        }
    }
}

/// Reports a broken invariant of the program itself rather than a user mistake.
#[macro_export]
macro_rules! internal {
    ($single:ident) => {
        $crate::internal!("{}", $single)
    };
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            eprintln!(
                "{}: {}: {}",
                $crate::log::PROGRAM,
                "internal error".if_supports_color(owo_colors::Stream::Stderr, |s| s
                        .style(owo_colors::Style::new().bold().magenta())),
                format_args!($($arg)*)
            );
        }
    }
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            println!(
                "{}: {}",
                "info".if_supports_color(owo_colors::Stream::Stdout, |s| s
                        .style(owo_colors::Style::new().bold().green())),
                format_args!($($arg)*)
            );
        }
    }
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            if std::env::var_os("NEWFILE_TRACE").is_some() {
                eprintln!(
                    "{}: {}",
                    "trace".if_supports_color(owo_colors::Stream::Stderr, |s| s
                            .style(owo_colors::Style::new().bold())),
                    format_args!($($arg)*)
                );
            }
        }
    }
}
