pub mod args;
pub mod error;
pub mod instantiate;
pub mod log;
pub mod template;
pub mod workspace;

pub use error::{Error, Severity};
pub use instantiate::{instantiate, Request};
pub use template::{Template, TemplateName};
pub use workspace::Workspace;
