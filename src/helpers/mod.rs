//! Helper functions shared by the generator, the templates and the CLI

mod date;
mod url;

pub use date::*;
pub use url::*;
