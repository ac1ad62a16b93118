//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not set up storage backend")]
    Storage,
    #[display("could not open asset catalog")]
    Catalog,
    #[display("could not read {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    #[display("upload failed")]
    Upload,
    #[display("could not render output")]
    Output,
}
