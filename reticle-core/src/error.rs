use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),
}

pub type Result<T> = std::result::Result<T, Error>;
