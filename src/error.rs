use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KontaktError {
    #[error("unsupported picture format for {0:?} (expected .jpg, .jpeg or .png)")]
    UnsupportedPicture(PathBuf),
    #[error("the following error occured when reading '{0:?}': {1}")]
    Io(PathBuf, std::io::Error),
}
