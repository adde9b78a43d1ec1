use shlink_core::prelude::*;
use shlink_core::prelude::data::Error as DataError;
use snafu::prelude::*;

/// Error conditions for when parsing a Shell Link.
///
/// Only malformed headers are fatal; every other irregularity this decoder encounters is resolved
/// to an absent field or an empty section and reported through the `log` facade instead (see the
/// module documentation on [`crate::lnk`]).
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Thrown if reading/writing tries to go out of bounds.
    #[snafu(display("Unexpected End-Of-File!"))]
    EndOfFile,
    /// Thrown if the header's declared size isn't exactly 0x4C.
    #[snafu(display("Invalid header size! Expected 0x4C, got {size:#06X}"))]
    InvalidHeaderSize { size: u32 },
}
pub(crate) type Result<T> = core::result::Result<T, Error>;

impl From<DataError> for Error {
    #[inline]
    fn from(error: DataError) -> Self {
        match error {
            DataError::EndOfFile => Self::EndOfFile,
            _ => panic!("Unexpected data::error! Something has gone horribly wrong"),
        }
    }
}
