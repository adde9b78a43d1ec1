//! Convenience re-exports for consumers of this crate.
//!
//! ```
//! use shlink_format::prelude::*;
//! ```

#[doc(inline)]
pub use crate::codepage::Codepage;
pub use crate::error::Error;
pub use crate::guid::Guid;
pub use crate::lnk::{Options, ShellLink};
