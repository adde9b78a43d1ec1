//! A decoder for the Microsoft Windows Shell Link (`.lnk`) binary format, built on
//! [`shlink_core`]'s byte cursor.
//!
//! ```no_run
//! use shlink_core::data::{DataCursor, Endian};
//! use shlink_format::ShellLink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("target.lnk")?;
//! let mut cursor = DataCursor::new(bytes, Endian::Little);
//! let link = ShellLink::parse(&mut cursor)?;
//! println!("{:?}", link.string_data.name_string);
//! # Ok(())
//! # }
//! ```

pub mod codepage;
pub mod error;
pub mod guid;
pub mod lnk;
pub mod prelude;
pub mod property_store;

pub use error::Error;
pub use lnk::{Options, ShellLink};
