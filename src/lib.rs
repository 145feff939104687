//! colorsite finds color expressions in OPENRNDR Kotlin source, decodes them
//! to a canonical color and writes picked colors back in the model the
//! expression already uses.
//!
//! ```no_run
//! use colorsite::{ColorProvider, SourceFile};
//!
//! let file = SourceFile::parse("import org.openrndr.color.*\nval c = ColorRGBa.RED\n").unwrap();
//! for swatch in ColorProvider::default().colors(&file) {
//!     println!("{:?} {:?}", swatch.range, swatch.color.to_rgba8());
//! }
//! ```

#![deny(missing_docs)]

pub mod color;
pub mod config;
pub mod constant;
pub mod descriptor;
pub mod document;
pub mod encode;
pub mod error;
pub mod library;
pub mod math;
pub mod models;
pub mod pattern;
pub mod presets;
pub mod provider;
pub mod resolve;
pub mod syntax;

#[cfg(test)]
mod test;

pub use color::{Component, Linearity, Rgba};
pub use config::ProviderConfig;
pub use document::{Document, TextDocument, TextEdit};
pub use error::{EditError, HexFormatError, ParseError};
pub use provider::{ColorProvider, ColorSwatch};
pub use syntax::SourceFile;
