//! Small spreadsheet-data toolkit: jagged-matrix normalization, value
//! interning, CSV encoding, and the date/number/function helpers that go
//! with them.

pub mod config;
pub mod dates;
pub mod encode;
pub mod error;
pub mod func;
pub mod intern;
pub mod matrix;
pub mod pipeline;
pub mod util;

pub use encode::{encode, CsvEncoder};
pub use error::{assert_or_die, AssertionFailure};
pub use intern::{intern, Code, CodeTable, Interned, Interner};
pub use matrix::{Cell, Normalizer, Padding};
