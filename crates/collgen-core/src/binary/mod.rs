//! Little-endian binary primitives shared by the database codecs.

mod reader;
mod writer;

pub use reader::*;
pub use writer::*;
