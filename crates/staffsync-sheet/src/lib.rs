pub mod cell;
pub mod errors;
pub mod reader;
pub mod writer;

pub use cell::{RawCell, RawRow};
pub use errors::SheetError;
pub use reader::read_first_sheet;
pub use writer::write_table;
