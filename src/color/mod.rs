//! Named colors, transfer functions and lookup tables

pub mod lookup_table;
pub mod named;
pub mod transfer;

pub use lookup_table::{create_color_table, make_cell_data, LookupTable};
pub use named::NamedColors;
pub use transfer::{ColorSpace, ColorTransferFunction};
