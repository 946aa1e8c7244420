pub mod batch_output;
pub mod coordinate_file;
pub mod svg_plot;
pub use batch_output::*;
pub use coordinate_file::*;
pub use svg_plot::*;
