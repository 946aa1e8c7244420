pub mod batch_accumulator;
pub mod batch_config;
pub mod batch_driver;
pub use batch_accumulator::*;
pub use batch_config::*;
pub use batch_driver::*;
