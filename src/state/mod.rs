//! Form state module

mod forms;
mod selection;
mod toggle;

pub use forms::*;
pub use selection::*;
pub use toggle::*;
