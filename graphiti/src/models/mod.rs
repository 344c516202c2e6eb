mod common;
mod graph;
mod memory;
mod search;

pub use common::*;
pub use graph::*;
pub use memory::*;
pub use search::*;
