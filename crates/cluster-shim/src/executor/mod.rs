//! Control task execution module.

mod batch;
mod single;

pub use batch::BatchTaskExecutor;
pub use single::SingleTaskExecutor;
