pub mod display;
pub mod file_operations;
pub mod markdown;
pub mod prompt;
pub mod retry;

pub use display::*;
pub use file_operations::*;
pub use markdown::*;
pub use prompt::*;
pub use retry::*;
