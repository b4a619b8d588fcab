pub mod options;
pub mod story;
pub mod test_case;

pub use options::*;
pub use story::*;
pub use test_case::*;
