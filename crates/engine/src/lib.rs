pub mod replay;
pub mod summary;

pub use replay::*;
pub use summary::*;
