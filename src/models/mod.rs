pub mod contract;
pub mod endpoint;
pub mod metadata;
pub mod patch;

pub use contract::*;
pub use endpoint::*;
pub use metadata::*;
pub use patch::*;
