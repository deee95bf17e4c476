pub mod contract;
pub mod metadata;

pub use contract::{ContractBuilder, ContractScope, ContractSettings};
pub use metadata::{MetadataCatalog, MetadataSource};
