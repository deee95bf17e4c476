pub mod common;
pub mod contract;
pub mod endpoint;
pub mod metadata;

pub use common::{validate_required, GroupQuery};
pub use contract::{get_contract, ContractQuery};
pub use endpoint::{
    get_api, list_apis, patch_api, register_api, unregister_api, ApiListResponse, PatchApiRequest,
};
pub use metadata::{delete_metadata, put_metadata};
