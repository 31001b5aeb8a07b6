pub mod process_create_merkle_tree;
pub mod process_distributor_address;
pub mod process_proof;
pub mod process_verify;

pub use process_create_merkle_tree::*;
pub use process_distributor_address::*;
pub use process_proof::*;
pub use process_verify::*;
