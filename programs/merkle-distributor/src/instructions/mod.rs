pub use claim::*;
pub use deposit::*;
pub use initialize_factory::*;
pub use new_distributor::*;
pub mod claim;
pub mod deposit;
pub mod initialize_factory;
pub mod new_distributor;
