pub mod claimed_event;
pub mod factory;
pub mod merkle_distributor;
