//! Port traits: the seams between the allocation rule and its collaborators.

pub mod config_port;
pub mod data_port;
pub mod indicator_port;
pub mod log_port;
