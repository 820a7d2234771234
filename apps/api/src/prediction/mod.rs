pub mod artifacts;
pub mod ensemble;
pub mod handlers;
