pub mod flow;
pub mod handlers;
pub mod session;
pub mod stepper;
pub mod store;
