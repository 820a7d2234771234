pub mod handlers;
pub mod insights;
pub mod pdf;
