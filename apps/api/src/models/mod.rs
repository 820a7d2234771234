pub mod institution;
pub mod survey;
