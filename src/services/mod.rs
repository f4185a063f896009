pub mod filters;
pub mod query;
