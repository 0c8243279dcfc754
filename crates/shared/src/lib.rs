pub mod domain;
pub mod error;
pub mod filters;
pub mod pagination;
pub mod protocol;
pub mod schema_org;
