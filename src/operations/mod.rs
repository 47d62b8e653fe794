pub mod modification;
pub mod offset;
pub mod query;
