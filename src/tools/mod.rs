pub mod base;
pub mod catalog;

pub use base::{Schema, SchemaArray, SchemaNumber, SchemaObject, SchemaString, ToolDescriptor};
pub use catalog::recipe_catalog;
