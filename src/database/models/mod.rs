pub mod category;
pub mod collection;

pub use category::{Category, CategoryChanges, CategoryFilter, CategoryRow, NewCategory};
pub use collection::{Collection, CollectionChanges, CollectionFilter, CollectionRow, NewCollection};
