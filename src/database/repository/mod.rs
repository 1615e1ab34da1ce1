pub mod category;
pub mod collection;

pub use category::CategoryRepository;
pub use collection::CollectionRepository;
