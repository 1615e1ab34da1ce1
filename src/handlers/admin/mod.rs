// handlers/admin/mod.rs - Catalog API handlers
//
// Security Level: ADMIN session, checked per handler through `AdminSession`
// Route Prefix: /api/admin/* (outside the request gate, which skips /api)

pub mod categories;
pub mod collections;
mod utils;

pub use utils::ListQuery;
