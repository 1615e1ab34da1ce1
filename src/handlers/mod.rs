// handlers/mod.rs - Handler tiers
//
// Public (no session) → Pages (behind the request gate) → Admin API (ADMIN
// session checked per handler)
pub mod admin;
pub mod pages;
pub mod public;
