pub mod admin;
pub mod cache;
pub mod gate;
pub mod response;

pub use admin::AdminSession;
pub use cache::{CacheEntry, SessionCache};
pub use gate::{request_gate, GateDecision, GateOutcome, RequestGate, Resolution};
pub use response::{ApiResponse, ApiResult};
