pub mod scope_flow;

pub use scope_flow::{parse_rows, ScopeFlow};
