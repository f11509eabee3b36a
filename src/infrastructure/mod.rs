//! 基础设施层
//!
//! 只暴露在页面上执行脚本、读取表格的能力。

pub mod js_executor;
pub mod table_extractor;

pub use js_executor::JsExecutor;
pub use table_extractor::{DomTableExtractor, RecordExtractor};
