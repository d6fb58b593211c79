//! 浏览器适配层
//!
//! 核心库传输与存储抽象的浏览器实现，以及基于 History API 的路由服务。

mod file;
mod http;
pub mod router;
mod storage;

pub use file::{SelectedFile, read_selected, revoke_preview};
pub use http::FetchClient;
pub use storage::BrowserStorage;
