//! Pressroom 客户端核心
//!
//! 与运行环境无关的部分：传输与存储抽象、会话、网关、资源接口、路由与守卫。
//! 浏览器前端提供 `HttpClient` 与 `KeyValueStore` 的具体实现。

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod testing;

pub use api::{BlogApi, DashboardStats};
pub use config::ClientConfig;
pub use context::{SessionContext, SessionEvent, SessionSnapshot};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use gateway::ApiGateway;
pub use guard::Access;
pub use request::{HttpClient, HttpRequest, HttpResponse, MultipartFile};
pub use route::{AdminRoute, AppRoute};
pub use session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore};

pub use pressroom_shared as shared;

use tracing::info;

/// 由配置组装一整套客户端：会话上下文、网关、会话服务和资源接口
pub struct Client<C, S> {
    pub config: ClientConfig,
    pub session: SessionStore<C, S>,
    pub api: BlogApi<C, S>,
}

impl<C: HttpClient, S: KeyValueStore> Client<C, S> {
    pub fn new(config: ClientConfig, http: C, store: S) -> Self {
        let context = SessionContext::new(store);
        let gateway = ApiGateway::new(http, &config.api_url, context);
        info!(api_url = %config.api_url, "client initialized");
        Self {
            session: SessionStore::new(gateway.clone()),
            api: BlogApi::new(gateway),
            config,
        }
    }

    pub fn context(&self) -> &SessionContext<S> {
        self.session.context()
    }
}

impl<C, S> Clone for Client<C, S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            session: self.session.clone(),
            api: self.api.clone(),
        }
    }
}
