//! 认证模块
//!
//! 持有客户端核心（会话服务 + 资源接口），把会话快照镜像到一个信号里。
//! 路由服务只依赖这个信号，与认证实现解耦。

use futures::StreamExt;
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom::{BlogApi, Client, ClientConfig, ErrorKind, SessionEvent, SessionSnapshot};

use crate::web::{BrowserStorage, FetchClient};

pub type AppClient = Client<FetchClient, BrowserStorage>;
pub type AppApi = BlogApi<FetchClient, BrowserStorage>;

/// 上次登录使用的邮箱，仅用于自动填充
const STORAGE_LAST_EMAIL_KEY: &str = "pressroom_last_email";

/// 认证上下文
///
/// 客户端核心不是 `Send` 的，放在本地存储的 `StoredValue` 中；
/// 会话快照放在普通信号中供组件和路由订阅。
#[derive(Clone, Copy)]
pub struct AuthContext {
    client: StoredValue<AppClient, leptos::reactive::owner::LocalStorage>,
    /// 会话快照（只读使用）
    pub state: RwSignal<SessionSnapshot>,
}

impl AuthContext {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::new(config, FetchClient, BrowserStorage);
        let state = RwSignal::new(client.session.snapshot());
        Self {
            client: StoredValue::new_local(client),
            state,
        }
    }

    pub fn client(&self) -> AppClient {
        self.client.get_value()
    }

    /// 资源接口
    pub fn api(&self) -> AppApi {
        self.client().api
    }

    pub fn config(&self) -> ClientConfig {
        self.client.with_value(|c| c.config.clone())
    }

    /// 会话快照信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<SessionSnapshot> {
        self.state.into()
    }

    fn sync(&self) {
        let snapshot = self.client.with_value(|c| c.session.snapshot());
        self.state.set(snapshot);
    }

    /// 订阅会话事件，同步快照；会话过期时调用 `on_expired`
    pub fn listen(&self, on_expired: impl Fn() + 'static) {
        let ctx = *self;
        let mut events = self.client.with_value(|c| c.context().subscribe());
        spawn_local(async move {
            while let Some(event) = events.next().await {
                ctx.sync();
                if event == SessionEvent::Expired {
                    on_expired();
                }
            }
        });
    }

    /// 启动时校验已保存的会话
    pub fn hydrate(&self) {
        let ctx = *self;
        let session = self.client().session;
        spawn_local(async move {
            let authenticated = session.hydrate().await;
            tracing::info!(authenticated, "startup session check finished");
            ctx.sync();
        });
    }

    /// 按配置的间隔主动刷新 access token
    ///
    /// 只在持有 refresh token 的会话上触发；被拒绝时结束会话。
    pub fn start_refresh_timer(&self) {
        let Some(interval) = self.config().refresh_interval() else {
            return;
        };
        let ctx = *self;
        let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);

        Interval::new(millis, move || {
            let snapshot = ctx.state.get_untracked();
            if !snapshot.is_authenticated || !snapshot.has_refresh_token {
                return;
            }
            let session = ctx.client().session;
            spawn_local(async move {
                if let Err(e) = session.refresh().await {
                    tracing::warn!(error = %e, "background token refresh failed");
                    if e.kind == ErrorKind::RefreshRejected && session.context().access_token().is_some() {
                        session.context().clear(SessionEvent::Expired);
                    }
                }
            });
        })
        .forget();
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录并保存会话
pub async fn login(ctx: &AuthContext, email: String, password: String) -> pressroom::ApiResult<()> {
    let session = ctx.client().session;
    session.login(&email, &password).await?;
    if let Err(e) = LocalStorage::set(STORAGE_LAST_EMAIL_KEY, &email) {
        tracing::debug!(error = %e, "failed to remember login email");
    }
    ctx.sync();
    Ok(())
}

/// 注册并直接登录
pub async fn register(
    ctx: &AuthContext,
    email: String,
    password: String,
    name: String,
) -> pressroom::ApiResult<()> {
    let session = ctx.client().session;
    session.register(&email, &password, &name).await?;
    ctx.sync();
    Ok(())
}

/// 注销并清除状态
///
/// 导航由路由服务对会话信号的监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.client.with_value(|c| c.session.logout());
    ctx.sync();
}

/// 上次登录的邮箱，方便输入
pub fn remembered_email() -> String {
    LocalStorage::get::<String>(STORAGE_LAST_EMAIL_KEY).unwrap_or_default()
}
