//! 会话服务
//!
//! 登录、注册、注销、刷新以及启动时的会话校验。
//! 状态本身存放在 `SessionContext` 中，这里只负责编排。

use pressroom_shared::User;
use tracing::{debug, info, instrument, warn};

use crate::api::AuthApi;
use crate::context::{SessionContext, SessionEvent, SessionSnapshot};
use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::gateway::ApiGateway;
use crate::request::HttpClient;
use crate::storage::KeyValueStore;


pub struct SessionStore<C, S> {
    gateway: ApiGateway<C, S>,
}

impl<C, S> Clone for SessionStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStore> SessionStore<C, S> {
    pub fn new(gateway: ApiGateway<C, S>) -> Self {
        Self { gateway }
    }

    pub fn context(&self) -> &SessionContext<S> {
        self.gateway.session()
    }

    pub fn gateway(&self) -> &ApiGateway<C, S> {
        &self.gateway
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.context().snapshot()
    }

    fn auth(&self) -> AuthApi<'_, C, S> {
        AuthApi::new(&self.gateway)
    }

    /// 登录成功后持久化 token、refresh token 与用户，覆盖旧会话
    ///
    /// 后端拒绝凭据时返回 `InvalidCredentials`，其余错误原样返回。
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let auth = self.auth().login(email, password).await.map_err(|e| {
            match e.kind {
                ErrorKind::Unauthorized | ErrorKind::Validation | ErrorKind::NotFound => {
                    e.into_kind(ErrorKind::InvalidCredentials)
                }
                _ => e,
            }
            .in_op("session.login")
        })?;

        let user = auth.user.clone();
        self.context().establish(auth);
        info!(user_id = user.id, "logged in");
        Ok(user)
    }

    /// 与登录相同的持久化语义；后端的校验错误（如邮箱已存在）原样返回
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str, name: &str) -> ApiResult<User> {
        let auth = self
            .auth()
            .register(email, password, name)
            .await
            .map_err(|e| e.in_op("session.register"))?;

        let user = auth.user.clone();
        self.context().establish(auth);
        info!(user_id = user.id, "registered");
        Ok(user)
    }

    /// 仅清除本地状态，不通知后端
    pub fn logout(&self) {
        self.context().clear(SessionEvent::SignedOut);
    }

    /// 用保存的 refresh token 换取新的 access token
    ///
    /// 只替换 access token；用户与 refresh token 保持不变。
    pub async fn refresh(&self) -> ApiResult<String> {
        let Some(refresh_token) = self.context().refresh_token() else {
            return Err(ApiError::new(
                ErrorKind::NoRefreshToken,
                "No refresh token available",
            )
            .in_op("session.refresh"));
        };

        let generation = self.context().generation();
        let resp = self.auth().refresh(&refresh_token).await.map_err(|e| {
            match e.kind {
                ErrorKind::Unauthorized | ErrorKind::Validation | ErrorKind::NotFound => {
                    e.into_kind(ErrorKind::RefreshRejected)
                }
                _ => e,
            }
            .in_op("session.refresh")
        })?;

        // 请求期间会话已被清除或替换，丢弃结果
        if self.context().generation() != generation {
            warn!("session changed while refreshing, discarding new token");
            return Err(ApiError::new(
                ErrorKind::NoRefreshToken,
                "Session ended before the refresh completed",
            )
            .in_op("session.refresh"));
        }

        self.context().replace_access_token(resp.access_token.clone());
        info!("access token refreshed");
        Ok(resp.access_token)
    }

    /// 启动时用当前 token 向后端校验会话
    ///
    /// 没有 token 时直接结束；校验失败会清除会话。
    /// 无论结果如何都会结束 loading 并发出 `Hydrated`，返回是否已认证。
    pub async fn hydrate(&self) -> bool {
        let ctx = self.context();

        if ctx.access_token().is_none() {
            ctx.set_loading(false);
            ctx.emit(SessionEvent::Hydrated);
            return false;
        }

        ctx.set_loading(true);
        let generation = ctx.generation();
        let result = self.auth().profile().await;
        if ctx.generation() != generation {
            // 校验期间会话已被注销或替换，结果不再对应当前会话
            debug!("session changed during startup check, ignoring result");
        } else {
            match result {
                Ok(user) => {
                    info!(user_id = user.id, "session restored");
                    ctx.update_user(user);
                }
                Err(e) => {
                    warn!(error = %e, "stored session rejected during startup");
                    // 401 已由 gateway 清理；其它错误同样视为会话不可用
                    if ctx.access_token().is_some() {
                        ctx.clear(SessionEvent::Expired);
                    }
                }
            }
        }
        ctx.set_loading(false);
        ctx.emit(SessionEvent::Hydrated);
        ctx.is_authenticated()
    }
}
