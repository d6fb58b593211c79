//! 会话上下文
//!
//! 持有 token、refresh token 与当前用户，同时写入内存与持久化存储。
//! 网关与会话服务共享同一个上下文（`Rc`），所有变更都会广播 `SessionEvent`，
//! 应用外壳订阅事件来刷新界面或跳转登录页。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use pressroom_shared::protocol::AuthResponse;
use pressroom_shared::{STORAGE_ACCESS_TOKEN, STORAGE_REFRESH_TOKEN, STORAGE_USER, User};
use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

/// 会话变更事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 登录或注册成功
    SignedIn,
    /// access token 已刷新
    Refreshed,
    /// 用户主动注销
    SignedOut,
    /// 收到 401 或启动校验失败，会话被清除
    Expired,
    /// 启动时的会话校验结束
    Hydrated,
}

/// 会话内存状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    /// 启动校验进行中
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// 会话只读快照，供路由守卫与界面使用
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub is_loading: bool,
    pub has_refresh_token: bool,
}

impl SessionSnapshot {
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            user: state.user.clone().filter(|_| state.access_token.is_some()),
            is_authenticated: state.is_authenticated(),
            is_admin: state.is_admin(),
            is_loading: state.loading,
            has_refresh_token: state.refresh_token.is_some(),
        }
    }
}

struct ContextInner<S> {
    store: S,
    state: RefCell<SessionState>,
    /// 每次建立或清除会话时递增
    generation: Cell<u64>,
    subscribers: RefCell<Vec<UnboundedSender<SessionEvent>>>,
}

/// 会话上下文，克隆体共享同一份状态
pub struct SessionContext<S> {
    inner: Rc<ContextInner<S>>,
}

impl<S> Clone for SessionContext<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SessionContext<S> {
    /// 创建上下文并从存储恢复上次的会话
    pub fn new(store: S) -> Self {
        let ctx = Self {
            inner: Rc::new(ContextInner {
                store,
                state: RefCell::new(SessionState::default()),
                generation: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        };
        ctx.restore();
        ctx
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// 从存储重新读取 token 与用户
    ///
    /// 存在 token 时进入 loading，等待启动校验完成。
    pub fn restore(&self) {
        let access_token = self.read(STORAGE_ACCESS_TOKEN);
        let refresh_token = self.read(STORAGE_REFRESH_TOKEN);
        let user = self.read(STORAGE_USER).and_then(|raw| {
            serde_json::from_str::<User>(&raw)
                .map_err(|e| warn!(error = %e, "discarding unreadable persisted user"))
                .ok()
        });

        let mut state = self.inner.state.borrow_mut();
        state.loading = access_token.is_some();
        state.access_token = access_token;
        state.refresh_token = refresh_token;
        state.user = user;
    }

    // --- Reads ---

    pub fn access_token(&self) -> Option<String> {
        self.inner.state.borrow().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.state.borrow().refresh_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// 会话代次，用于判断异步请求返回时会话是否已被替换
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*self.inner.state.borrow())
    }

    // --- Events ---

    /// 订阅会话事件；接收端被丢弃后自动退订
    pub fn subscribe(&self) -> UnboundedReceiver<SessionEvent> {
        let (tx, rx) = unbounded();
        self.inner.subscribers.borrow_mut().push(tx);
        rx
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        debug!(?event, "session event");
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(event).is_ok());
    }

    // --- Mutations ---

    /// 写入新会话，完全覆盖旧值（包括缺失的 refresh token）
    pub(crate) fn establish(&self, auth: AuthResponse) {
        self.write(STORAGE_ACCESS_TOKEN, Some(&auth.access_token));
        self.write(STORAGE_REFRESH_TOKEN, auth.refresh_token.as_deref());
        self.write_user(&auth.user);

        info!(user_id = auth.user.id, "session established");
        {
            let mut state = self.inner.state.borrow_mut();
            state.access_token = Some(auth.access_token);
            state.refresh_token = auth.refresh_token;
            state.user = Some(auth.user);
            state.loading = false;
        }
        self.bump_generation();
        self.emit(SessionEvent::SignedIn);
    }

    /// 只替换 access token
    pub(crate) fn replace_access_token(&self, token: String) {
        self.write(STORAGE_ACCESS_TOKEN, Some(&token));
        self.inner.state.borrow_mut().access_token = Some(token);
        self.emit(SessionEvent::Refreshed);
    }

    pub(crate) fn update_user(&self, user: User) {
        self.write_user(&user);
        self.inner.state.borrow_mut().user = Some(user);
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.inner.state.borrow_mut().loading = loading;
    }

    /// 清除全部会话字段，并以给定事件通知订阅者
    pub fn clear(&self, reason: SessionEvent) {
        for key in [STORAGE_ACCESS_TOKEN, STORAGE_REFRESH_TOKEN, STORAGE_USER] {
            self.write(key, None);
        }
        {
            let mut state = self.inner.state.borrow_mut();
            state.access_token = None;
            state.refresh_token = None;
            state.user = None;
            state.loading = false;
        }
        self.bump_generation();
        info!(?reason, "session cleared");
        self.emit(reason);
    }

    fn bump_generation(&self) {
        self.inner.generation.set(self.inner.generation.get().wrapping_add(1));
    }

    // --- Storage helpers ---

    fn read(&self, key: &str) -> Option<String> {
        match self.inner.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read session storage");
                None
            }
        }
    }

    /// 存储失败只记录日志，不向调用方传播
    ///
    /// 持久化不可用（隐私模式、配额已满）时会话照常进行，
    /// 内存状态仍是本页的唯一依据，只是刷新页面后无法恢复。
    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(v) => self.inner.store.set(key, v),
            None => self.inner.store.remove(key),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "failed to write session storage");
        }
    }

    fn write_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.write(STORAGE_USER, Some(&json)),
            Err(e) => warn!(error = %e, "failed to serialize user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use futures::StreamExt;
    use pressroom_shared::Role;
    use serde_json::json;

    fn user(id: i64, role: Role) -> User {
        serde_json::from_value(json!({
            "id": id,
            "email": format!("u{}@example.com", id),
            "name": format!("User {}", id),
            "role": role.as_str(),
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn auth(token: &str, refresh: Option<&str>, u: User) -> AuthResponse {
        AuthResponse {
            access_token: token.into(),
            refresh_token: refresh.map(str::to_string),
            user: u,
        }
    }

    #[test]
    fn test_restore_from_storage() {
        let u = user(1, Role::Admin);
        let raw = serde_json::to_string(&u).unwrap();
        let store = MemoryStore::with_entries([
            (STORAGE_ACCESS_TOKEN, "tok"),
            (STORAGE_REFRESH_TOKEN, "ref"),
            (STORAGE_USER, raw.as_str()),
        ]);

        let ctx = SessionContext::new(store);
        assert!(ctx.is_authenticated());
        assert!(ctx.is_admin());
        assert!(ctx.is_loading(), "token present means hydration is pending");
        assert_eq!(ctx.refresh_token().as_deref(), Some("ref"));
    }

    #[test]
    fn test_token_without_user_is_not_authenticated() {
        let store = MemoryStore::with_entries([(STORAGE_ACCESS_TOKEN, "tok"), (STORAGE_USER, "{bad")]);
        let ctx = SessionContext::new(store);
        assert!(!ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert_eq!(ctx.access_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_user_without_token_is_not_authenticated() {
        let raw = serde_json::to_string(&user(1, Role::Admin)).unwrap();
        let ctx = SessionContext::new(MemoryStore::with_entries([(STORAGE_USER, raw.as_str())]));
        assert!(!ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert!(!ctx.is_loading());
        assert_eq!(ctx.snapshot().user, None);
    }

    #[test]
    fn test_establish_overwrites_previous_session() {
        let store = MemoryStore::new();
        let ctx = SessionContext::new(store.clone());

        ctx.establish(auth("t1", Some("r1"), user(1, Role::User)));
        ctx.establish(auth("t2", None, user(2, Role::Admin)));

        assert_eq!(store.get(STORAGE_ACCESS_TOKEN).unwrap().as_deref(), Some("t2"));
        assert_eq!(store.get(STORAGE_REFRESH_TOKEN).unwrap(), None);
        let persisted: User = serde_json::from_str(&store.get(STORAGE_USER).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.id, 2);
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = MemoryStore::new();
        let ctx = SessionContext::new(store.clone());
        ctx.establish(auth("t", Some("r"), user(1, Role::User)));

        ctx.clear(SessionEvent::SignedOut);

        assert!(store.is_empty());
        assert_eq!(ctx.state(), SessionState::default());
    }

    #[test]
    fn test_generation_advances_on_establish_and_clear() {
        let ctx = SessionContext::new(MemoryStore::new());
        let start = ctx.generation();

        ctx.establish(auth("t", Some("r"), user(1, Role::User)));
        let signed_in = ctx.generation();
        assert_ne!(signed_in, start);

        ctx.replace_access_token("t2".into());
        ctx.update_user(user(1, Role::Admin));
        assert_eq!(ctx.generation(), signed_in, "refresh keeps the same session");

        ctx.clear(SessionEvent::SignedOut);
        assert_ne!(ctx.generation(), signed_in);
    }

    #[tokio::test]
    async fn test_events_reach_subscribers() {
        let ctx = SessionContext::new(MemoryStore::new());
        let mut rx = ctx.subscribe();

        ctx.establish(auth("t", None, user(1, Role::User)));
        ctx.replace_access_token("t2".into());
        ctx.clear(SessionEvent::Expired);

        assert_eq!(rx.next().await, Some(SessionEvent::SignedIn));
        assert_eq!(rx.next().await, Some(SessionEvent::Refreshed));
        assert_eq!(rx.next().await, Some(SessionEvent::Expired));
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let ctx = SessionContext::new(MemoryStore::new());
        drop(ctx.subscribe());
        let _kept = ctx.subscribe();

        ctx.emit(SessionEvent::Hydrated);
        assert_eq!(ctx.inner.subscribers.borrow().len(), 1);
    }
}
