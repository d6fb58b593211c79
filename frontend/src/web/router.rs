//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："监听 -> 守卫 -> 处理 -> 加载"，守卫规则来自 `pressroom::guard`。

use leptos::prelude::*;
use pressroom::{AppRoute, SessionSnapshot, guard};
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新，会话状态以注入的信号提供。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 会话快照（注入的信号）
    session: Signal<SessionSnapshot>,
}

impl RouterService {
    fn new(session: Signal<SessionSnapshot>) -> Self {
        let path = current_path();
        let target = AppRoute::from_path(&path);
        let resolved = guard::resolve(target.clone(), &session.get_untracked());
        if resolved != target {
            replace_history_state(&resolved.to_path());
        }
        let (current_route, set_route) = signal(resolved);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.go(path, true);
    }

    /// 替换当前历史记录的导航，用于表单提交后的跳转
    pub fn replace(&self, path: &str) {
        self.go(path, false);
    }

    fn go(&self, path: &str, use_push: bool) {
        let target = AppRoute::from_path(path);
        let resolved = guard::resolve(target.clone(), &self.session.get_untracked());

        // 未知路径保留原地址，其余使用规范路径
        let url = if resolved == target && target == AppRoute::NotFound {
            path.to_string()
        } else {
            resolved.to_path()
        };
        if resolved != target {
            tracing::info!(from = %target, to = %resolved, "navigation redirected");
        }

        if use_push {
            push_history_state(&url);
        } else {
            replace_history_state(&url);
        }
        self.set_route.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑
            let resolved = guard::resolve(target.clone(), &session.get_untracked());
            if resolved != target {
                replace_history_state(&resolved.to_path());
            }
            set_route.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话状态变化时重新评估当前路由
    ///
    /// 启动校验结束、登录、注销或会话过期都会经过这里。
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let snapshot = session.get();
            let route = current_route.get_untracked();
            let resolved = guard::resolve(route.clone(), &snapshot);

            if resolved != route {
                tracing::info!(from = %route, to = %resolved, "session changed, redirecting");
                push_history_state(&resolved.to_path());
                set_route.set(resolved);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<SessionSnapshot>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    // 组件树外调用属于编程错误
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话快照信号
    session: Signal<SessionSnapshot>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不刷新页面
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        // 保留新标签页打开等浏览器默认行为
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
