//! Pressroom 博客前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `pressroom::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod admin {
        pub mod categories;
        pub mod dashboard;
        pub mod posts;
        pub mod users;
    }
    pub mod categories;
    pub mod home;
    pub mod layout;
    pub mod login;
    mod media;
    pub mod modal;
    mod post_card;
    pub mod post_detail;
    pub mod post_editor;
    pub mod profile;
    pub mod register;
    pub mod spinner;
    pub mod toast;
}

// 浏览器适配模块
// 核心库的传输与存储 trait 在这里用 gloo / web-sys 实现。
pub(crate) mod web;

use crate::auth::AuthContext;
use crate::components::admin::categories::AdminCategoriesPage;
use crate::components::admin::dashboard::DashboardPage;
use crate::components::admin::posts::AdminPostsPage;
use crate::components::admin::users::AdminUsersPage;
use crate::components::categories::CategoriesPage;
use crate::components::home::HomePage;
use crate::components::layout::{AdminLayout, ClientLayout};
use crate::components::login::LoginPage;
use crate::components::post_detail::PostDetailPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::toast::{ToastHost, provide_toaster};

use leptos::prelude::*;
use pressroom::config::{ENV_API_URL, ENV_REFRESH_INTERVAL};
use pressroom::{AdminRoute, AppRoute, ClientConfig};
use web::router::{Link, Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <ClientLayout><HomePage /></ClientLayout> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Post { slug } => view! {
            <ClientLayout><PostDetailPage slug=slug /></ClientLayout>
        }
        .into_any(),
        AppRoute::Categories => view! { <ClientLayout><CategoriesPage /></ClientLayout> }.into_any(),
        AppRoute::Profile { id } => view! { <ClientLayout><ProfilePage id=id /></ClientLayout> }.into_any(),
        AppRoute::Admin(section) => view! {
            <AdminLayout section=section>
                {move || match section {
                    AdminRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
                    AdminRoute::Posts => view! { <AdminPostsPage /> }.into_any(),
                    AdminRoute::Categories => view! { <AdminCategoriesPage /> }.into_any(),
                    AdminRoute::Users => view! { <AdminUsersPage /> }.into_any(),
                }}
            </AdminLayout>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to="/" class="btn btn-primary">"Back to home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 编译期注入的配置，缺省或非法时退回默认值
fn load_config() -> ClientConfig {
    let lookup = |key: &str| match key {
        ENV_API_URL => option_env!("PRESSROOM_API_URL").map(String::from),
        ENV_REFRESH_INTERVAL => option_env!("PRESSROOM_REFRESH_INTERVAL_SECS").map(String::from),
        _ => None,
    };
    ClientConfig::from_lookup(lookup).unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid build configuration, using defaults");
        ClientConfig::default()
    })
}

/// 会话过期时回到登录页
#[component]
fn SessionListener() -> impl IntoView {
    let auth = auth::use_auth();
    let router = use_router();

    auth.listen(move || router.navigate(&AppRoute::Login.to_path()));
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let config = load_config();
    tracing::info!(api_url = %config.api_url, "starting pressroom");
    let auth_ctx = AuthContext::new(config);
    provide_context(auth_ctx);

    // 2. 全局提示
    provide_toaster();

    // 3. 校验本地保存的会话，并按配置启动定时刷新
    auth_ctx.hydrate();
    auth_ctx.start_refresh_timer();

    view! {
        // 4. 路由器组件：注入会话信号实现守卫
        <Router session=auth_ctx.session_signal()>
            <SessionListener />
            <ToastHost />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
