//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖于 DOM。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 管理后台子路由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRoute {
    Dashboard,
    Posts,
    Categories,
    Users,
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    Login,
    Register,
    /// 文章详情，按 slug 查找
    Post { slug: String },
    Categories,
    /// 用户主页
    Profile { id: i64 },
    /// 管理后台 (需要管理员)
    Admin(AdminRoute),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 忽略查询串、片段和结尾的 `/`。
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["categories"] => Self::Categories,
            ["posts", slug] => Self::Post {
                slug: (*slug).to_string(),
            },
            ["profile", id] => match id.parse() {
                Ok(id) => Self::Profile { id },
                Err(_) => Self::NotFound,
            },
            ["admin"] => Self::Admin(AdminRoute::Dashboard),
            ["admin", "posts"] => Self::Admin(AdminRoute::Posts),
            ["admin", "categories"] => Self::Admin(AdminRoute::Categories),
            ["admin", "users"] => Self::Admin(AdminRoute::Users),
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Post { slug } => format!("/posts/{}", slug),
            Self::Categories => "/categories".into(),
            Self::Profile { id } => format!("/profile/{}", id),
            Self::Admin(AdminRoute::Dashboard) => "/admin".into(),
            Self::Admin(AdminRoute::Posts) => "/admin/posts".into(),
            Self::Admin(AdminRoute::Categories) => "/admin/categories".into(),
            Self::Admin(AdminRoute::Users) => "/admin/users".into(),
            Self::NotFound => "/404".into(),
        }
    }

    /// **核心守卫逻辑：该路由是否需要管理员**
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// 已认证用户是否应该离开此路由（登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
