//! 路由守卫
//!
//! 只依赖会话快照的纯函数，路由服务和 `AdminGuard` 组件共用。

use crate::context::SessionSnapshot;
use crate::route::{AdminRoute, AppRoute};

/// 守卫结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// 启动校验进行中，显示加载状态
    Pending,
    /// 不允许访问，跳转到 `redirect`
    Denied { redirect: AppRoute },
    Granted,
}

/// 评估访问某个路由的权限
pub fn check(route: &AppRoute, session: &SessionSnapshot) -> Access {
    if route.requires_admin() {
        if session.is_loading {
            return Access::Pending;
        }
        if !session.is_admin {
            return Access::Denied {
                redirect: AppRoute::auth_failure_redirect(),
            };
        }
        return Access::Granted;
    }

    if route.should_redirect_when_authenticated() && session.is_authenticated {
        return Access::Denied {
            redirect: landing_route(session),
        };
    }

    Access::Granted
}

/// 登录后的落地页
pub fn landing_route(session: &SessionSnapshot) -> AppRoute {
    if session.is_admin {
        AppRoute::Admin(AdminRoute::Dashboard)
    } else {
        AppRoute::Home
    }
}

/// 沿重定向链走到最终可渲染的路由
///
/// 例如已登录的普通用户访问 `/admin`：先到 `/login`，再到首页。
/// `Pending` 时停在原路由，由页面自己显示加载状态。
pub fn resolve(route: AppRoute, session: &SessionSnapshot) -> AppRoute {
    let mut current = route;
    // 链长度至多为 2，这里留出余量
    for _ in 0..4 {
        match check(&current, session) {
            Access::Denied { redirect } if redirect != current => current = redirect,
            _ => break,
        }
    }
    current
}
