//! 页面骨架：前台导航栏与管理后台侧边栏

use leptos::prelude::*;
use pressroom::guard::{self, Access};
use pressroom::{AdminRoute, AppRoute};

use crate::auth::{logout, use_auth};
use crate::components::spinner::PageSpinner;
use crate::web::router::{Link, use_router};

#[component]
pub fn ClientLayout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;

    let user_menu = move || {
        let snapshot = state.get();
        let is_admin = snapshot.is_admin;
        match snapshot.user.filter(|_| snapshot.is_authenticated) {
            Some(user) => view! {
                <div class="dropdown dropdown-end">
                    <div tabindex="0" role="button" class="btn btn-ghost btn-sm">{user.name.clone()}</div>
                    <ul tabindex="0" class="dropdown-content z-[1] menu p-2 shadow bg-base-100 rounded-box w-48">
                        <Show when=move || is_admin>
                            <li><Link to="/admin">"Admin panel"</Link></li>
                        </Show>
                        <li><Link to=format!("/profile/{}", user.id)>"Profile"</Link></li>
                        <li><a class="text-error" on:click=move |_| logout(&auth)>"Sign out"</a></li>
                    </ul>
                </div>
            }
            .into_any(),
            None => view! {
                <Link to="/login" class="btn btn-ghost btn-sm">"Sign in"</Link>
                <Link to="/register" class="btn btn-primary btn-sm">"Sign up"</Link>
            }
            .into_any(),
        }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <header class="navbar bg-base-100 shadow-sm sticky top-0 z-40">
                <div class="flex-1 gap-4">
                    <Link to="/" class="btn btn-ghost text-xl font-serif">"Pressroom"</Link>
                    <nav class="hidden md:flex gap-4 text-sm">
                        <Link to="/" class="link link-hover">"Home"</Link>
                        <Link to="/categories" class="link link-hover">"Categories"</Link>
                    </nav>
                </div>
                <div class="flex-none gap-2">{user_menu}</div>
            </header>
            <main class="max-w-6xl mx-auto p-4 md:p-8">{children()}</main>
        </div>
    }
}

/// 管理后台守卫
///
/// 校验中显示加载，未通过时跳转，通过后渲染子组件。
#[component]
pub fn AdminGuard(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let target = route.clone();
    Effect::new(move |_| {
        if let Access::Denied { redirect } = guard::check(&target, &auth.state.get()) {
            router.replace(&redirect.to_path());
        }
    });

    move || match guard::check(&route, &auth.state.get()) {
        Access::Granted => children().into_any(),
        Access::Pending | Access::Denied { .. } => view! { <PageSpinner /> }.into_any(),
    }
}

const NAV_ITEMS: &[(AdminRoute, &str)] = &[
    (AdminRoute::Dashboard, "Dashboard"),
    (AdminRoute::Posts, "Posts"),
    (AdminRoute::Categories, "Categories"),
    (AdminRoute::Users, "Users"),
];

#[component]
pub fn AdminLayout(section: AdminRoute, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    let nav = move || {
        NAV_ITEMS
            .iter()
            .map(|(item, label)| {
                let class = if *item == section { "active" } else { "" };
                view! {
                    <li>
                        <Link to=AppRoute::Admin(*item).to_path() class=class>{*label}</Link>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <AdminGuard route=AppRoute::Admin(section)>
            <div class="drawer lg:drawer-open">
                <input id="admin-drawer" type="checkbox" class="drawer-toggle" />
                <div class="drawer-content flex flex-col">
                    <header class="navbar bg-base-100 shadow-sm lg:hidden">
                        <label for="admin-drawer" class="btn btn-ghost drawer-button">"Menu"</label>
                        <span class="font-bold">"Admin panel"</span>
                    </header>
                    <main class="p-4 md:p-8 bg-base-200 min-h-screen">{children()}</main>
                </div>
                <div class="drawer-side z-40">
                    <label for="admin-drawer" class="drawer-overlay"></label>
                    <aside class="w-64 min-h-full bg-base-100 flex flex-col">
                        <Link to="/admin" class="p-4 text-lg font-serif font-bold">"Admin panel"</Link>
                        <ul class="menu flex-1">{nav()}</ul>
                        <div class="p-4 border-t border-base-300 space-y-2">
                            <p class="text-sm text-base-content/70">
                                {move || auth.state.get().user.map(|u| u.name).unwrap_or_default()}
                            </p>
                            <Link to="/" class="btn btn-ghost btn-sm w-full">"Back to blog"</Link>
                            <button class="btn btn-outline btn-error btn-sm w-full" on:click=move |_| logout(&auth)>
                                "Sign out"
                            </button>
                        </div>
                    </aside>
                </div>
            </div>
        </AdminGuard>
    }
}
