use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom::DashboardStats;

use crate::auth::use_auth;
use crate::components::toast::use_toaster;
use crate::web::router::Link;

/// 管理后台首页
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let (stats, set_stats) = signal(DashboardStats::default());
    let (loading, set_loading) = signal(true);

    let load_stats = move || {
        let api = auth.api();
        set_loading.set(true);
        spawn_local(async move {
            match api.dashboard_stats().await {
                Ok(data) => set_stats.set(data),
                Err(e) => toaster.api_error("Failed to load stats", &e),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| load_stats());

    let stat_value = move |value: fn(&DashboardStats) -> u64| {
        move || {
            if loading.get() {
                view! { <span class="loading loading-dots loading-md"></span> }.into_any()
            } else {
                stats.with(value).into_any()
            }
        }
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-serif font-bold">"Dashboard"</h1>
                    <p class="text-base-content/70">"Overview of the blog"</p>
                </div>
                <button on:click=move |_| load_stats() disabled=move || loading.get() class="btn btn-ghost btn-sm">
                    "Refresh"
                </button>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary">
                        <svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" class="inline-block w-8 h-8 stroke-current"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 12h6m-6 4h6m2 5H7a2 2 0 01-2-2V5a2 2 0 012-2h5.586a1 1 0 01.707.293l5.414 5.414a1 1 0 01.293.707V19a2 2 0 01-2 2z"></path></svg>
                    </div>
                    <div class="stat-title">"Posts"</div>
                    <div class="stat-value text-primary">{stat_value(|s| s.posts)}</div>
                    <div class="stat-desc"><Link to="/admin/posts" class="link link-hover">"Manage posts"</Link></div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-accent">
                        <svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" class="inline-block w-8 h-8 stroke-current"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M3 7v10a2 2 0 002 2h14a2 2 0 002-2V9a2 2 0 00-2-2h-6l-2-2H5a2 2 0 00-2 2z"></path></svg>
                    </div>
                    <div class="stat-title">"Categories"</div>
                    <div class="stat-value text-accent">{stat_value(|s| s.categories)}</div>
                    <div class="stat-desc"><Link to="/admin/categories" class="link link-hover">"Manage categories"</Link></div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-success">
                        <svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" class="inline-block w-8 h-8 stroke-current"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M17 20h5v-2a4 4 0 00-3-3.87M9 20H4v-2a4 4 0 013-3.87m6-4.13a4 4 0 11-8 0 4 4 0 018 0zm6 2a3 3 0 11-6 0 3 3 0 016 0z"></path></svg>
                    </div>
                    <div class="stat-title">"Users"</div>
                    <div class="stat-value text-success">{stat_value(|s| s.users)}</div>
                    <div class="stat-desc"><Link to="/admin/users" class="link link-hover">"Manage users"</Link></div>
                </div>
            </div>
        </div>
    }
}
