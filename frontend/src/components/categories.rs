use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::protocol::PostFilters;
use pressroom_shared::{Category, Post};

use crate::auth::use_auth;
use crate::components::post_card::PostCard;
use crate::components::spinner::{EmptyState, PageSpinner};
use crate::components::toast::use_toaster;

/// 分类浏览页：左侧分类列表，右侧所选分类下的已发布文章
#[component]
pub fn CategoriesPage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let categories = RwSignal::new(Vec::<Category>::new());
    let selected = RwSignal::new(Option::<i64>::None);
    let posts = RwSignal::new(Vec::<Post>::new());
    let loading = RwSignal::new(true);
    let loading_posts = RwSignal::new(false);

    let select = move |id: i64| {
        selected.set(Some(id));
        let api = auth.api();
        loading_posts.set(true);
        spawn_local(async move {
            let filters = PostFilters {
                category_id: Some(id),
                ..PostFilters::published()
            };
            match api.posts().list(filters).await {
                Ok(page) => posts.set(page.data),
                Err(e) => toaster.api_error("Failed to load posts", &e),
            }
            loading_posts.set(false);
        });
    };

    Effect::new(move |_| {
        let api = auth.api();
        spawn_local(async move {
            match api.categories().list().await {
                Ok(page) => {
                    if let Some(first) = page.data.first() {
                        select(first.id);
                    }
                    categories.set(page.data);
                }
                Err(e) => toaster.api_error("Failed to load categories", &e),
            }
            loading.set(false);
        });
    });

    let selected_category = move || {
        let id = selected.get()?;
        categories.with(|list| list.iter().find(|c| c.id == id).cloned())
    };

    move || {
        if loading.get() {
            return view! { <PageSpinner /> }.into_any();
        }
        if categories.with(Vec::is_empty) {
            return view! { <EmptyState message="No categories yet" /> }.into_any();
        }

        view! {
            <section class="grid gap-6 md:grid-cols-[16rem_1fr]">
                <aside>
                    <h1 class="text-2xl font-serif font-bold mb-4">"Categories"</h1>
                    <ul class="menu bg-base-100 rounded-box shadow-sm">
                        <For
                            each=move || categories.get()
                            key=|c| c.id
                            children=move |c| {
                                let id = c.id;
                                view! {
                                    <li>
                                        <a
                                            class=move || if selected.get() == Some(id) { "active" } else { "" }
                                            on:click=move |_| select(id)
                                        >
                                            {c.name}
                                        </a>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </aside>

                <div class="space-y-4">
                    {move || selected_category().map(|c| view! {
                        <div>
                            <h2 class="text-3xl font-serif font-bold">{c.name}</h2>
                            {c.description.map(|d| view! { <p class="text-base-content/70 mt-1">{d}</p> })}
                        </div>
                    })}
                    {move || {
                        if loading_posts.get() {
                            view! { <PageSpinner /> }.into_any()
                        } else if posts.with(Vec::is_empty) {
                            view! { <EmptyState message="No posts in this category" /> }.into_any()
                        } else {
                            view! {
                                <div class="grid gap-6 lg:grid-cols-2">
                                    <For
                                        each=move || posts.get()
                                        key=|p| p.id
                                        children=move |post| view! { <PostCard post=post /> }
                                    />
                                </div>
                            }
                            .into_any()
                        }
                    }}
                </div>
            </section>
        }
        .into_any()
    }
}
