//! 首页：已发布文章列表，支持搜索和分类筛选
//!
//! 登录用户可以直接在这里写新文章。

use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::protocol::PostFilters;
use pressroom_shared::{Category, PaginationMeta, Post};

use crate::auth::use_auth;
use crate::components::post_card::PostCard;
use crate::components::post_editor::{PostEditor, PostFormState, PostSubmission, save_post};
use crate::components::spinner::{EmptyState, PageSpinner};
use crate::components::toast::use_toaster;

const PAGE_SIZE: u32 = 9;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let posts = RwSignal::new(Vec::<Post>::new());
    let meta = RwSignal::new(Option::<PaginationMeta>::None);
    let categories = RwSignal::new(Vec::<Category>::new());
    let loading = RwSignal::new(true);

    let search = RwSignal::new(String::new());
    let category_id = RwSignal::new(Option::<i64>::None);
    let page = RwSignal::new(1u32);

    let editor_open = RwSignal::new(false);
    let form = PostFormState::new();
    let saving = RwSignal::new(false);

    let load_posts = move || {
        let filters = PostFilters {
            search: Some(search.get_untracked()),
            category_id: category_id.get_untracked(),
            page: Some(page.get_untracked()),
            limit: Some(PAGE_SIZE),
            ..PostFilters::published()
        };
        let api = auth.api();
        loading.set(true);
        spawn_local(async move {
            match api.posts().list(filters).await {
                Ok(result) => {
                    posts.set(result.data);
                    meta.set(Some(result.meta));
                }
                Err(e) => toaster.api_error("Failed to load posts", &e),
            }
            loading.set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| {
        load_posts();
        let api = auth.api();
        spawn_local(async move {
            match api.categories().list().await {
                Ok(result) => categories.set(result.data),
                Err(e) => toaster.api_error("Failed to load categories", &e),
            }
        });
    });

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        page.set(1);
        load_posts();
    };

    let on_category = move |ev: leptos::web_sys::Event| {
        category_id.set(event_target_value(&ev).parse().ok());
        page.set(1);
        load_posts();
    };

    let go_to_page = move |delta: i32| {
        let next = page.get_untracked().saturating_add_signed(delta).max(1);
        page.set(next);
        load_posts();
    };

    let open_editor = move |_| {
        form.reset();
        editor_open.set(true);
    };

    let on_save = Callback::new(move |submission: PostSubmission| {
        let api = auth.api();
        saving.set(true);
        spawn_local(async move {
            match save_post(&api, submission).await {
                Ok(post) => {
                    toaster.success(format!("\"{}\" saved", post.title));
                    editor_open.set(false);
                    form.reset();
                    load_posts();
                }
                Err(e) => toaster.api_error("Failed to save post", &e),
            }
            saving.set(false);
        });
    });

    let has_prev = move || meta.with(|m| m.as_ref().is_some_and(PaginationMeta::has_prev));
    let has_next = move || meta.with(|m| m.as_ref().is_some_and(PaginationMeta::has_next));

    view! {
        <section class="space-y-6">
            <div class="flex flex-col md:flex-row md:items-end justify-between gap-4">
                <div>
                    <h1 class="text-4xl font-serif font-bold">"Latest posts"</h1>
                    <p class="text-base-content/70 mt-1">"Stories, notes and ideas from our writers."</p>
                </div>
                <Show when=move || auth.state.get().is_authenticated>
                    <button class="btn btn-primary" on:click=open_editor>"Write a post"</button>
                </Show>
            </div>

            <div class="flex flex-col md:flex-row gap-2">
                <form class="join flex-1" on:submit=on_search>
                    <input
                        type="search"
                        placeholder="Search posts..."
                        class="input input-bordered join-item w-full"
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn join-item">"Search"</button>
                </form>
                <select class="select select-bordered" on:change=on_category>
                    <option value="">"All categories"</option>
                    <For
                        each=move || categories.get()
                        key=|c| c.id
                        children=move |c| view! { <option value=c.id.to_string()>{c.name}</option> }
                    />
                </select>
            </div>

            {move || {
                if loading.get() {
                    view! { <PageSpinner /> }.into_any()
                } else if posts.with(Vec::is_empty) {
                    view! { <EmptyState message="No posts found" /> }.into_any()
                } else {
                    view! {
                        <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                            <For
                                each=move || posts.get()
                                key=|p| (p.id, p.updated_at)
                                children=move |post| view! { <PostCard post=post /> }
                            />
                        </div>
                    }
                    .into_any()
                }
            }}

            <Show when=move || has_prev() || has_next()>
                <div class="join flex justify-center">
                    <button class="join-item btn" disabled=move || !has_prev() on:click=move |_| go_to_page(-1)>"«"</button>
                    <button class="join-item btn">{move || format!("Page {}", page.get())}</button>
                    <button class="join-item btn" disabled=move || !has_next() on:click=move |_| go_to_page(1)>"»"</button>
                </div>
            </Show>

            <PostEditor open=editor_open form=form categories=categories saving=saving on_save=on_save />
        </section>
    }
}
