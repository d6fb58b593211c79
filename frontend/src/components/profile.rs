//! 个人主页
//!
//! 展示作者信息和文章。本人访问时可以看到草稿，并能编辑、删除文章或移除封面。

use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::date::format_date;
use pressroom_shared::{Category, Post, User, visible_posts};

use crate::auth::use_auth;
use crate::components::media::PostMedia;
use crate::components::modal::confirm;
use crate::components::post_editor::{PostEditor, PostFormState, PostSubmission, save_post};
use crate::components::spinner::{EmptyState, PageSpinner};
use crate::components::toast::use_toaster;
use crate::web::router::Link;

#[component]
pub fn ProfilePage(id: i64) -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let user = RwSignal::new(Option::<User>::None);
    let posts = RwSignal::new(Vec::<Post>::new());
    let categories = RwSignal::new(Vec::<Category>::new());
    let loading = RwSignal::new(true);

    let show_published = RwSignal::new(true);
    let show_drafts = RwSignal::new(true);

    let editor_open = RwSignal::new(false);
    let form = PostFormState::new();
    let saving = RwSignal::new(false);

    let is_own_profile = Memo::new(move |_| auth.state.get().user_id() == Some(id));

    let load_posts = move || {
        let api = auth.api();
        spawn_local(async move {
            match api.posts().list_by_author(id).await {
                Ok(page) => posts.set(page.data),
                Err(e) => toaster.api_error("Failed to load posts", &e),
            }
        });
    };

    Effect::new(move |_| {
        let api = auth.api();
        spawn_local(async move {
            let (users, categories_api) = (api.users(), api.categories());
            let (found, list) = futures::join!(users.get(id), categories_api.list());
            match found {
                Ok(found) => user.set(Some(found)),
                Err(e) if e.is_not_found() => {}
                Err(e) => toaster.api_error("Failed to load profile", &e),
            }
            if let Ok(list) = list {
                categories.set(list.data);
            }
            loading.set(false);
        });
        load_posts();
    });

    let on_edit = move |post: Post| {
        form.load(&post);
        editor_open.set(true);
    };

    let on_delete = move |post: Post| {
        if !confirm(&format!("Delete \"{}\"? This cannot be undone.", post.title)) {
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match api.posts().delete(post.id).await {
                Ok(()) => {
                    toaster.success("Post deleted");
                    posts.update(|list| list.retain(|p| p.id != post.id));
                }
                Err(e) => toaster.api_error("Failed to delete post", &e),
            }
        });
    };

    let on_remove_cover = move |post_id: i64| {
        let api = auth.api();
        spawn_local(async move {
            match api.posts().delete_cover(post_id).await {
                Ok(updated) => {
                    toaster.success("Cover removed");
                    posts.update(|list| {
                        if let Some(slot) = list.iter_mut().find(|p| p.id == post_id) {
                            *slot = updated;
                        }
                    });
                }
                Err(e) => toaster.api_error("Failed to remove cover", &e),
            }
        });
    };

    let on_save = Callback::new(move |submission: PostSubmission| {
        let api = auth.api();
        saving.set(true);
        spawn_local(async move {
            match save_post(&api, submission).await {
                Ok(_) => {
                    toaster.success("Post updated");
                    editor_open.set(false);
                    form.reset();
                    load_posts();
                }
                Err(e) => toaster.api_error("Failed to save post", &e),
            }
            saving.set(false);
        });
    });

    let filtered = move || {
        posts.with(|list| {
            visible_posts(list, show_published.get(), show_drafts.get(), is_own_profile.get())
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let header = move || {
        user.get().map(|u| {
            let initial = u.name.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
            view! {
                <div class="flex items-center gap-4">
                    <div class="avatar placeholder">
                        <div class="bg-primary text-primary-content rounded-full w-16">
                            <span class="text-2xl">{initial}</span>
                        </div>
                    </div>
                    <div>
                        <h1 class="text-3xl font-serif font-bold">{u.name}</h1>
                        <p class="text-sm text-base-content/60">"Member since " {format_date(&u.created_at)}</p>
                    </div>
                </div>
            }
        })
    };

    move || {
        if loading.get() {
            return view! { <PageSpinner /> }.into_any();
        }
        if user.with(Option::is_none) {
            return view! {
                <div class="text-center py-16 space-y-4">
                    <p class="text-xl">"User not found."</p>
                    <Link to="/" class="btn btn-primary">"Back to home"</Link>
                </div>
            }
            .into_any();
        }

        view! {
            <section class="space-y-6">
                {header}

                <div class="flex flex-wrap gap-4 items-center">
                    <h2 class="text-xl font-bold flex-1">"Posts"</h2>
                    <label class="label cursor-pointer gap-2">
                        <span class="label-text">"Published"</span>
                        <input type="checkbox" class="checkbox checkbox-sm"
                            prop:checked=move || show_published.get()
                            on:change=move |ev| show_published.set(event_target_checked(&ev))
                        />
                    </label>
                    <Show when=move || is_own_profile.get()>
                        <label class="label cursor-pointer gap-2">
                            <span class="label-text">"Drafts"</span>
                            <input type="checkbox" class="checkbox checkbox-sm"
                                prop:checked=move || show_drafts.get()
                                on:change=move |ev| show_drafts.set(event_target_checked(&ev))
                            />
                        </label>
                    </Show>
                </div>

                <Show when=move || !filtered().is_empty() fallback=|| view! { <EmptyState message="No posts to show" /> }>
                    <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=filtered
                            key=|p| (p.id, p.updated_at, p.cover_image.clone())
                            children=move |post| {
                                let href = format!("/posts/{}", post.slug);
                                let has_cover = post.cover_image.is_some();
                                let post_id = post.id;
                                let for_edit = post.clone();
                                let for_delete = post.clone();
                                view! {
                                    <article class="card bg-base-100 shadow-md">
                                        <figure>
                                            <PostMedia url=post.cover_image.clone() alt=post.title.clone() controls=false />
                                        </figure>
                                        <div class="card-body">
                                            <div class="flex items-center gap-2">
                                                {(!post.published).then(|| view! {
                                                    <span class="badge badge-warning">"Draft"</span>
                                                })}
                                                <span class="text-xs text-base-content/60">{format_date(&post.created_at)}</span>
                                            </div>
                                            <h3 class="card-title">
                                                <Link to=href>{post.title.clone()}</Link>
                                            </h3>
                                            <Show when=move || is_own_profile.get()>
                                                <div class="card-actions justify-end">
                                                    {has_cover.then(|| view! {
                                                        <button class="btn btn-ghost btn-xs" on:click=move |_| on_remove_cover(post_id)>
                                                            "Remove cover"
                                                        </button>
                                                    })}
                                                    <button class="btn btn-ghost btn-xs" on:click={
                                                        let post = for_edit.clone();
                                                        move |_| on_edit(post.clone())
                                                    }>"Edit"</button>
                                                    <button class="btn btn-ghost btn-xs text-error" on:click={
                                                        let post = for_delete.clone();
                                                        move |_| on_delete(post.clone())
                                                    }>"Delete"</button>
                                                </div>
                                            </Show>
                                        </div>
                                    </article>
                                }
                            }
                        />
                    </div>
                </Show>

                <PostEditor open=editor_open form=form categories=categories saving=saving on_save=on_save />
            </section>
        }
        .into_any()
    }
}
