use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::date::format_date;
use pressroom_shared::protocol::{PostDraft, PostFilters};
use pressroom_shared::{Category, Post};

use crate::auth::use_auth;
use crate::components::modal::confirm;
use crate::components::post_editor::{PostEditor, PostFormState, PostSubmission, save_post};
use crate::components::toast::use_toaster;
use crate::web::router::Link;

/// 文章管理：包含草稿在内的全部文章
#[component]
pub fn AdminPostsPage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let posts = RwSignal::new(Vec::<Post>::new());
    let categories = RwSignal::new(Vec::<Category>::new());
    let loading = RwSignal::new(true);

    let editor_open = RwSignal::new(false);
    let form = PostFormState::new();
    let saving = RwSignal::new(false);

    let load_data = move || {
        let api = auth.api();
        loading.set(true);
        spawn_local(async move {
            let (posts_api, categories_api) = (api.posts(), api.categories());
            let result = futures::try_join!(posts_api.list(PostFilters::default()), categories_api.list());
            match result {
                Ok((post_page, category_page)) => {
                    posts.set(post_page.data);
                    categories.set(category_page.data);
                }
                Err(e) => toaster.api_error("Failed to load posts", &e),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| load_data());

    let open_create = move |_| {
        form.reset();
        form.published.set(false);
        editor_open.set(true);
    };

    let on_save = Callback::new(move |submission: PostSubmission| {
        let api = auth.api();
        let creating = submission.id.is_none();
        saving.set(true);
        spawn_local(async move {
            match save_post(&api, submission).await {
                Ok(_) => {
                    toaster.success(if creating { "Post created" } else { "Post updated" });
                    editor_open.set(false);
                    form.reset();
                    load_data();
                }
                Err(e) => toaster.api_error("Failed to save post", &e),
            }
            saving.set(false);
        });
    });

    let toggle_published = move |post: Post| {
        let api = auth.api();
        let draft = PostDraft {
            published: !post.published,
            ..PostDraft::from(&post)
        };
        spawn_local(async move {
            match api.posts().update(post.id, draft).await {
                Ok(updated) => posts.update(|list| {
                    if let Some(slot) = list.iter_mut().find(|p| p.id == updated.id) {
                        *slot = updated;
                    }
                }),
                Err(e) => toaster.api_error("Failed to update post", &e),
            }
        });
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
                    load_data();
                }
                Err(e) => toaster.api_error("Failed to delete post", &e),
            }
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-serif font-bold">"Posts"</h1>
                    <p class="text-base-content/70">"Create, edit and publish posts"</p>
                </div>
                <button class="btn btn-primary" on:click=open_create>"New post"</button>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Title"</th>
                                <th class="hidden md:table-cell">"Category"</th>
                                <th>"Status"</th>
                                <th class="hidden md:table-cell">"Created"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || loading.get()>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || !loading.get() && posts.with(Vec::is_empty)>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">"No posts yet."</td>
                                </tr>
                            </Show>
                            <For
                                each=move || posts.get()
                                key=|p| (p.id, p.updated_at, p.published)
                                children=move |post| {
                                    let category = post.category.as_ref().map(|c| c.name.clone()).unwrap_or_else(|| "-".into());
                                    let (badge, label) = if post.published {
                                        ("badge badge-success", "Published")
                                    } else {
                                        ("badge badge-warning", "Draft")
                                    };
                                    let for_toggle = post.clone();
                                    let for_edit = post.clone();
                                    let for_delete = post.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium">
                                                <Link to=format!("/posts/{}", post.slug) class="link link-hover">{post.title.clone()}</Link>
                                            </td>
                                            <td class="hidden md:table-cell">{category}</td>
                                            <td>
                                                <button class=badge on:click=move |_| toggle_published(for_toggle.clone())>{label}</button>
                                            </td>
                                            <td class="hidden md:table-cell text-sm opacity-70">{format_date(&post.created_at)}</td>
                                            <td class="text-right space-x-1">
                                                <button class="btn btn-ghost btn-xs" on:click=move |_| {
                                                    form.load(&for_edit);
                                                    editor_open.set(true);
                                                }>"Edit"</button>
                                                <button class="btn btn-ghost btn-xs text-error" on:click=move |_| on_delete(for_delete.clone())>
                                                    "Delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>

            <PostEditor open=editor_open form=form categories=categories saving=saving on_save=on_save />
        </div>
    }
}
