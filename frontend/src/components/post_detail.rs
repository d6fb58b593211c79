//! 文章详情页：正文、封面与评论

use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::date::{format_date, format_relative};
use pressroom_shared::{Comment, Post};

use crate::auth::use_auth;
use crate::components::media::PostMedia;
use crate::components::spinner::{EmptyState, PageSpinner};
use crate::components::toast::use_toaster;
use crate::web::router::Link;

#[component]
pub fn PostDetailPage(slug: String) -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let post = RwSignal::new(Option::<Post>::None);
    let comments = RwSignal::new(Vec::<Comment>::new());
    let loading = RwSignal::new(true);
    let missing = RwSignal::new(false);

    let load_comments = move |post_id: i64| {
        let api = auth.api();
        spawn_local(async move {
            match api.comments().list_for_post(post_id).await {
                Ok(page) => comments.set(page.data),
                Err(e) => toaster.api_error("Failed to load comments", &e),
            }
        });
    };

    Effect::new(move |_| {
        let api = auth.api();
        let slug = slug.clone();
        spawn_local(async move {
            match api.posts().get_by_slug(&slug).await {
                Ok(found) => {
                    let id = found.id;
                    post.set(Some(found));
                    load_comments(id);
                }
                Err(e) if e.is_not_found() => missing.set(true),
                Err(e) => toaster.api_error("Failed to load post", &e),
            }
            loading.set(false);
        });
    });

    move || {
        if loading.get() {
            return view! { <PageSpinner /> }.into_any();
        }
        let Some(current) = post.get() else {
            let message = if missing.get() { "This post does not exist." } else { "The post could not be loaded." };
            return view! {
                <div class="text-center py-16 space-y-4">
                    <p class="text-xl">{message}</p>
                    <Link to="/" class="btn btn-primary">"Back to home"</Link>
                </div>
            }
            .into_any();
        };

        let author = current.author.as_ref().map(|a| (a.id, a.name.clone()));
        let category = current.category.as_ref().map(|c| c.name.clone());
        let post_id = current.id;

        view! {
            <article class="max-w-3xl mx-auto space-y-6">
                <header class="space-y-3">
                    {category.map(|name| view! { <span class="badge badge-primary badge-outline">{name}</span> })}
                    <h1 class="text-4xl md:text-5xl font-serif font-bold">{current.title.clone()}</h1>
                    <div class="flex items-center gap-2 text-sm text-base-content/60">
                        {author.map(|(id, name)| view! {
                            <Link to=format!("/profile/{}", id) class="link link-hover font-medium">{name}</Link>
                            <span>"·"</span>
                        })}
                        <span>{format_date(&current.created_at)}</span>
                    </div>
                </header>

                <PostMedia url=current.cover_image.clone() alt=current.title.clone() height="max-h-[28rem]" />

                <div class="prose max-w-none whitespace-pre-wrap">{current.content.clone()}</div>

                <div class="divider"></div>

                <CommentSection post_id=post_id comments=comments />
            </article>
        }
        .into_any()
    }
}

#[component]
fn CommentSection(post_id: i64, comments: RwSignal<Vec<Comment>>) -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let draft = RwSignal::new(String::new());
    let posting = RwSignal::new(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let content = draft.get_untracked().trim().to_string();
        if content.is_empty() {
            return;
        }
        let api = auth.api();
        posting.set(true);
        spawn_local(async move {
            match api.comments().create(post_id, &content).await {
                Ok(comment) => {
                    comments.update(|list| list.push(comment));
                    draft.set(String::new());
                }
                Err(e) => toaster.api_error("Failed to post comment", &e),
            }
            posting.set(false);
        });
    };

    let now = chrono::Utc::now();

    view! {
        <section class="space-y-4">
            <h2 class="text-2xl font-serif font-bold">
                "Comments " <span class="text-base-content/50">{move || format!("({})", comments.with(Vec::len))}</span>
            </h2>

            <Show
                when=move || auth.state.get().is_authenticated
                fallback=|| view! {
                    <div class="alert">
                        <span>
                            <Link to="/register" class="link link-primary">"Create an account"</Link>
                            " or "
                            <Link to="/login" class="link link-primary">"sign in"</Link>
                            " to join the conversation."
                        </span>
                    </div>
                }
            >
                <form class="space-y-2" on:submit=on_submit>
                    <textarea
                        rows="3"
                        class="textarea textarea-bordered w-full"
                        placeholder="Write a comment..."
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    ></textarea>
                    <div class="flex justify-end">
                        <button type="submit" class="btn btn-primary btn-sm" disabled=move || posting.get()>
                            "Post comment"
                        </button>
                    </div>
                </form>
            </Show>

            <Show when=move || !comments.with(Vec::is_empty) fallback=|| view! { <EmptyState message="No comments yet" /> }>
                <ul class="space-y-3">
                    <For
                        each=move || comments.get()
                        key=|c| c.id
                        children=move |c| {
                            let name = c.author.as_ref().map(|a| a.name.clone()).unwrap_or_else(|| "Anonymous".into());
                            view! {
                                <li class="bg-base-100 rounded-box p-4 shadow-sm">
                                    <div class="flex justify-between text-sm">
                                        <Link to=format!("/profile/{}", c.author_id) class="font-medium link link-hover">{name}</Link>
                                        <span class="text-base-content/50">{format_relative(&c.created_at, &now)}</span>
                                    </div>
                                    <p class="mt-2 whitespace-pre-wrap">{c.content}</p>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </section>
    }
}
