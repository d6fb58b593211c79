use leptos::prelude::*;
use pressroom_shared::Post;
use pressroom_shared::date::format_date;

use crate::components::media::PostMedia;
use crate::web::router::Link;

const SUMMARY_CHARS: usize = 160;

#[component]
pub fn PostCard(post: Post) -> impl IntoView {
    let href = format!("/posts/{}", post.slug);
    let author = post.author.as_ref().map(|a| (a.id, a.name.clone()));
    let category = post.category.as_ref().map(|c| c.name.clone());
    let summary = post.summary(SUMMARY_CHARS);

    view! {
        <article class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <figure>
                <PostMedia url=post.cover_image.clone() alt=post.title.clone() controls=false />
            </figure>
            <div class="card-body">
                <div class="flex items-center gap-2 text-xs text-base-content/60">
                    {category.map(|name| view! { <span class="badge badge-primary badge-outline">{name}</span> })}
                    <span>{format_date(&post.created_at)}</span>
                </div>
                <h2 class="card-title">
                    <Link to=href.clone()>{post.title.clone()}</Link>
                </h2>
                <p class="text-base-content/70">{summary}</p>
                <div class="card-actions justify-between items-center">
                    {author.map(|(id, name)| view! {
                        <Link to=format!("/profile/{}", id) class="text-sm link link-hover">{name}</Link>
                    })}
                    <Link to=href class="btn btn-ghost btn-sm">"Read more"</Link>
                </div>
            </div>
        </article>
    }
}
