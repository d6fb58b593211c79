//! 封面媒体渲染

use leptos::prelude::*;
use pressroom_shared::media::MediaKind;

/// 按扩展名渲染封面；图片可点击全屏查看
#[component]
pub fn PostMedia(
    url: Option<String>,
    #[prop(into)] alt: String,
    /// 高度的 tailwind class
    #[prop(default = "h-48")]
    height: &'static str,
    #[prop(default = true)] controls: bool,
) -> impl IntoView {
    let show_full = RwSignal::new(false);

    let Some(kind) = MediaKind::from_url(url.as_deref()) else {
        return view! {
            <div class=format!("w-full {} bg-base-200 flex items-center justify-center text-sm text-base-content/50", height)>
                "No media"
            </div>
        }
        .into_any();
    };
    let url = url.unwrap_or_default();

    match kind {
        MediaKind::Image => {
            let full_url = url.clone();
            let full_alt = alt.clone();
            view! {
                <img
                    src=url
                    alt=alt
                    class=format!("w-full {} object-cover rounded cursor-pointer", height)
                    on:click=move |_| show_full.set(true)
                />
                <Show when=move || show_full.get()>
                    <div
                        class="fixed inset-0 bg-black/80 z-[9999] flex items-center justify-center"
                        on:click=move |_| show_full.set(false)
                    >
                        <img src=full_url.clone() alt=full_alt.clone() class="max-w-[90vw] max-h-[90vh] rounded shadow-lg" />
                    </div>
                </Show>
            }
            .into_any()
        }
        MediaKind::Video => view! {
            <video src=url controls=controls class=format!("w-full {} object-cover rounded", height)></video>
        }
        .into_any(),
        MediaKind::Pdf => view! {
            <div class=format!("w-full {} bg-base-200 rounded flex flex-col items-center justify-center gap-2", height)>
                <span class="text-sm">"PDF document"</span>
                <a href=url target="_blank" rel="noopener noreferrer" class="link link-primary text-sm">"Open PDF"</a>
            </div>
        }
        .into_any(),
        MediaKind::Other => view! {
            <div class=format!("w-full {} bg-base-200 rounded flex items-center justify-center", height)>
                <a href=url target="_blank" rel="noopener noreferrer" class="link text-sm">"Download file"</a>
            </div>
        }
        .into_any(),
    }
}
