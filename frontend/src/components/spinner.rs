use leptos::prelude::*;

#[component]
pub fn PageSpinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-[50vh]">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="text-center py-12 text-base-content/50">{message}</div>
    }
}
