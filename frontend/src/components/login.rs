use crate::auth::{login, remembered_email, use_auth};
use crate::components::toast::use_toaster;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::validate::{self, FieldError, error_for};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let (email, set_email) = signal(remembered_email());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let field_error = move |field: &'static str| {
        move || errors.with(|errs| error_for(errs, field).map(str::to_string))
    };

    // 登录成功后的跳转由路由服务根据会话状态完成
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let field_errors = validate::login(&email.get(), &password.get());
        if !field_errors.is_empty() {
            set_errors.set(field_errors);
            return;
        }

        set_errors.set(Vec::new());
        set_error_msg.set(None);
        set_is_submitting.set(true);

        spawn_local(async move {
            match login(&auth, email.get_untracked(), password.get_untracked()).await {
                Ok(()) => toaster.success("Welcome back!"),
                Err(e) => {
                    tracing::warn!(error = %e, "login failed");
                    set_error_msg.set(Some(e.user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <Link to="/" class="text-3xl font-bold font-serif">"Pressroom"</Link>
                    <p class="text-base-content/70 mt-2">"Sign in to your account"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                            <span class="text-error text-sm">{field_error("email")}</span>
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                            <span class="text-error text-sm">{field_error("password")}</span>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "No account yet? "
                            <Link to="/register" class="link link-primary">"Create one"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
