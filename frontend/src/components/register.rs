use crate::auth::{register, use_auth};
use crate::components::toast::use_toaster;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::validate::{self, FieldError, error_for};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let error_msg = RwSignal::new(Option::<String>::None);

    let field_error = move |field: &'static str| {
        move || errors.with(|errs| error_for(errs, field).map(str::to_string))
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let field_errors = validate::register(&name.get(), &email.get(), &password.get(), &confirm.get());
        if !field_errors.is_empty() {
            errors.set(field_errors);
            return;
        }

        errors.set(Vec::new());
        error_msg.set(None);
        is_submitting.set(true);

        spawn_local(async move {
            let result = register(
                &auth,
                email.get_untracked(),
                password.get_untracked(),
                name.get_untracked().trim().to_string(),
            )
            .await;
            match result {
                Ok(()) => toaster.success("Account created!"),
                Err(e) => {
                    tracing::warn!(error = %e, "registration failed");
                    error_msg.set(Some(e.user_message()));
                }
            }
            is_submitting.set(false);
        });
    };

    let input = move |id: &'static str, label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| value.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered"
                />
                <span class="text-error text-sm">{field_error(id)}</span>
            </div>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <Link to="/" class="text-3xl font-bold font-serif">"Pressroom"</Link>
                    <p class="text-base-content/70 mt-2">"Create your account"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        {input("name", "Name", "text", name)}
                        {input("email", "Email", "email", email)}
                        {input("password", "Password", "password", password)}
                        {input("confirm_password", "Confirm password", "password", confirm)}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Sign up".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to="/login" class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
