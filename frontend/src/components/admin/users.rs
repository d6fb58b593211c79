use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::date::format_date;
use pressroom_shared::protocol::{NewUser, UserUpdate};
use pressroom_shared::validate::{self, FieldError, error_for};
use pressroom_shared::{Role, User};

use crate::auth::use_auth;
use crate::components::modal::{Modal, confirm};
use crate::components::toast::use_toaster;

/// 用户管理
#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let users = RwSignal::new(Vec::<User>::new());
    let loading = RwSignal::new(true);

    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<i64>::None);
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::User);
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let saving = RwSignal::new(false);

    let load_users = move || {
        let api = auth.api();
        loading.set(true);
        spawn_local(async move {
            match api.users().list().await {
                Ok(page) => users.set(page.data),
                Err(e) => toaster.api_error("Failed to load users", &e),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| load_users());

    let open_dialog = move |user: Option<User>| {
        errors.set(Vec::new());
        password.set(String::new());
        match user {
            Some(u) => {
                editing.set(Some(u.id));
                name.set(u.name);
                email.set(u.email);
                role.set(u.role);
            }
            None => {
                editing.set(None);
                name.set(String::new());
                email.set(String::new());
                role.set(Role::User);
            }
        }
        dialog_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let id = editing.get_untracked();
        let name_value = name.get_untracked().trim().to_string();
        let email_value = email.get_untracked().trim().to_string();
        let password_value = password.get_untracked();

        let field_errors = validate::user(&name_value, &email_value, &password_value, id.is_none());
        if !field_errors.is_empty() {
            errors.set(field_errors);
            return;
        }
        errors.set(Vec::new());

        let api = auth.api();
        let role_value = role.get_untracked();
        saving.set(true);
        spawn_local(async move {
            let result = match id {
                Some(id) => {
                    let update = UserUpdate {
                        name: Some(name_value),
                        email: Some(email_value),
                        password: (!password_value.is_empty()).then_some(password_value),
                        role: Some(role_value),
                    };
                    api.users().update(id, update).await
                }
                None => {
                    let user = NewUser {
                        name: name_value,
                        email: email_value,
                        password: password_value,
                        role: role_value,
                    };
                    api.users().create(user).await
                }
            };
            match result {
                Ok(_) => {
                    toaster.success(if id.is_some() { "User updated" } else { "User created" });
                    dialog_open.set(false);
                    load_users();
                }
                Err(e) => toaster.api_error("Failed to save user", &e),
            }
            saving.set(false);
        });
    };

    let on_delete = move |user: User| {
        if auth.state.get_untracked().user_id() == Some(user.id) {
            toaster.error("You cannot delete your own account here");
            return;
        }
        if !confirm(&format!("Delete user \"{}\"?", user.name)) {
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match api.users().delete(user.id).await {
                Ok(()) => {
                    toaster.success("User deleted");
                    users.update(|list| list.retain(|u| u.id != user.id));
                }
                Err(e) => toaster.api_error("Failed to delete user", &e),
            }
        });
    };

    let field_error = move |field: &'static str| {
        move || errors.with(|errs| error_for(errs, field).map(str::to_string))
    };

    let title = Signal::derive(move || {
        if editing.get().is_some() { "Edit user".to_string() } else { "New user".to_string() }
    });

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-serif font-bold">"Users"</h1>
                    <p class="text-base-content/70">"Manage accounts and roles"</p>
                </div>
                <button class="btn btn-primary" on:click=move |_| open_dialog(None)>"New user"</button>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Role"</th>
                                <th class="hidden md:table-cell">"Joined"</th>
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
                            <For
                                each=move || users.get()
                                key=|u| (u.id, u.updated_at)
                                children=move |user| {
                                    let (badge, label) = match user.role {
                                        Role::Admin => ("badge badge-primary", "Admin"),
                                        Role::User => ("badge badge-ghost", "User"),
                                    };
                                    let for_edit = user.clone();
                                    let for_delete = user.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium">{user.name}</td>
                                            <td class="text-sm">{user.email}</td>
                                            <td><span class=badge>{label}</span></td>
                                            <td class="hidden md:table-cell text-sm opacity-70">{format_date(&user.created_at)}</td>
                                            <td class="text-right space-x-1">
                                                <button class="btn btn-ghost btn-xs" on:click=move |_| open_dialog(Some(for_edit.clone()))>"Edit"</button>
                                                <button class="btn btn-ghost btn-xs text-error" on:click=move |_| on_delete(for_delete.clone())>"Delete"</button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>

            <Modal open=dialog_open title=title>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    <div class="form-control">
                        <label class="label" for="user_name"><span class="label-text">"Name"</span></label>
                        <input id="user_name" type="text" class="input input-bordered w-full"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                        <span class="text-error text-sm">{field_error("name")}</span>
                    </div>
                    <div class="form-control">
                        <label class="label" for="user_email"><span class="label-text">"Email"</span></label>
                        <input id="user_email" type="email" class="input input-bordered w-full"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <span class="text-error text-sm">{field_error("email")}</span>
                    </div>
                    <div class="form-control">
                        <label class="label" for="user_password">
                            <span class="label-text">
                                {move || if editing.get().is_some() { "Password (leave blank to keep)" } else { "Password" }}
                            </span>
                        </label>
                        <input id="user_password" type="password" class="input input-bordered w-full"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <span class="text-error text-sm">{field_error("password")}</span>
                    </div>
                    <div class="form-control">
                        <label class="label" for="user_role"><span class="label-text">"Role"</span></label>
                        <select id="user_role" class="select select-bordered w-full"
                            on:change=move |ev| {
                                if let Some(parsed) = Role::parse(&event_target_value(&ev)) {
                                    role.set(parsed);
                                }
                            }
                        >
                            <option value=Role::User.as_str() selected=move || role.get() == Role::User>"User"</option>
                            <option value=Role::Admin.as_str() selected=move || role.get() == Role::Admin>"Admin"</option>
                        </select>
                    </div>
                    <div class="modal-action">
                        <button type="button" class="btn" on:click=move |_| dialog_open.set(false)>"Cancel"</button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Save"</button>
                    </div>
                </form>
            </Modal>
        </div>
    }
}
