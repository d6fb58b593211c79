use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom_shared::Category;
use pressroom_shared::protocol::CategoryDraft;
use pressroom_shared::validate::{self, FieldError, error_for, slugify};

use crate::auth::use_auth;
use crate::components::modal::{Modal, confirm};
use crate::components::toast::use_toaster;

/// 分类管理
#[component]
pub fn AdminCategoriesPage() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();

    let categories = RwSignal::new(Vec::<Category>::new());
    let loading = RwSignal::new(true);

    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<i64>::None);
    let name = RwSignal::new(String::new());
    let slug = RwSignal::new(String::new());
    // 手动改过 slug 后不再跟随名称
    let slug_touched = RwSignal::new(false);
    let description = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let saving = RwSignal::new(false);

    let load_categories = move || {
        let api = auth.api();
        loading.set(true);
        spawn_local(async move {
            match api.categories().list().await {
                Ok(page) => categories.set(page.data),
                Err(e) => toaster.api_error("Failed to load categories", &e),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| load_categories());

    let open_dialog = move |category: Option<Category>| {
        errors.set(Vec::new());
        match category {
            Some(c) => {
                editing.set(Some(c.id));
                name.set(c.name);
                slug.set(c.slug);
                slug_touched.set(true);
                description.set(c.description.unwrap_or_default());
            }
            None => {
                editing.set(None);
                name.set(String::new());
                slug.set(String::new());
                slug_touched.set(false);
                description.set(String::new());
            }
        }
        dialog_open.set(true);
    };

    let on_name_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        if !slug_touched.get_untracked() {
            slug.set(slugify(&value));
        }
        name.set(value);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = description.get_untracked();
        let draft = CategoryDraft {
            name: name.get_untracked().trim().to_string(),
            slug: slug.get_untracked().trim().to_string(),
            description: (!text.trim().is_empty()).then_some(text),
        };
        let field_errors = validate::category(&draft);
        if !field_errors.is_empty() {
            errors.set(field_errors);
            return;
        }
        errors.set(Vec::new());

        let api = auth.api();
        let id = editing.get_untracked();
        saving.set(true);
        spawn_local(async move {
            let result = match id {
                Some(id) => api.categories().update(id, draft).await,
                None => api.categories().create(draft).await,
            };
            match result {
                Ok(_) => {
                    toaster.success(if id.is_some() { "Category updated" } else { "Category created" });
                    dialog_open.set(false);
                    load_categories();
                }
                Err(e) => toaster.api_error("Failed to save category", &e),
            }
            saving.set(false);
        });
    };

    let on_delete = move |category: Category| {
        if !confirm(&format!("Delete category \"{}\"?", category.name)) {
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match api.categories().delete(category.id).await {
                Ok(()) => {
                    toaster.success("Category deleted");
                    categories.update(|list| list.retain(|c| c.id != category.id));
                }
                Err(e) => toaster.api_error("Failed to delete category", &e),
            }
        });
    };

    let field_error = move |field: &'static str| {
        move || errors.with(|errs| error_for(errs, field).map(str::to_string))
    };

    let title = Signal::derive(move || {
        if editing.get().is_some() { "Edit category".to_string() } else { "New category".to_string() }
    });

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-serif font-bold">"Categories"</h1>
                    <p class="text-base-content/70">"Organize posts by topic"</p>
                </div>
                <button class="btn btn-primary" on:click=move |_| open_dialog(None)>"New category"</button>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Slug"</th>
                                <th class="hidden md:table-cell">"Description"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || loading.get()>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || !loading.get() && categories.with(Vec::is_empty)>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">"No categories yet."</td>
                                </tr>
                            </Show>
                            <For
                                each=move || categories.get()
                                key=|c| (c.id, c.updated_at)
                                children=move |category| {
                                    let for_edit = category.clone();
                                    let for_delete = category.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium">{category.name}</td>
                                            <td class="font-mono text-sm opacity-70">{category.slug}</td>
                                            <td class="hidden md:table-cell text-sm">{category.description.unwrap_or_default()}</td>
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
                        <label class="label" for="category_name"><span class="label-text">"Name"</span></label>
                        <input id="category_name" type="text" class="input input-bordered w-full"
                            prop:value=move || name.get()
                            on:input=on_name_input
                        />
                        <span class="text-error text-sm">{field_error("name")}</span>
                    </div>
                    <div class="form-control">
                        <label class="label" for="category_slug"><span class="label-text">"Slug"</span></label>
                        <input id="category_slug" type="text" class="input input-bordered w-full font-mono"
                            prop:value=move || slug.get()
                            on:input=move |ev| {
                                slug_touched.set(true);
                                slug.set(event_target_value(&ev));
                            }
                        />
                        <span class="text-error text-sm">{field_error("slug")}</span>
                    </div>
                    <div class="form-control">
                        <label class="label" for="category_description"><span class="label-text">"Description"</span></label>
                        <textarea id="category_description" rows="3" class="textarea textarea-bordered w-full"
                            prop:value=move || description.get()
                            on:input=move |ev| description.set(event_target_value(&ev))
                        ></textarea>
                        <span class="text-error text-sm">{field_error("description")}</span>
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
