//! 文章编辑对话框
//!
//! 首页、个人主页和管理后台共用：新建或编辑文章，可选上传封面。

use leptos::prelude::*;
use leptos::task::spawn_local;
use pressroom::ApiResult;
use pressroom_shared::protocol::PostDraft;
use pressroom_shared::validate::{self, FieldError, error_for};
use pressroom_shared::{Category, Post};

use crate::auth::AppApi;
use crate::components::modal::Modal;
use crate::web::{SelectedFile, read_selected, revoke_preview};

/// 表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy`，可以直接在闭包和组件间传递。
#[derive(Clone, Copy)]
pub struct PostFormState {
    /// 正在编辑的文章，`None` 表示新建
    pub editing: RwSignal<Option<i64>>,
    pub title: RwSignal<String>,
    pub excerpt: RwSignal<String>,
    pub content: RwSignal<String>,
    pub published: RwSignal<bool>,
    pub category_id: RwSignal<Option<i64>>,
    /// 已有的封面地址
    pub cover_image: RwSignal<Option<String>>,
    /// 新选择的封面文件
    pub cover_file: RwSignal<Option<SelectedFile>>,
    pub errors: RwSignal<Vec<FieldError>>,
}

impl PostFormState {
    pub fn new() -> Self {
        Self {
            editing: RwSignal::new(None),
            title: RwSignal::new(String::new()),
            excerpt: RwSignal::new(String::new()),
            content: RwSignal::new(String::new()),
            published: RwSignal::new(true),
            category_id: RwSignal::new(None),
            cover_image: RwSignal::new(None),
            cover_file: RwSignal::new(None),
            errors: RwSignal::new(Vec::new()),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.editing.set(None);
        self.title.set(String::new());
        self.excerpt.set(String::new());
        self.content.set(String::new());
        self.published.set(true);
        self.category_id.set(None);
        self.cover_image.set(None);
        self.clear_cover_file();
        self.errors.set(Vec::new());
    }

    /// 载入已有文章
    pub fn load(&self, post: &Post) {
        self.reset();
        self.editing.set(Some(post.id));
        self.title.set(post.title.clone());
        self.excerpt.set(post.excerpt.clone().unwrap_or_default());
        self.content.set(post.content.clone());
        self.published.set(post.published);
        self.category_id.set(post.category_id);
        self.cover_image.set(post.cover_image.clone());
    }

    pub fn clear_cover_file(&self) {
        if let Some(file) = self.cover_file.get_untracked() {
            revoke_preview(&file);
        }
        self.cover_file.set(None);
    }

    /// 将表单状态转换为请求体
    pub fn to_draft(&self) -> PostDraft {
        let excerpt = self.excerpt.get_untracked();
        PostDraft {
            title: self.title.get_untracked().trim().to_string(),
            content: self.content.get_untracked(),
            excerpt: (!excerpt.trim().is_empty()).then_some(excerpt),
            published: self.published.get_untracked(),
            category_id: self.category_id.get_untracked(),
            cover_image: self.cover_image.get_untracked(),
        }
    }
}

impl Default for PostFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 提交的内容：请求体加上待上传的封面
#[derive(Debug, Clone)]
pub struct PostSubmission {
    pub id: Option<i64>,
    pub draft: PostDraft,
    pub cover: Option<SelectedFile>,
}

/// 先上传封面（如果有），再创建或更新文章
pub async fn save_post(api: &AppApi, submission: PostSubmission) -> ApiResult<Post> {
    let PostSubmission { id, mut draft, cover } = submission;

    if let Some(file) = cover {
        let url = api
            .posts()
            .upload_cover(&file.name, &file.content_type, file.bytes)
            .await?;
        draft.cover_image = Some(url);
    }

    match id {
        Some(id) => api.posts().update(id, draft).await,
        None => api.posts().create(draft).await,
    }
}

#[component]
pub fn PostEditor(
    open: RwSignal<bool>,
    form: PostFormState,
    #[prop(into)] categories: Signal<Vec<Category>>,
    /// 保存中（由父组件控制）
    #[prop(into)]
    saving: Signal<bool>,
    #[prop(into)] on_save: Callback<PostSubmission>,
) -> impl IntoView {
    let title = Signal::derive(move || {
        if form.editing.get().is_some() {
            "Edit post".to_string()
        } else {
            "New post".to_string()
        }
    });

    let field_error = move |field: &'static str| {
        move || form.errors.with(|errs| error_for(errs, field).map(str::to_string))
    };

    let on_cover_change = move |ev: web_sys::Event| {
        spawn_local(async move {
            if let Some(file) = read_selected(&ev).await {
                form.clear_cover_file();
                form.cover_file.set(Some(file));
            }
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = form.to_draft();
        let errors = validate::post(&draft);
        if !errors.is_empty() {
            form.errors.set(errors);
            return;
        }
        form.errors.set(Vec::new());
        on_save.run(PostSubmission {
            id: form.editing.get_untracked(),
            draft,
            cover: form.cover_file.get_untracked(),
        });
    };

    let preview = move || {
        form.cover_file
            .with(|f| f.as_ref().and_then(|f| f.preview_url.clone()))
            .or_else(|| form.cover_image.get())
    };

    view! {
        <Modal open=open title=title>
            <form on:submit=on_submit class="space-y-4 mt-4">
                <div class="form-control">
                    <label class="label" for="post_title">
                        <span class="label-text">"Title"</span>
                    </label>
                    <input id="post_title" type="text" class="input input-bordered w-full"
                        prop:value=move || form.title.get()
                        on:input=move |ev| form.title.set(event_target_value(&ev))
                    />
                    <span class="text-error text-sm">{field_error("title")}</span>
                </div>

                <div class="form-control">
                    <label class="label" for="post_excerpt">
                        <span class="label-text">"Excerpt"</span>
                    </label>
                    <input id="post_excerpt" type="text" class="input input-bordered w-full"
                        prop:value=move || form.excerpt.get()
                        on:input=move |ev| form.excerpt.set(event_target_value(&ev))
                    />
                </div>

                <div class="form-control">
                    <label class="label" for="post_content">
                        <span class="label-text">"Content"</span>
                    </label>
                    <textarea id="post_content" rows="8" class="textarea textarea-bordered w-full"
                        prop:value=move || form.content.get()
                        on:input=move |ev| form.content.set(event_target_value(&ev))
                    ></textarea>
                    <span class="text-error text-sm">{field_error("content")}</span>
                </div>

                <div class="grid grid-cols-2 gap-4">
                    <div class="form-control">
                        <label class="label" for="post_category">
                            <span class="label-text">"Category"</span>
                        </label>
                        <select id="post_category" class="select select-bordered w-full"
                            on:change=move |ev| form.category_id.set(event_target_value(&ev).parse().ok())
                        >
                            <option value="" selected=move || form.category_id.get().is_none()>"No category"</option>
                            <For
                                each=move || categories.get()
                                key=|c| c.id
                                children=move |c| {
                                    let id = c.id;
                                    view! {
                                        <option value=id.to_string() selected=move || form.category_id.get() == Some(id)>
                                            {c.name}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </div>
                    <div class="form-control">
                        <label class="label cursor-pointer mt-8">
                            <span class="label-text">"Published"</span>
                            <input type="checkbox" class="toggle toggle-primary"
                                prop:checked=move || form.published.get()
                                on:change=move |ev| form.published.set(event_target_checked(&ev))
                            />
                        </label>
                    </div>
                </div>

                <div class="form-control">
                    <label class="label" for="post_cover">
                        <span class="label-text">"Cover"</span>
                    </label>
                    <input id="post_cover" type="file" accept="image/*,video/*,application/pdf"
                        class="file-input file-input-bordered w-full"
                        on:change=on_cover_change
                    />
                    {move || preview().map(|src| view! {
                        <img src=src alt="Cover preview" class="mt-2 h-32 w-full object-cover rounded" />
                    })}
                </div>

                <div class="modal-action">
                    <button type="button" class="btn" on:click=move |_| open.set(false)>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() {
                            view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                        } else {
                            "Save".into_any()
                        }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}
