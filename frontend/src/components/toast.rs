//! 全局提示消息

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use pressroom::ApiError;

/// 提示停留时间（毫秒）
const TOAST_MILLIS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub is_error: bool,
}

#[derive(Clone, Copy)]
pub struct Toaster {
    items: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toaster {
    fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(message.into(), true);
    }

    /// 显示接口错误
    ///
    /// 401 已经触发全局跳转，不再重复提示。
    pub fn api_error(&self, context: &str, err: &ApiError) {
        tracing::warn!(error = %err, context, "request failed");
        if err.is_unauthorized() {
            return;
        }
        self.error(format!("{}: {}", context, err.user_message()));
    }

    fn push(&self, message: String, is_error: bool) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.items.update(|items| {
            items.push(Toast {
                id,
                message,
                is_error,
            })
        });

        let items = self.items;
        Timeout::new(TOAST_MILLIS, move || {
            items.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }
}

pub fn provide_toaster() -> Toaster {
    let toaster = Toaster::new();
    provide_context(toaster);
    toaster
}

pub fn use_toaster() -> Toaster {
    use_context::<Toaster>().expect("Toaster should be provided")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toaster.items.get()
                key=|t| t.id
                children=move |toast| {
                    let class = if toast.is_error {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    };
                    view! {
                        <div class=class>
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
