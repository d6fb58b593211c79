//! 文件选择辅助：读取 `<input type="file">` 选中的文件

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

/// 已读入内存的文件，可以放进 signal
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// `blob:` 预览地址
    pub preview_url: Option<String>,
}

/// 读取 change 事件中的第一个文件；没有选择文件时返回 `None`
pub async fn read_selected(ev: &web_sys::Event) -> Option<SelectedFile> {
    let input = ev.target()?.dyn_into::<HtmlInputElement>().ok()?;
    let file = input.files()?.get(0)?;

    let buffer = match JsFuture::from(file.array_buffer()).await {
        Ok(buffer) => buffer,
        Err(e) => {
            tracing::warn!(error = ?e, "failed to read selected file");
            return None;
        }
    };

    Some(SelectedFile {
        name: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        preview_url: web_sys::Url::create_object_url_with_blob(&file).ok(),
    })
}

/// 释放预览地址
pub fn revoke_preview(file: &SelectedFile) {
    if let Some(url) = &file.preview_url {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}
