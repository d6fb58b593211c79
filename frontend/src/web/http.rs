//! HTTP 传输实现
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心库的 `HttpClient`。

use gloo_net::http::{Method, RequestBuilder};
use pressroom::error::TransportError;
use pressroom::request::{HttpMethod, RequestBody};
use pressroom::{HttpClient, HttpRequest, HttpResponse, MultipartFile};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// 浏览器 fetch 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchClient;

fn method(m: HttpMethod) -> Method {
    match m {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn js_err(e: JsValue) -> TransportError {
    TransportError::Build(format!("{:?}", e))
}

/// 构建 multipart 表单，Content-Type 与 boundary 由浏览器生成
fn form_data(file: &MultipartFile) -> Result<FormData, TransportError> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&file.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_err)?;

    let form = FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename(&file.field, &blob, &file.file_name)
        .map_err(js_err)?;
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = RequestBuilder::new(&req.url).method(method(req.method));
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match &req.body {
            Some(RequestBody::Json(body)) => builder.body(body.as_str()),
            Some(RequestBody::Multipart(file)) => builder.body(form_data(file)?),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
