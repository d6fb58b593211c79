//! API 网关
//!
//! 拼接接口地址并附加 bearer token，统一把响应映射成 `ApiError`。
//! 任何 401 都会以 `Expired` 结束当前会话。

use std::rc::Rc;

use pressroom_shared::HEADER_AUTHORIZATION;
use pressroom_shared::protocol::ApiRequest;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::context::{SessionContext, SessionEvent};
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartFile};
use crate::storage::KeyValueStore;

// =========================================================
// API 网关 (Request Gateway)
// =========================================================

struct GatewayInner<C, S> {
    client: C,
    base_url: String,
    session: SessionContext<S>,
}

/// 所有后端请求的唯一出口
///
/// - 有 token 时附加 `Authorization: Bearer <token>`
/// - 任何 401 响应都会清除会话并通知订阅者
/// - 非 2xx 响应转换为 `ApiError`
pub struct ApiGateway<C, S> {
    inner: Rc<GatewayInner<C, S>>,
}

impl<C, S> Clone for ApiGateway<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: HttpClient, S: KeyValueStore> ApiGateway<C, S> {
    // 这里接受任何实现了 HttpClient 的客户端
    pub fn new(client: C, base_url: &str, session: SessionContext<S>) -> Self {
        Self {
            inner: Rc::new(GatewayInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                session,
            }),
        }
    }

    pub fn session(&self) -> &SessionContext<S> {
        &self.inner.session
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// 拼接完整 URL，查询参数按 form-urlencoded 编码
    pub fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.inner.base_url, path)
        } else {
            format!("{}/{}", self.inner.base_url, path)
        };
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    /// 发送一个类型化请求并解码响应
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let path = request.path();
        let mut req = HttpRequest::new(&self.url(&path, &request.query()), R::METHOD);
        if let Some(body) = request.body() {
            req = req.with_json(body);
        }
        let resp = self.execute(req, &path).await?;
        resp.json::<R::Response>()
            .map_err(|e| e.in_op(format!("{} {}", R::METHOD.as_str(), path)))
    }

    /// multipart 上传，响应按 JSON 解码
    ///
    /// 失败时错误链上附带文件名。
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, file: MultipartFile) -> ApiResult<T> {
        let file_name = file.file_name.clone();
        let req = HttpRequest::new(&self.url(path, &[]), HttpMethod::Post).with_multipart(file);
        let result = match self.execute(req, path).await {
            Ok(resp) => resp.json::<T>().map_err(|e| e.in_op(format!("POST {}", path))),
            Err(e) => Err(e),
        };
        result.map_err(|e| e.in_op_with("upload", file_name))
    }

    async fn execute(&self, mut req: HttpRequest, path: &str) -> ApiResult<HttpResponse> {
        let op = format!("{} {}", req.method.as_str(), path);

        if let Some(token) = self.inner.session.access_token() {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        debug!(method = req.method.as_str(), url = %req.url, "sending request");
        let resp = self
            .inner
            .client
            .send(req)
            .await
            .map_err(|e| ApiError::from(e).in_op(op.clone()))?;
        debug!(status = resp.status, %op, "response received");

        if resp.status == 401 {
            warn!(%op, "unauthorized response, tearing down session");
            self.inner.session.clear(SessionEvent::Expired);
            return Err(ApiError::from_response(401, &resp.body).in_op(op));
        }

        if !resp.is_success() {
            return Err(ApiError::from_response(resp.status, &resp.body).in_op(op));
        }

        Ok(resp)
    }
}
