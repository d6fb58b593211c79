use pressroom_shared::User;
use pressroom_shared::protocol::{
    AuthResponse, LoginRequest, ProfileRequest, RefreshRequest, RefreshResponse, RegisterRequest,
};

use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::request::HttpClient;
use crate::storage::KeyValueStore;

/// 认证接口
///
/// 只负责收发，持久化由 `SessionStore` 完成。
pub struct AuthApi<'a, C, S> {
    gateway: &'a ApiGateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStore> AuthApi<'a, C, S> {
    pub fn new(gateway: &'a ApiGateway<C, S>) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        self.gateway
            .call(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> ApiResult<AuthResponse> {
        self.gateway
            .call(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            })
            .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<RefreshResponse> {
        self.gateway
            .call(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .await
    }

    /// 当前 token 对应的用户
    pub async fn profile(&self) -> ApiResult<User> {
        self.gateway.call(&ProfileRequest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::testing::{self, harness, url};
    use serde_json::json;

    #[tokio::test]
    async fn test_login_posts_credentials_without_persisting() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Post,
            &url("/auth/login"),
            200,
            testing::auth_json("tok", Some("ref"), testing::user_json(1, "USER")),
        );

        let resp = AuthApi::new(&h.gateway).login("a@b.com", "secret1").await.unwrap();

        assert_eq!(resp.access_token, "tok");
        assert_eq!(resp.refresh_token.as_deref(), Some("ref"));
        assert_eq!(
            h.client.last_request().unwrap().json_body(),
            Some(json!({ "email": "a@b.com", "password": "secret1" }))
        );
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_sends_token() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Post,
            &url("/auth/refresh"),
            200,
            json!({ "access_token": "new" }),
        );

        let resp = AuthApi::new(&h.gateway).refresh("r1").await.unwrap();

        assert_eq!(resp.access_token, "new");
        assert_eq!(
            h.client.last_request().unwrap().json_body(),
            Some(json!({ "refresh_token": "r1" }))
        );
    }
}
