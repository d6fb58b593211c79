use pressroom_shared::protocol::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, NewUser,
    UpdateUserRequest, UserUpdate,
};
use pressroom_shared::{Page, User};

use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::request::HttpClient;
use crate::storage::KeyValueStore;

/// 用户管理接口（后端要求管理员权限）
pub struct UsersApi<'a, C, S> {
    gateway: &'a ApiGateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStore> UsersApi<'a, C, S> {
    pub fn new(gateway: &'a ApiGateway<C, S>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> ApiResult<Page<User>> {
        self.gateway
            .call(&ListUsersRequest)
            .await
            .map(|list| list.into_page())
    }

    pub async fn get(&self, id: i64) -> ApiResult<User> {
        self.gateway.call(&GetUserRequest { id }).await
    }

    pub async fn create(&self, user: NewUser) -> ApiResult<User> {
        self.gateway.call(&CreateUserRequest { user }).await
    }

    pub async fn update(&self, id: i64, update: UserUpdate) -> ApiResult<User> {
        self.gateway.call(&UpdateUserRequest { id, update }).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.gateway.call(&DeleteUserRequest { id }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::testing::{self, harness, paged, url};
    use pressroom_shared::Role;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_paged_users() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Get,
            &url("/users"),
            200,
            paged(vec![testing::user_json(1, "ADMIN"), testing::user_json(2, "USER")], 12),
        );

        let page = UsersApi::new(&h.gateway).list().await.unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.meta.total, 12);
        assert!(page.data[0].is_admin());
    }

    #[tokio::test]
    async fn test_create_sends_role() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Post,
            &url("/users"),
            201,
            testing::user_json(5, "ADMIN"),
        );

        let user = UsersApi::new(&h.gateway)
            .create(NewUser {
                name: "Ana".into(),
                email: "ana@example.com".into(),
                password: "secret1".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        assert_eq!(user.id, 5);
        assert_eq!(h.client.last_request().unwrap().json_body().unwrap()["role"], json!("ADMIN"));
    }
}
