//! 资源接口层
//!
//! 每个资源一个薄客户端，全部经由 `ApiGateway` 发送请求。

mod auth;
mod categories;
mod comments;
mod posts;
mod users;

pub use auth::AuthApi;
pub use categories::CategoriesApi;
pub use comments::CommentsApi;
pub use posts::PostsApi;
pub use users::UsersApi;

use pressroom_shared::protocol::PostFilters;
use tracing::debug;

use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::request::HttpClient;
use crate::storage::KeyValueStore;

/// 管理后台首页的统计数字
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub posts: u64,
    pub categories: u64,
    pub users: u64,
}

/// 资源客户端的入口
pub struct BlogApi<C, S> {
    gateway: ApiGateway<C, S>,
}

impl<C, S> Clone for BlogApi<C, S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStore> BlogApi<C, S> {
    pub fn new(gateway: ApiGateway<C, S>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway<C, S> {
        &self.gateway
    }

    pub fn auth(&self) -> AuthApi<'_, C, S> {
        AuthApi::new(&self.gateway)
    }

    pub fn posts(&self) -> PostsApi<'_, C, S> {
        PostsApi::new(&self.gateway)
    }

    pub fn categories(&self) -> CategoriesApi<'_, C, S> {
        CategoriesApi::new(&self.gateway)
    }

    pub fn users(&self) -> UsersApi<'_, C, S> {
        UsersApi::new(&self.gateway)
    }

    pub fn comments(&self) -> CommentsApi<'_, C, S> {
        CommentsApi::new(&self.gateway)
    }

    /// 并发拉取三个列表，取各自的总数
    pub async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let posts = self.posts();
        let categories = self.categories();
        let users = self.users();

        let (posts, categories, users) = futures::try_join!(
            posts.list(PostFilters::default()),
            categories.list(),
            users.list(),
        )?;

        let stats = DashboardStats {
            posts: posts.meta.total,
            categories: categories.meta.total,
            users: users.meta.total,
        };
        debug!(?stats, "dashboard stats loaded");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::request::HttpMethod;
    use crate::testing::{self, harness, paged, url};
    use serde_json::json;

    #[tokio::test]
    async fn test_dashboard_stats_mixes_list_shapes() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Get,
            &url("/posts"),
            200,
            paged(vec![testing::post_json(1, true)], 42),
        );
        h.client.mock_response(
            HttpMethod::Get,
            &url("/categories"),
            200,
            json!([testing::category_json(1), testing::category_json(2)]),
        );
        h.client
            .mock_response(HttpMethod::Get, &url("/users"), 200, json!([]));

        let stats = BlogApi::new(h.gateway.clone()).dashboard_stats().await.unwrap();

        assert_eq!(
            stats,
            DashboardStats {
                posts: 42,
                categories: 2,
                users: 0
            }
        );
    }

    #[tokio::test]
    async fn test_dashboard_stats_fails_when_any_list_fails() {
        let h = harness();
        h.client
            .mock_response(HttpMethod::Get, &url("/posts"), 200, json!([]));
        h.client
            .mock_response(HttpMethod::Get, &url("/categories"), 200, json!([]));
        h.client.mock_response(
            HttpMethod::Get,
            &url("/users"),
            403,
            json!({ "message": "Forbidden resource" }),
        );

        let err = BlogApi::new(h.gateway.clone())
            .dashboard_stats()
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
