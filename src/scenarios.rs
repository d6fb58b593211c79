//! 端到端场景：会话服务、网关、资源接口和守卫一起工作

use futures::StreamExt;
use pressroom_shared::protocol::PostFilters;
use pressroom_shared::{STORAGE_ACCESS_TOKEN, STORAGE_REFRESH_TOKEN, STORAGE_USER, User};
use serde_json::json;

use crate::api::BlogApi;
use crate::context::SessionEvent;
use crate::guard;
use crate::request::HttpMethod;
use crate::route::{AdminRoute, AppRoute};
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::testing::{self, harness, harness_with, url};

#[tokio::test]
async fn login_then_list_posts_sends_bearer_token() {
    let h = harness();
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        testing::auth_json("jwt-123", Some("r-1"), testing::user_json(1, "USER")),
    );
    h.client.mock_response(
        HttpMethod::Get,
        &url("/posts"),
        200,
        testing::paged(vec![testing::post_json(1, true)], 1),
    );

    let session = SessionStore::new(h.gateway.clone());
    let api = BlogApi::new(h.gateway.clone());

    session.login("a@b.com", "secret1").await.unwrap();
    let page = api.posts().list(PostFilters::default()).await.unwrap();

    assert_eq!(page.len(), 1);
    let req = h.client.last_request().unwrap();
    assert_eq!(req.url, url("/posts"));
    assert_eq!(req.header("Authorization"), Some("Bearer jwt-123"));
}

#[tokio::test]
async fn rejected_token_at_startup_leaves_visitor_signed_out() {
    let user = testing::user_json(1, "ADMIN").to_string();
    let store = MemoryStore::with_entries([
        (STORAGE_ACCESS_TOKEN, "stale"),
        (STORAGE_REFRESH_TOKEN, "r"),
        (STORAGE_USER, user.as_str()),
    ]);
    let h = harness_with(store);
    h.client.mock_response(
        HttpMethod::Get,
        &url("/auth/profile"),
        401,
        json!({ "statusCode": 401, "message": "Unauthorized" }),
    );

    let session = SessionStore::new(h.gateway.clone());
    let mut events = h.session.subscribe();

    // 校验期间管理页面处于等待状态
    let admin = AppRoute::Admin(AdminRoute::Posts);
    assert_eq!(guard::check(&admin, &session.snapshot()), guard::Access::Pending);

    assert!(!session.hydrate().await);

    let snapshot = session.snapshot();
    assert!(!snapshot.is_authenticated);
    assert!(!snapshot.is_loading);
    assert!(h.store.is_empty());
    assert_eq!(events.next().await, Some(SessionEvent::Expired));
    assert_eq!(guard::resolve(admin, &snapshot), AppRoute::Login);
}

#[tokio::test]
async fn any_unauthorized_response_ends_the_session() {
    let h = harness();
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        testing::auth_json("jwt", None, testing::user_json(1, "ADMIN")),
    );
    h.client.mock_response(
        HttpMethod::Get,
        &url("/categories"),
        401,
        json!({ "message": "Token expired" }),
    );

    let session = SessionStore::new(h.gateway.clone());
    let api = BlogApi::new(h.gateway.clone());
    session.login("a@b.com", "secret1").await.unwrap();
    assert!(session.snapshot().is_admin);

    let mut events = h.session.subscribe();
    let err = api.categories().list().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(events.next().await, Some(SessionEvent::Expired));
    assert!(!session.snapshot().is_authenticated);
    assert_eq!(
        guard::resolve(AppRoute::Admin(AdminRoute::Categories), &session.snapshot()),
        AppRoute::Login
    );
}

#[tokio::test]
async fn second_login_replaces_the_first() {
    let h = harness();
    let session = SessionStore::new(h.gateway.clone());

    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        testing::auth_json("first", Some("r-first"), testing::user_json(1, "ADMIN")),
    );
    session.login("admin@b.com", "secret1").await.unwrap();

    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        testing::auth_json("second", None, testing::user_json(2, "USER")),
    );
    session.login("user@b.com", "secret2").await.unwrap();

    assert_eq!(h.store.get(STORAGE_ACCESS_TOKEN).unwrap().as_deref(), Some("second"));
    assert_eq!(h.store.get(STORAGE_REFRESH_TOKEN).unwrap(), None);
    let user: User = serde_json::from_str(&h.store.get(STORAGE_USER).unwrap().unwrap()).unwrap();
    assert_eq!(user.id, 2);
    assert!(!session.snapshot().is_admin);
}

#[tokio::test]
async fn anonymous_visitor_cannot_open_admin_pages() {
    let h = harness();
    let session = SessionStore::new(h.gateway.clone());
    assert!(!session.hydrate().await);

    assert_eq!(
        guard::resolve(AppRoute::from_path("/admin/posts"), &session.snapshot()),
        AppRoute::Login
    );
    assert_eq!(h.client.request_count(), 0);
}
