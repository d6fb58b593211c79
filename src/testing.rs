//! 测试夹具：后端响应的 JSON 样本与预置的 gateway

use serde_json::{Value, json};

use crate::context::SessionContext;
use crate::gateway::ApiGateway;
use crate::request::MockHttpClient;
use crate::storage::MemoryStore;

pub const BASE: &str = "http://api.test";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

pub fn user_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("user{}@example.com", id),
        "name": format!("User {}", id),
        "role": role,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn post_json(id: i64, published: bool) -> Value {
    json!({
        "id": id,
        "title": format!("Post {}", id),
        "slug": format!("post-{}", id),
        "content": "Body",
        "published": published,
        "authorId": 1,
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-01T10:00:00.000Z"
    })
}

pub fn category_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Category {}", id),
        "slug": format!("category-{}", id),
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn comment_json(id: i64, post_id: i64) -> Value {
    json!({
        "id": id,
        "content": "Nice post",
        "authorId": 2,
        "postId": post_id,
        "createdAt": "2024-03-02T10:00:00.000Z",
        "updatedAt": "2024-03-02T10:00:00.000Z"
    })
}

pub fn auth_json(token: &str, refresh: Option<&str>, user: Value) -> Value {
    let mut body = json!({ "access_token": token, "user": user });
    if let Some(r) = refresh {
        body["refresh_token"] = json!(r);
    }
    body
}

pub fn paged(items: Vec<Value>, total: u64) -> Value {
    json!({
        "data": items,
        "meta": { "total": total, "page": 1, "limit": 10, "totalPages": 1 }
    })
}

pub struct Harness {
    pub client: MockHttpClient,
    pub store: MemoryStore,
    pub session: SessionContext<MemoryStore>,
    pub gateway: ApiGateway<MockHttpClient, MemoryStore>,
}

/// 以给定的存储内容启动一套 mock 环境
pub fn harness_with(store: MemoryStore) -> Harness {
    let client = MockHttpClient::new();
    let session = SessionContext::new(store.clone());
    let gateway = ApiGateway::new(client.clone(), BASE, session.clone());
    Harness {
        client,
        store,
        session,
        gateway,
    }
}

pub fn harness() -> Harness {
    harness_with(MemoryStore::new())
}
