use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod date;
pub mod list;
pub mod media;
pub mod protocol;
pub mod validate;

pub use list::{ListResponse, Page, PaginationMeta};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化存储中使用的键名
pub const STORAGE_ACCESS_TOKEN: &str = "access_token";
pub const STORAGE_REFRESH_TOKEN: &str = "refreshToken";
pub const STORAGE_USER: &str = "user";

pub const HEADER_AUTHORIZATION: &str = "Authorization";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// 列表卡片上展示的摘要：优先使用 excerpt，否则截取正文
    pub fn summary(&self, max_chars: usize) -> String {
        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
            return excerpt.to_string();
        }
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}…", head.trim_end())
        } else {
            head
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 个人主页文章可见性过滤
///
/// 草稿只在访问者自己的主页上可见。
pub fn visible_posts<'a>(
    posts: &'a [Post],
    show_published: bool,
    show_drafts: bool,
    is_own_profile: bool,
) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| {
            if p.published {
                show_published
            } else {
                show_drafts && is_own_profile
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: i64, published: bool) -> Post {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("Post {}", id),
            "slug": format!("post-{}", id),
            "content": "body",
            "published": published,
            "authorId": 1,
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_user_decodes_camel_case_and_role() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "email": "a@b.com",
            "name": "Ana",
            "role": "ADMIN",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert!(user.is_admin());
    }

    #[test]
    fn test_post_with_embedded_author_and_category() {
        let post: Post = serde_json::from_value(json!({
            "id": 1,
            "title": "Hello",
            "slug": "hello",
            "content": "world",
            "coverImage": "https://cdn/x.png",
            "published": true,
            "authorId": 2,
            "categoryId": 3,
            "author": {
                "id": 2, "email": "x@y.z", "name": "X", "role": "USER",
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
            },
            "category": {
                "id": 3, "name": "Rust", "slug": "rust",
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
            },
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(post.author.as_ref().map(|a| a.name.as_str()), Some("X"));
        assert_eq!(post.category.as_ref().map(|c| c.slug.as_str()), Some("rust"));
        assert_eq!(post.cover_image.as_deref(), Some("https://cdn/x.png"));
        assert_eq!(post.excerpt, None);
    }

    #[test]
    fn test_summary_prefers_excerpt() {
        let mut p = post(1, true);
        p.content = "a".repeat(50);
        assert_eq!(p.summary(10), format!("{}…", "a".repeat(10)));

        p.excerpt = Some("short".into());
        assert_eq!(p.summary(10), "short");
    }

    #[test]
    fn test_visible_posts_hides_drafts_of_others() {
        let posts = vec![post(1, true), post(2, false)];

        let own: Vec<i64> = visible_posts(&posts, true, true, true)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(own, vec![1, 2]);

        let other: Vec<i64> = visible_posts(&posts, true, true, false)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(other, vec![1]);

        assert!(visible_posts(&posts, false, false, true).is_empty());
    }
}
