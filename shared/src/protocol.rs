use crate::{Category, Comment, ListResponse, Post, Role, User};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base URL.
    fn path(&self) -> String;
    /// Query parameters, only the ones that are set.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
    /// JSON body, if the endpoint takes one.
    fn body(&self) -> Option<Value> {
        None
    }
}

/// Delete endpoints answer with an empty body or the removed entity; either is ignored.
pub type Deleted = IgnoredAny;

fn to_body<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".into()
    }
    fn body(&self) -> Option<Value> {
        to_body(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/register".into()
    }
    fn body(&self) -> Option<Value> {
        to_body(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl ApiRequest for RefreshRequest {
    type Response = RefreshResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/refresh".into()
    }
    fn body(&self) -> Option<Value> {
        to_body(self)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/auth/profile".into()
    }
}

// =========================================================
// Posts
// =========================================================

/// Filters accepted by `GET /posts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilters {
    pub search: Option<String>,
    pub published: Option<bool>,
    pub category_id: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PostFilters {
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(published) = self.published {
            params.push(("published", published.to_string()));
        }
        if let Some(category_id) = self.category_id {
            params.push(("categoryId", category_id.to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Body of post create/update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            published: post.published,
            category_id: post.category_id,
            cover_image: post.cover_image.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListPostsRequest {
    pub filters: PostFilters,
}

impl ApiRequest for ListPostsRequest {
    type Response = ListResponse<Post>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/posts".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        self.filters.to_query()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListPostsByAuthorRequest {
    pub author_id: i64,
}

impl ApiRequest for ListPostsByAuthorRequest {
    type Response = ListResponse<Post>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/posts/user/{}", self.author_id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetPostRequest {
    pub id: i64,
}

impl ApiRequest for GetPostRequest {
    type Response = Post;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/posts/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct GetPostBySlugRequest {
    pub slug: String,
}

impl ApiRequest for GetPostBySlugRequest {
    type Response = Post;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/posts/slug/{}", self.slug)
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub draft: PostDraft,
}

impl ApiRequest for CreatePostRequest {
    type Response = Post;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/posts".into()
    }
    fn body(&self) -> Option<Value> {
        to_body(&self.draft)
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePostRequest {
    pub id: i64,
    pub draft: PostDraft,
}

impl ApiRequest for UpdatePostRequest {
    type Response = Post;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/posts/{}", self.id)
    }
    fn body(&self) -> Option<Value> {
        to_body(&self.draft)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeletePostRequest {
    pub id: i64,
}

impl ApiRequest for DeletePostRequest {
    type Response = Deleted;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/posts/{}", self.id)
    }
}

/// Multipart endpoint for cover uploads; the file goes in the `file` field.
pub const COVER_UPLOAD_PATH: &str = "/posts/upload-cover";
pub const COVER_UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadCoverResponse {
    #[serde(alias = "coverImage")]
    pub url: String,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCoverRequest {
    pub post_id: i64,
}

impl ApiRequest for DeleteCoverRequest {
    type Response = Post;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/posts/{}/cover", self.post_id)
    }
}

// =========================================================
// Comments
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListCommentsRequest {
    pub post_id: i64,
}

impl ApiRequest for ListCommentsRequest {
    type Response = ListResponse<Comment>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/posts/{}/comments", self.post_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CreateCommentRequest {
    pub post_id: i64,
    pub comment: NewComment,
}

impl ApiRequest for CreateCommentRequest {
    type Response = Comment;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/posts/{}/comments", self.post_id)
    }
    fn body(&self) -> Option<Value> {
        to_body(&self.comment)
    }
}

// =========================================================
// Categories
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListCategoriesRequest;

impl ApiRequest for ListCategoriesRequest {
    type Response = ListResponse<Category>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/categories".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetCategoryRequest {
    pub id: i64,
}

impl ApiRequest for GetCategoryRequest {
    type Response = Category;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/categories/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategoryRequest {
    pub draft: CategoryDraft,
}

impl ApiRequest for CreateCategoryRequest {
    type Response = Category;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/categories".into()
    }
    fn body(&self) -> Option<Value> {
        to_body(&self.draft)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryRequest {
    pub id: i64,
    pub draft: CategoryDraft,
}

impl ApiRequest for UpdateCategoryRequest {
    type Response = Category;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/categories/{}", self.id)
    }
    fn body(&self) -> Option<Value> {
        to_body(&self.draft)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCategoryRequest {
    pub id: i64,
}

impl ApiRequest for DeleteCategoryRequest {
    type Response = Deleted;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/categories/{}", self.id)
    }
}

// =========================================================
// Users
// =========================================================

/// Body of `POST /users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Body of `PUT /users/:id`; the password is only sent when changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = ListResponse<User>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/users".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetUserRequest {
    pub id: i64,
}

impl ApiRequest for GetUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/users/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub user: NewUser,
}

impl ApiRequest for CreateUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/users".into()
    }
    fn body(&self) -> Option<Value> {
        to_body(&self.user)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub id: i64,
    pub update: UserUpdate,
}

impl ApiRequest for UpdateUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/users/{}", self.id)
    }
    fn body(&self) -> Option<Value> {
        to_body(&self.update)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteUserRequest {
    pub id: i64,
}

impl ApiRequest for DeleteUserRequest {
    type Response = Deleted;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/users/{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_only_serialize_set_fields() {
        assert!(PostFilters::default().to_query().is_empty());

        let filters = PostFilters {
            search: Some("rust".into()),
            published: Some(false),
            category_id: Some(4),
            page: Some(2),
            limit: Some(10),
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("search", "rust".to_string()),
                ("published", "false".to_string()),
                ("categoryId", "4".to_string()),
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_search_is_dropped() {
        let filters = PostFilters {
            search: Some(String::new()),
            ..PostFilters::published()
        };
        assert_eq!(filters.to_query(), vec![("published", "true".to_string())]);
    }

    #[test]
    fn test_post_draft_body_is_camel_case() {
        let req = CreatePostRequest {
            draft: PostDraft {
                title: "T".into(),
                content: "C".into(),
                published: true,
                category_id: Some(3),
                ..PostDraft::default()
            },
        };
        assert_eq!(
            req.body(),
            Some(json!({ "title": "T", "content": "C", "published": true, "categoryId": 3 }))
        );
    }

    #[test]
    fn test_refresh_body_uses_snake_case_token() {
        let req = RefreshRequest {
            refresh_token: "r1".into(),
        };
        assert_eq!(req.body(), Some(json!({ "refresh_token": "r1" })));
        assert_eq!(RefreshRequest::METHOD, HttpMethod::Post);
    }

    #[test]
    fn test_user_update_skips_unset_password() {
        let req = UpdateUserRequest {
            id: 5,
            update: UserUpdate {
                name: Some("N".into()),
                role: Some(Role::Admin),
                ..UserUpdate::default()
            },
        };
        assert_eq!(req.path(), "/users/5");
        assert_eq!(req.body(), Some(json!({ "name": "N", "role": "ADMIN" })));
    }

    #[test]
    fn test_auth_response_without_refresh_token() {
        let resp: AuthResponse = serde_json::from_value(json!({
            "access_token": "a",
            "user": {
                "id": 1, "email": "a@b.com", "name": "A", "role": "USER",
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
            }
        }))
        .unwrap();
        assert_eq!(resp.refresh_token, None);
    }

    #[test]
    fn test_paths() {
        assert_eq!(GetPostBySlugRequest { slug: "hi".into() }.path(), "/posts/slug/hi");
        assert_eq!(DeleteCoverRequest { post_id: 2 }.path(), "/posts/2/cover");
        assert_eq!(ListCommentsRequest { post_id: 8 }.path(), "/posts/8/comments");
        assert_eq!(ListPostsByAuthorRequest { author_id: 3 }.path(), "/posts/user/3");
    }
}
