use pressroom_shared::protocol::{
    COVER_UPLOAD_FIELD, COVER_UPLOAD_PATH, CreatePostRequest, DeleteCoverRequest,
    DeletePostRequest, GetPostBySlugRequest, GetPostRequest, ListPostsByAuthorRequest,
    ListPostsRequest, PostDraft, PostFilters, UpdatePostRequest, UploadCoverResponse,
};
use pressroom_shared::{Page, Post};

use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::request::{HttpClient, MultipartFile};
use crate::storage::KeyValueStore;

pub struct PostsApi<'a, C, S> {
    gateway: &'a ApiGateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStore> PostsApi<'a, C, S> {
    pub fn new(gateway: &'a ApiGateway<C, S>) -> Self {
        Self { gateway }
    }

    /// 列出文章，只发送已设置的过滤条件
    pub async fn list(&self, filters: PostFilters) -> ApiResult<Page<Post>> {
        self.gateway
            .call(&ListPostsRequest { filters })
            .await
            .map(|list| list.into_page())
    }

    pub async fn list_by_author(&self, author_id: i64) -> ApiResult<Page<Post>> {
        self.gateway
            .call(&ListPostsByAuthorRequest { author_id })
            .await
            .map(|list| list.into_page())
    }

    pub async fn get(&self, id: i64) -> ApiResult<Post> {
        self.gateway.call(&GetPostRequest { id }).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> ApiResult<Post> {
        self.gateway
            .call(&GetPostBySlugRequest {
                slug: slug.to_string(),
            })
            .await
    }

    pub async fn create(&self, draft: PostDraft) -> ApiResult<Post> {
        self.gateway.call(&CreatePostRequest { draft }).await
    }

    pub async fn update(&self, id: i64, draft: PostDraft) -> ApiResult<Post> {
        self.gateway.call(&UpdatePostRequest { id, draft }).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.gateway.call(&DeletePostRequest { id }).await?;
        Ok(())
    }

    /// 上传封面文件，返回可写入 `coverImage` 的地址
    pub async fn upload_cover(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<String> {
        let file = MultipartFile {
            field: COVER_UPLOAD_FIELD.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        };
        let resp: UploadCoverResponse = self.gateway.upload(COVER_UPLOAD_PATH, file).await?;
        Ok(resp.url)
    }

    /// 移除文章封面，返回更新后的文章
    pub async fn delete_cover(&self, post_id: i64) -> ApiResult<Post> {
        self.gateway.call(&DeleteCoverRequest { post_id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::request::{HttpMethod, RequestBody};
    use crate::testing::{self, harness, paged, url};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_sends_only_set_filters() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Get,
            &url("/posts?search=rust&published=true&categoryId=3"),
            200,
            paged(vec![testing::post_json(1, true)], 1),
        );

        let page = PostsApi::new(&h.gateway)
            .list(PostFilters {
                search: Some("rust".into()),
                published: Some(true),
                category_id: Some(3),
                ..PostFilters::default()
            })
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.data[0].slug, "post-1");
    }

    #[tokio::test]
    async fn test_bare_and_paged_lists_normalize_identically() {
        let h = harness();
        let items = vec![testing::post_json(1, true), testing::post_json(2, true)];
        h.client
            .mock_response(HttpMethod::Get, &url("/posts"), 200, json!(items.clone()));
        h.client
            .mock_response(HttpMethod::Get, &url("/posts/user/1"), 200, paged(items, 2));

        let api = PostsApi::new(&h.gateway);
        let bare = api.list(PostFilters::default()).await.unwrap();
        let enveloped = api.list_by_author(1).await.unwrap();

        assert_eq!(bare.data, enveloped.data);
        assert_eq!(bare.meta.total, 2);
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Get,
            &url("/posts/slug/missing"),
            404,
            json!({ "statusCode": 404, "message": "Post not found" }),
        );

        let err = PostsApi::new(&h.gateway)
            .get_by_slug("missing")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_upload_cover_returns_url() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Post,
            &url("/posts/upload-cover"),
            201,
            json!({ "url": "/uploads/cover.jpg" }),
        );

        let url = PostsApi::new(&h.gateway)
            .upload_cover("cover.jpg", "image/jpeg", vec![0xff, 0xd8])
            .await
            .unwrap();

        assert_eq!(url, "/uploads/cover.jpg");
        match h.client.last_request().unwrap().body {
            Some(RequestBody::Multipart(file)) => {
                assert_eq!(file.field, "file");
                assert_eq!(file.file_name, "cover.jpg");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_cover_returns_post() {
        let h = harness();
        h.client.mock_response(
            HttpMethod::Delete,
            &url("/posts/7/cover"),
            200,
            testing::post_json(7, true),
        );

        let post = PostsApi::new(&h.gateway).delete_cover(7).await.unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.cover_image, None);
    }
}
