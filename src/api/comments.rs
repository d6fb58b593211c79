use pressroom_shared::protocol::{CreateCommentRequest, ListCommentsRequest, NewComment};
use pressroom_shared::{Comment, Page};

use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::request::HttpClient;
use crate::storage::KeyValueStore;

pub struct CommentsApi<'a, C, S> {
    gateway: &'a ApiGateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStore> CommentsApi<'a, C, S> {
    pub fn new(gateway: &'a ApiGateway<C, S>) -> Self {
        Self { gateway }
    }

    pub async fn list_for_post(&self, post_id: i64) -> ApiResult<Page<Comment>> {
        self.gateway
            .call(&ListCommentsRequest { post_id })
            .await
            .map(|list| list.into_page())
    }

    pub async fn create(&self, post_id: i64, content: &str) -> ApiResult<Comment> {
        self.gateway
            .call(&CreateCommentRequest {
                post_id,
                comment: NewComment {
                    content: content.to_string(),
                },
            })
            .await
    }
}
