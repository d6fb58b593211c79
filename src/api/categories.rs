use pressroom_shared::protocol::{
    CategoryDraft, CreateCategoryRequest, DeleteCategoryRequest, GetCategoryRequest,
    ListCategoriesRequest, UpdateCategoryRequest,
};
use pressroom_shared::{Category, Page};

use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::request::HttpClient;
use crate::storage::KeyValueStore;

pub struct CategoriesApi<'a, C, S> {
    gateway: &'a ApiGateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStore> CategoriesApi<'a, C, S> {
    pub fn new(gateway: &'a ApiGateway<C, S>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> ApiResult<Page<Category>> {
        self.gateway
            .call(&ListCategoriesRequest)
            .await
            .map(|list| list.into_page())
    }

    pub async fn get(&self, id: i64) -> ApiResult<Category> {
        self.gateway.call(&GetCategoryRequest { id }).await
    }

    pub async fn create(&self, draft: CategoryDraft) -> ApiResult<Category> {
        self.gateway.call(&CreateCategoryRequest { draft }).await
    }

    pub async fn update(&self, id: i64, draft: CategoryDraft) -> ApiResult<Category> {
        self.gateway.call(&UpdateCategoryRequest { id, draft }).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.gateway.call(&DeleteCategoryRequest { id }).await?;
        Ok(())
    }
}
