//! 列表响应模块
//!
//! 后端的列表接口可能返回两种形状：
//! - 裸数组 `[...]`
//! - 分页信封 `{ "data": [...], "meta": {...} }`
//!
//! `ListResponse` 在 API 边界显式解码这两种形状，
//! `into_page()` 用一次 match 统一为 `Page<T>`。

use serde::{Deserialize, Serialize};

/// 分页元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PaginationMeta {
    /// 为没有分页信息的裸数组合成元信息
    pub fn single_page(len: usize) -> Self {
        Self {
            total: len as u64,
            page: 1,
            limit: len as u32,
            total_pages: 1,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// 统一后的列表形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            meta: PaginationMeta::single_page(0),
        }
    }
}

/// 列表接口的原始响应
///
/// `Bare` 放在前面：对象无法被解码为 `Vec<T>`，
/// 因此信封总是落到 `Paged` 分支。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Paged(Page<T>),
}

impl<T> ListResponse<T> {
    pub fn into_page(self) -> Page<T> {
        match self {
            ListResponse::Bare(data) => Page {
                meta: PaginationMeta::single_page(data.len()),
                data,
            },
            ListResponse::Paged(page) => page,
        }
    }
}

impl<T> From<ListResponse<T>> for Page<T> {
    fn from(resp: ListResponse<T>) -> Self {
        resp.into_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        id: i64,
    }

    #[test]
    fn test_bare_array_normalizes_to_single_page() {
        let resp: ListResponse<Item> =
            serde_json::from_value(json!([{ "id": 1 }, { "id": 2 }])).unwrap();
        assert!(matches!(resp, ListResponse::Bare(_)));

        let page = resp.into_page();
        assert_eq!(page.data, vec![Item { id: 1 }, Item { id: 2 }]);
        assert_eq!(page.meta, PaginationMeta::single_page(2));
        assert!(!page.meta.has_next());
    }

    #[test]
    fn test_envelope_keeps_server_meta() {
        let resp: ListResponse<Item> = serde_json::from_value(json!({
            "data": [{ "id": 3 }],
            "meta": { "total": 11, "page": 2, "limit": 5, "totalPages": 3 }
        }))
        .unwrap();

        let page: Page<Item> = resp.into();
        assert_eq!(page.data, vec![Item { id: 3 }]);
        assert_eq!(page.meta.total, 11);
        assert!(page.meta.has_next());
        assert!(page.meta.has_prev());
    }

    #[test]
    fn test_both_shapes_yield_same_data() {
        let bare: Page<Item> = serde_json::from_value::<ListResponse<Item>>(json!([{ "id": 9 }]))
            .unwrap()
            .into_page();
        let paged: Page<Item> = serde_json::from_value::<ListResponse<Item>>(json!({
            "data": [{ "id": 9 }],
            "meta": { "total": 1, "page": 1, "limit": 1, "totalPages": 1 }
        }))
        .unwrap()
        .into_page();

        assert_eq!(bare, paged);
    }

    #[test]
    fn test_empty_array() {
        let page = serde_json::from_value::<ListResponse<Item>>(json!([]))
            .unwrap()
            .into_page();
        assert!(page.is_empty());
        assert_eq!(page.meta.total_pages, 1);
    }
}
