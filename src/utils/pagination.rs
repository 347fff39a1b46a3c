use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Pagination page number (start with 1)
    #[param(example = 1)]
    pub page: Option<u32>,
    /// Items per page, at most 100
    #[param(example = 20)]
    pub limit: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// One page of results plus the numbers a client needs to walk the rest.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    /// Slices one page out of an already ordered collection.
    pub fn from_vec(all: Vec<T>, params: PageParams) -> Self {
        let (page, limit) = (params.page(), params.limit());
        let total = all.len();
        let pages = total.div_ceil(limit as usize) as u32;
        let offset = (page as usize - 1).saturating_mul(limit as usize);

        let items = all.into_iter().skip(offset).take(limit as usize).collect();

        Self {
            items,
            total,
            page,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}
