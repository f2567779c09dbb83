use serde::{Deserialize, Serialize};

/// Pagination metadata, serialized in the envelope shape the route layer
/// returns verbatim: `{ page, limit, total, pages, hasNext, hasPrev }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// Page and limit are 1-based; zero values are clamped up to 1 so the
    /// arithmetic below stays total.
    pub fn compute(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
            has_next: page * limit < total,
            has_prev: page > 1,
        }
    }

    /// Half-open index range `[(page-1)*limit, page*limit)` clipped to the
    /// collection length. Out-of-range pages yield an empty range.
    pub fn slice_bounds(&self) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.limit).min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        (start, end)
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: PageInfo) -> Self {
        Self { data, pagination }
    }

    /// Convert the page contents while keeping the metadata, used by the
    /// typed layer to decode records in place.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Paginated<U>, E> {
        let data = self.data.into_iter().map(f).collect::<Result<_, E>>()?;
        Ok(Paginated {
            data,
            pagination: self.pagination,
        })
    }
}
