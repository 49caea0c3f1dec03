use serde::Serialize;

use application::transfer::PageDto;

/// One window of a listing together with the size of the whole result.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    items: Vec<T>,
    total: i64,
    limit: i32,
    offset: i32,
}

impl<D, T: From<D>> From<PageDto<D>> for PageResponse<T> {
    fn from(value: PageDto<D>) -> Self {
        Self {
            items: value.items.into_iter().map(T::from).collect(),
            total: value.total,
            limit: value.limit,
            offset: value.offset,
        }
    }
}
