use serde::Deserialize;

use application::transfer::PageRequestDto;

/// `?limit=&offset=&sort=field[,asc|desc]`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    limit: Option<i32>,
    offset: Option<i32>,
    sort: Option<String>,
}

impl PageQuery {
    pub fn new(limit: Option<i32>, offset: Option<i32>, sort: Option<String>) -> Self {
        Self {
            limit,
            offset,
            sort,
        }
    }
}

impl From<PageQuery> for PageRequestDto {
    fn from(value: PageQuery) -> Self {
        PageRequestDto {
            limit: value.limit,
            offset: value.offset,
            sort: value.sort,
        }
    }
}
