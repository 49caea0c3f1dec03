use kernel::prelude::entity::{Page, Pagination, SelectLimit, SelectOffset, Sort, SortKey};
use kernel::KernelError;

use crate::validation::Validator;

/// Raw paging input. Absent values fall back to the first page of 30 in the
/// default order.
#[derive(Debug, Clone, Default)]
pub struct PageRequestDto {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
    pub sort: Option<String>,
}

impl PageRequestDto {
    pub fn into_pagination<K: SortKey>(self) -> error_stack::Result<Pagination<K>, KernelError> {
        let limit = self.limit.map(SelectLimit::new).unwrap_or_default();
        let offset = self.offset.map(SelectOffset::new).unwrap_or_default();
        Validator::new()
            .require("limit", *limit.as_ref() > 0, "Limit must be greater than 0")
            .require("offset", *offset.as_ref() >= 0, "Offset must not be negative")
            .finish()?;
        let sort = match self.sort.as_deref().filter(|sort| !sort.trim().is_empty()) {
            Some(sort) => sort.parse::<Sort<K>>()?,
            None => Sort::default(),
        };
        Ok(Pagination::new(limit, offset, sort))
    }
}

#[derive(Debug, Clone)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i32,
    pub offset: i32,
}

impl<E, T: From<E>> From<Page<E>> for PageDto<T> {
    fn from(value: Page<E>) -> Self {
        let total = value.total();
        let limit = *value.limit().as_ref();
        let offset = *value.offset().as_ref();
        Self {
            items: value.into_items().into_iter().map(T::from).collect(),
            total,
            limit,
            offset,
        }
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{BookSortKey, SortDirection};
    use kernel::KernelError;

    use super::PageRequestDto;

    #[test]
    fn defaults_to_first_page() {
        let pagination = PageRequestDto::default()
            .into_pagination::<BookSortKey>()
            .unwrap();
        assert_eq!(*pagination.limit().as_ref(), 30);
        assert_eq!(*pagination.offset().as_ref(), 0);
        assert_eq!(pagination.sort().key(), BookSortKey::Title);
    }

    #[test]
    fn parses_sort_and_rejects_bad_windows() {
        let pagination = PageRequestDto {
            sort: Some("price,desc".into()),
            ..Default::default()
        }
        .into_pagination::<BookSortKey>()
        .unwrap();
        assert_eq!(pagination.sort().key(), BookSortKey::Price);
        assert_eq!(pagination.sort().direction(), SortDirection::Desc);

        let error = PageRequestDto {
            limit: Some(0),
            ..Default::default()
        }
        .into_pagination::<BookSortKey>()
        .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }
}
