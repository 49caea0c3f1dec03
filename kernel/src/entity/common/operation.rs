use std::fmt::Debug;
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::{ErrorMessage, KernelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectLimit(i32);

impl SelectLimit {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectLimit(value.into())
    }
}

impl Default for SelectLimit {
    fn default() -> Self {
        Self::new(30)
    }
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize,
)]
pub struct SelectOffset(i32);

impl SelectOffset {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectOffset(value.into())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Report::new(KernelError::Validation).attach_printable(
                ErrorMessage::new(format!("Unknown sort direction: {other}")),
            )),
        }
    }
}

/// Column a listing may be ordered by. Implementors whitelist what is sortable.
pub trait SortKey: Debug + Default + Copy + Eq + Send + Sync + 'static {
    fn parse(key: &str) -> Option<Self>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sort<K> {
    key: K,
    direction: SortDirection,
}

impl<K: SortKey> Sort<K> {
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn key(&self) -> K {
        self.key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Parses `field` or `field,direction`.
impl<K: SortKey> FromStr for Sort<K> {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or_default().trim();
        let key = K::parse(field).ok_or_else(|| {
            Report::new(KernelError::Validation)
                .attach_printable(ErrorMessage::new(format!("Unknown sort field: {field}")))
        })?;
        let direction = match parts.next() {
            Some(direction) => direction.trim().parse()?,
            None => SortDirection::default(),
        };
        Ok(Self::new(key, direction))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pagination<K> {
    limit: SelectLimit,
    offset: SelectOffset,
    sort: Sort<K>,
}

impl<K: SortKey> Pagination<K> {
    pub fn new(limit: SelectLimit, offset: SelectOffset, sort: Sort<K>) -> Self {
        Self {
            limit,
            offset,
            sort,
        }
    }

    pub fn limit(&self) -> SelectLimit {
        self.limit
    }

    pub fn offset(&self) -> SelectOffset {
        self.offset
    }

    pub fn sort(&self) -> Sort<K> {
        self.sort
    }

    /// Applies the window to an already ordered sequence.
    pub fn window<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let offset = usize::try_from(*self.offset.as_ref()).unwrap_or_default();
        let limit = usize::try_from(*self.limit.as_ref()).unwrap_or_default();
        items.into_iter().skip(offset).take(limit).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: i64,
    limit: SelectLimit,
    offset: SelectOffset,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: SelectLimit, offset: SelectOffset) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn limit(&self) -> SelectLimit {
        self.limit
    }

    pub fn offset(&self) -> SelectOffset {
        self.offset
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?,
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Pagination, SelectLimit, SelectOffset, Sort, SortDirection, SortKey};

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    enum Key {
        #[default]
        Name,
        Price,
    }

    impl SortKey for Key {
        fn parse(key: &str) -> Option<Self> {
            match key {
                "name" => Some(Key::Name),
                "price" => Some(Key::Price),
                _ => None,
            }
        }
    }

    #[test]
    fn parse_sort() {
        let sort: Sort<Key> = "price,desc".parse().unwrap();
        assert_eq!(sort, Sort::new(Key::Price, SortDirection::Desc));

        let sort: Sort<Key> = "name".parse().unwrap();
        assert_eq!(sort, Sort::new(Key::Name, SortDirection::Asc));

        assert!("isbn".parse::<Sort<Key>>().is_err());
        assert!("name,sideways".parse::<Sort<Key>>().is_err());
    }

    #[test]
    fn window_skips_and_takes() {
        let pagination = Pagination::new(
            SelectLimit::new(2),
            SelectOffset::new(1),
            Sort::<Key>::default(),
        );
        assert_eq!(pagination.window(1..=5), vec![2, 3]);
    }
}
