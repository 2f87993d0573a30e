use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::ServiceError;

/// Contents of a freshly started store.
pub const SEED_ITEMS: [&str; 5] = ["Apple", "Banana", "Orange", "Grape", "Mango"];

/// Presentation order for [`ItemsStore::list`]. Never affects stored order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortStrategy {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortStrategy {
    /// Resolve the optional wire value; absence means [`SortStrategy::Unsorted`].
    pub fn from_param(value: Option<i64>) -> Result<Self, ServiceError> {
        value.map_or(Ok(SortStrategy::Unsorted), SortStrategy::try_from)
    }
}

impl TryFrom<i64> for SortStrategy {
    type Error = ServiceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SortStrategy::Unsorted),
            1 => Ok(SortStrategy::Ascending),
            -1 => Ok(SortStrategy::Descending),
            _ => Err(ServiceError::invalid("invalid sortStrategy value")),
        }
    }
}

/// Ordered, in-memory list of item names shared by all request handlers.
///
/// Items are addressed by zero-based position. Positions are not stable
/// identifiers: deleting an item shifts every later item one slot towards
/// the start, so an index read before a delete may point elsewhere after it.
///
/// Reads hold the read lock and mutations hold the write lock for their whole
/// check-then-apply span, so a rejected call never changes the list.
#[derive(Clone, Debug)]
pub struct ItemsStore {
    inner: Arc<RwLock<Vec<String>>>,
}

impl Default for ItemsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemsStore {
    /// Store holding [`SEED_ITEMS`].
    pub fn new() -> Self {
        Self::with_items(SEED_ITEMS)
    }

    pub fn with_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        Self { inner: Arc::new(RwLock::new(items)) }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Copy of the list in stored order.
    pub async fn snapshot(&self) -> Vec<String> {
        self.inner.read().await.clone()
    }

    /// Item at `index`.
    pub async fn get(&self, index: i64) -> Result<String, ServiceError> {
        let items = self.inner.read().await;
        let pos = position(index, items.len())?;
        Ok(items[pos].clone())
    }

    /// Number of items equal to `name`, ignoring case.
    pub async fn count_by_name(&self, name: &str) -> Result<usize, ServiceError> {
        require_text(name, "name")?;
        let items = self.inner.read().await;
        Ok(items.iter().filter(|item| eq_ignore_case(item, name)).count())
    }

    /// Copy of the list ordered by `strategy` using ordinal string comparison.
    pub async fn list(&self, strategy: SortStrategy) -> Vec<String> {
        let mut items = self.snapshot().await;
        match strategy {
            SortStrategy::Unsorted => {}
            SortStrategy::Ascending => items.sort(),
            SortStrategy::Descending => items.sort_by(|a, b| b.cmp(a)),
        }
        items
    }

    /// Append `item`; returns the new length.
    pub async fn add(&self, item: String) -> Result<usize, ServiceError> {
        require_text(&item, "item")?;
        let mut items = self.inner.write().await;
        items.push(item);
        let len = items.len();
        debug!(index = len - 1, len, "item added");
        Ok(len)
    }

    /// Replace the item at `index`; returns the (unchanged) length.
    pub async fn update(&self, index: i64, new_item: String) -> Result<usize, ServiceError> {
        let mut items = self.inner.write().await;
        let pos = position(index, items.len())?;
        require_text(&new_item, "item")?;
        items[pos] = new_item;
        debug!(index = pos, len = items.len(), "item updated");
        Ok(items.len())
    }

    /// Remove the item at `index`; returns the new length.
    pub async fn delete(&self, index: i64) -> Result<usize, ServiceError> {
        let mut items = self.inner.write().await;
        let pos = position(index, items.len())?;
        let removed = items.remove(pos);
        debug!(index = pos, len = items.len(), removed = %removed, "item deleted");
        Ok(items.len())
    }
}

/// Validate a caller index against the current length.
fn position(index: i64, len: usize) -> Result<usize, ServiceError> {
    if index < 0 {
        return Err(ServiceError::invalid("index must not be negative"));
    }
    match usize::try_from(index) {
        Ok(pos) if pos < len => Ok(pos),
        _ => Err(ServiceError::no_item_at(index)),
    }
}

fn require_text(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Culture-independent, per-character case-insensitive equality.
/// Characters whose upper case spans several chars (`ß`, `ﬀ`) compare as-is.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| x == y || fold(x) == fold(y))
}

fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
