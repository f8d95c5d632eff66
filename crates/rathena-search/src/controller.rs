//! The search pipeline: fetch, filter, sort, paginate.
//!
//! A [`SearchController`] binds an [`EntitySource`] to a matcher and answers
//! [`SearchQuery`]s. It holds no mutable state, so one controller can serve
//! any number of concurrent callers.
//!
//! ```text
//! entities() ─► filter(is_match) ─► stable sort(sort spec) ─► clamp(limit, offset) ─► slice
//!                      │
//!                      └─► total
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::accessor::Seekable;
use crate::compare::compare_by_sort;
use crate::config::{SearchConfig, DEFAULT_LIMIT_CAP};
use crate::query::{Page, SearchQuery, SearchResult};

/// Supplies the full collection of entities to search.
///
/// Sources decide their own freshness: a source may reload on every call or
/// hand out a memoized snapshot. The controller never mutates what it gets.
#[async_trait]
pub trait EntitySource<E>: Send + Sync {
    /// Error raised when the collection cannot be produced.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns every entity, in collection order.
    async fn entities(&self) -> Result<Arc<[E]>, Self::Error>;
}

#[async_trait]
impl<E> EntitySource<E> for Arc<[E]>
where
    E: Send + Sync + 'static,
{
    type Error = std::convert::Infallible;

    async fn entities(&self) -> Result<Arc<[E]>, Self::Error> {
        Ok(Arc::clone(self))
    }
}

#[async_trait]
impl<E> EntitySource<E> for Vec<E>
where
    E: Clone + Send + Sync + 'static,
{
    type Error = std::convert::Infallible;

    async fn entities(&self) -> Result<Arc<[E]>, Self::Error> {
        Ok(Arc::from(self.as_slice()))
    }
}

/// An [`EntitySource`] backed by an async closure. See [`source_fn`].
#[derive(Debug, Clone)]
pub struct FnSource<G> {
    get: G,
}

/// Wraps an async closure as an [`EntitySource`].
///
/// ```
/// use std::sync::Arc;
/// use rathena_search::{source_fn, EntitySource};
///
/// # tokio_test_block(async {
/// let source = source_fn(|| async {
///     let names: Arc<[&str]> = Arc::from(vec!["Poring", "Lunatic"]);
///     Ok::<_, std::io::Error>(names)
/// });
/// let entities: Arc<[&str]> = source.entities().await.unwrap();
/// assert_eq!(entities.len(), 2);
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub fn source_fn<G>(get: G) -> FnSource<G> {
    FnSource { get }
}

#[async_trait]
impl<E, G, Fut, Er> EntitySource<E> for FnSource<G>
where
    E: Send + Sync + 'static,
    G: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Arc<[E]>, Er>> + Send + 'static,
    Er: std::error::Error + Send + Sync + 'static,
{
    type Error = Er;

    async fn entities(&self) -> Result<Arc<[E]>, Self::Error> {
        (self.get)().await
    }
}

/// Answers [`SearchQuery`]s over the entities of one source.
///
/// - `E` is the entity type.
/// - `F` is the filter type carried by queries.
/// - `S` supplies the entities.
/// - `M` decides whether an entity matches a filter.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rathena_search::{Dir, SearchController, SearchQuery, Seekable, Value};
///
/// #[derive(Clone)]
/// struct Item {
///     name: String,
/// }
///
/// impl Seekable for Item {
///     fn seeker_field_value(&self, path: &str) -> Value<'_> {
///         match path {
///             "name" => Value::String(&self.name),
///             _ => Value::None,
///         }
///     }
///
///     fn field_paths() -> Vec<String> {
///         vec!["name".into()]
///     }
/// }
///
/// let items: Arc<[Item]> = ["Red Potion", "Sword", "Yellow Potion"]
///     .iter()
///     .map(|name| Item { name: name.to_string() })
///     .collect();
///
/// let controller = SearchController::new(items, |item: &Item, needle: &String| {
///     item.name.to_lowercase().contains(&needle.to_lowercase())
/// });
///
/// let query = SearchQuery::new()
///     .with_filter("potion".to_string())
///     .sort_by("name", Dir::Desc);
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let result = controller.search(&query).await.unwrap();
/// assert_eq!(result.total, 2);
/// assert_eq!(result.entities[0].name, "Yellow Potion");
/// # });
/// ```
pub struct SearchController<E, F, S, M> {
    source: S,
    is_match: M,
    limit_cap: usize,
    _marker: PhantomData<fn(&E, &F)>,
}

impl<E, F, S, M> SearchController<E, F, S, M>
where
    E: Seekable + Clone + Send + Sync + 'static,
    S: EntitySource<E>,
    M: Fn(&E, &F) -> bool + Send + Sync,
{
    /// Creates a controller with the default limit cap.
    pub fn new(source: S, is_match: M) -> Self {
        SearchController {
            source,
            is_match,
            limit_cap: DEFAULT_LIMIT_CAP,
            _marker: PhantomData,
        }
    }

    /// Creates a controller configured from `config`.
    pub fn with_config(source: S, is_match: M, config: &SearchConfig) -> Self {
        SearchController::new(source, is_match).limit_cap(config.limit_cap)
    }

    /// Sets the largest page this controller returns.
    pub fn limit_cap(mut self, limit_cap: usize) -> Self {
        self.limit_cap = limit_cap;
        self
    }

    /// Returns the configured limit cap.
    pub fn get_limit_cap(&self) -> usize {
        self.limit_cap
    }

    /// Returns the entity source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs `query` against a fresh fetch of the source.
    ///
    /// Source errors are returned unchanged. A panicking matcher unwinds
    /// through this call.
    pub async fn search(&self, query: &SearchQuery<F>) -> Result<SearchResult<E>, S::Error> {
        let entities = self.source.entities().await?;
        Ok(execute(&entities, query, &self.is_match, self.limit_cap))
    }
}

/// Runs `query` over an in-memory collection.
///
/// This is the synchronous core of [`SearchController::search`]:
///
/// 1. Keep the entities `is_match` accepts (all of them without a filter).
/// 2. Stable-sort the matches by the composite sort comparator.
/// 3. Clamp limit to `[0, limit_cap]` and offset to `[0, matches]`.
/// 4. Clone `matches[offset..offset + limit]`.
///
/// `total` is the number of matches before pagination. `entities` is never
/// reordered.
pub fn execute<E, F, M>(
    entities: &[E],
    query: &SearchQuery<F>,
    is_match: M,
    limit_cap: usize,
) -> SearchResult<E>
where
    E: Seekable + Clone,
    M: Fn(&E, &F) -> bool,
{
    let mut matches: Vec<&E> = match &query.filter {
        Some(filter) => entities.iter().filter(|e| is_match(*e, filter)).collect(),
        None => entities.iter().collect(),
    };

    let sort = query.sort_entries();
    if !sort.is_empty() {
        matches.sort_by(|a, b| compare_by_sort(*a, *b, sort, &E::accessor));
    }

    let total = matches.len();
    let page = Page::clamp(query.offset, query.limit, total, limit_cap);
    let slice = &matches[page.range(total)];

    debug!(
        entity = std::any::type_name::<E>(),
        total,
        offset = page.offset,
        limit = page.limit,
        returned = slice.len(),
        "search executed"
    );

    SearchResult::new(total, slice.iter().map(|e| (*e).clone()).collect())
}
