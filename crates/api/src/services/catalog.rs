//! Paged product listing.

use std::future::Future;

use crate::db::{Page, ProductRepository, RepositoryError};
use crate::models::product::{Product, ProductPage};

/// Page used when the query omits or garbles `page`.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the query omits or garbles `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Read access to the catalog needed by the listing.
pub trait ProductSource {
    fn count(
        &self,
        search: Option<&str>,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    fn list(
        &self,
        search: Option<&str>,
        page: Option<Page>,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;
}

impl ProductSource for ProductRepository<'_> {
    async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError> {
        ProductRepository::count(self, search).await
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: Option<Page>,
    ) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::list(self, search, page).await
    }
}

/// Parse a positive integer query value, falling back to `default`.
///
/// Missing, unparsable, zero and negative values all fall back.
#[must_use]
pub fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// Treat an empty search string as no search.
#[must_use]
pub fn normalize_search(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

/// Number of pages needed for `total` rows, rounding up.
const fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    if limit <= 0 {
        return 1;
    }
    (total - 1) / limit + 1
}

/// List one page of products.
///
/// When nothing matches, the rows are not queried at all.
///
/// # Errors
///
/// Returns `RepositoryError` if counting or listing fails.
pub async fn list_page<S: ProductSource + Sync>(
    source: &S,
    search: Option<&str>,
    page: Page,
) -> Result<ProductPage, RepositoryError> {
    let total = source.count(search).await?;
    if total == 0 {
        tracing::info!(?search, "No products found");
        return Ok(ProductPage::empty(page.page, page.limit));
    }

    let data = source.list(search, Some(page)).await?;

    Ok(ProductPage {
        page: page.page,
        total_pages: total_pages(total, page.limit),
        limit: page.limit,
        total,
        data,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use netvalue_shop_core::{Price, ProductId};

    use super::*;

    struct FixedSource {
        products: Vec<Product>,
        list_calls: AtomicUsize,
    }

    impl FixedSource {
        fn with(count: i32) -> Self {
            let products = (1..=count)
                .map(|n| Product {
                    id: ProductId::new(n),
                    name: format!("Product {n}"),
                    sku: format!("SKU-{n}"),
                    price: Price::from_cents(i64::from(n) * 100),
                    description: String::new(),
                    image_url: String::new(),
                })
                .collect();
            Self {
                products,
                list_calls: AtomicUsize::new(0),
            }
        }
    }

    impl ProductSource for FixedSource {
        async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError> {
            let n = self
                .products
                .iter()
                .filter(|p| search.is_none_or(|s| p.name.contains(s)))
                .count();
            Ok(i64::try_from(n).unwrap())
        }

        async fn list(
            &self,
            _search: Option<&str>,
            page: Option<Page>,
        ) -> Result<Vec<Product>, RepositoryError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let page = page.unwrap();
            Ok(self
                .products
                .iter()
                .skip(usize::try_from(page.offset()).unwrap())
                .take(usize::try_from(page.limit).unwrap())
                .cloned()
                .collect())
        }
    }

    #[test]
    fn test_positive_or_fallbacks() {
        assert_eq!(positive_or(None, DEFAULT_LIMIT), 10);
        assert_eq!(positive_or(Some("abc"), DEFAULT_LIMIT), 10);
        assert_eq!(positive_or(Some("0"), DEFAULT_PAGE), 1);
        assert_eq!(positive_or(Some("-4"), DEFAULT_PAGE), 1);
        assert_eq!(positive_or(Some("25"), DEFAULT_LIMIT), 25);
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(None), None);
        assert_eq!(normalize_search(Some("mug")), Some("mug"));
    }

    #[tokio::test]
    async fn test_zero_count_short_circuits() {
        let source = FixedSource::with(0);

        let page = list_page(&source, Some("nothing"), Page { page: 2, limit: 5 })
            .await
            .unwrap();

        assert_eq!(page, ProductPage::empty(2, 5));
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_total_pages_rounds_up() {
        let source = FixedSource::with(21);

        let page = list_page(&source, None, Page { page: 3, limit: 10 })
            .await
            .unwrap();

        assert_eq!(page.total, 21);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data.first().map(|p| p.id), Some(ProductId::new(21)));
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exact_multiple_of_limit() {
        let source = FixedSource::with(20);

        let page = list_page(&source, None, Page { page: 1, limit: 10 })
            .await
            .unwrap();

        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 10);
    }

    #[tokio::test]
    async fn test_huge_limit_is_one_page() {
        let source = FixedSource::with(2);
        let limit = positive_or(Some("9223372036854775807"), DEFAULT_LIMIT);

        let page = list_page(&source, None, Page { page: 1, limit })
            .await
            .unwrap();

        assert_eq!(page.total_pages, 1);
        assert_eq!(page.data.len(), 2);
    }

    #[tokio::test]
    async fn test_huge_page_is_empty() {
        let source = FixedSource::with(3);
        let page = positive_or(Some("9223372036854775807"), DEFAULT_PAGE);

        let result = list_page(&source, None, Page { page, limit: 10 })
            .await
            .unwrap();

        assert_eq!(result.total_pages, 1);
        assert!(result.data.is_empty());
    }

    #[test]
    fn test_total_pages_bounds() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);
    }
}
