//! Catalog repository: read-only queries over the item set

use unicode_normalization::UnicodeNormalization;

use crate::{
    error::{AppError, AppResult},
    models::item::{Item, ItemQuery, ItemTypeFilter},
};

use super::store::MemoryStore;

/// NFKC-fold and lowercase for matching. Catalogs here mix full-width
/// and half-width input, so plain lowercasing is not enough.
fn normalize(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

#[derive(Clone)]
pub struct CatalogRepository {
    store: MemoryStore,
}

impl CatalogRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Get an item by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Item> {
        self.store
            .read(|s| s.items.get(id).cloned())
            .await
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Get an item by its barcode (the lending key)
    pub async fn get_by_barcode(&self, barcode: &str) -> AppResult<Item> {
        self.store
            .read(|s| s.items.values().find(|i| i.barcode == barcode).cloned())
            .await
            .ok_or_else(|| AppError::NotFound(format!("Item with barcode {} not found", barcode)))
    }

    /// Search the catalog. Title and author match case-insensitively by
    /// substring; ISBN and barcode match by raw substring. A single pass
    /// over the item set keeps the result deduplicated by id and in
    /// catalog order.
    pub async fn search(&self, query: &ItemQuery) -> AppResult<Vec<Item>> {
        // Title/author match against the normalized form; ISBN and
        // barcode match the query as typed.
        let needle = query
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| (q.to_string(), normalize(q)));

        let type_filter = query.item_type;

        let items = self
            .store
            .read(|s| {
                s.items
                    .values()
                    .filter(|item| type_filter.matches(item.item_type))
                    .filter(|item| match &needle {
                        None => true,
                        Some((raw, norm)) => {
                            normalize(&item.title).contains(norm)
                                || normalize(&item.author).contains(norm)
                                || item.isbn.as_deref().is_some_and(|isbn| isbn.contains(raw))
                                || item.barcode.contains(raw)
                        }
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;

        Ok(items)
    }

    /// List items of one type (or all), catalog order
    pub async fn list_by_type(&self, filter: ItemTypeFilter) -> AppResult<Vec<Item>> {
        self.search(&ItemQuery {
            item_type: filter,
            query: None,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::ItemType;

    fn item(id: &str, title: &str, author: &str, item_type: ItemType, barcode: &str) -> Item {
        Item {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            item_type,
            barcode: barcode.into(),
            isbn: barcode.starts_with('9').then(|| barcode.to_string()),
            location: None,
            copies: Some(1),
            available: true,
            borrowed_by: None,
            borrowed_at: None,
            due_date: None,
        }
    }

    async fn seeded() -> CatalogRepository {
        let store = MemoryStore::new();
        store
            .load(
                vec![
                    item("1", "The Pragmatic Shelf", "Dav Thomas", ItemType::Book, "9784000000011"),
                    item("2", "Readable Rust", "Ann Coder", ItemType::Book, "9784000000028"),
                    item("3", "A Study of Shelf Routing", "Taro Kenkyu", ItemType::Thesis, "T2024001"),
                ],
                vec![],
            )
            .await;
        CatalogRepository::new(store)
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_title_and_author() {
        let repo = seeded().await;
        let q = |s: &str| ItemQuery {
            item_type: ItemTypeFilter::All,
            query: Some(s.into()),
        };

        let hits = repo.search(&q("readable")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");

        let hits = repo.search(&q("ANN")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[tokio::test]
    async fn search_matches_isbn_and_barcode_and_dedups() {
        let repo = seeded().await;
        // "9784000000011" matches both the isbn and the barcode of item 1;
        // the item must appear once.
        let hits = repo
            .search(&ItemQuery {
                item_type: ItemTypeFilter::All,
                query: Some("9784000000011".into()),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        let hits = repo
            .search(&ItemQuery {
                item_type: ItemTypeFilter::All,
                query: Some("T2024".into()),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");
    }

    #[tokio::test]
    async fn list_by_type_filters() {
        let repo = seeded().await;
        let books = repo.list_by_type(ItemTypeFilter::Book).await.unwrap();
        assert_eq!(books.len(), 2);
        let theses = repo.list_by_type(ItemTypeFilter::Thesis).await.unwrap();
        assert_eq!(theses.len(), 1);
        let all = repo.list_by_type(ItemTypeFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn lookup_by_barcode_and_id() {
        let repo = seeded().await;
        assert_eq!(repo.get_by_barcode("T2024001").await.unwrap().id, "3");
        assert_eq!(repo.get_by_id("2").await.unwrap().barcode, "9784000000028");
        assert!(matches!(
            repo.get_by_barcode("missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.get_by_id("99").await,
            Err(AppError::NotFound(_))
        ));
    }
}
