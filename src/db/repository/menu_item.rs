//! Menu Item Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<MenuItem>> {
        let item: Option<MenuItem> = self.base.db().select(id.clone()).await?;
        Ok(item)
    }

    /// Create a new menu item
    pub async fn create(&self, item: MenuItem) -> RepoResult<MenuItem> {
        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item, partial semantics
    pub async fn update(&self, id: &RecordId, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        let name = data.name.unwrap_or(existing.name);
        let tagline = data.tagline.unwrap_or(existing.tagline);
        let image_url = data.image_url.unwrap_or(existing.image_url);
        let price = data.price.unwrap_or(existing.price);

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET name = $name, tagline = $tagline, image_url = $image_url, \
                 price = $price, updated_at = $now RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("name", name))
            .bind(("tagline", tagline))
            .bind(("image_url", image_url))
            .bind(("price", price))
            .bind(("now", now_millis()))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete; true when a record was removed
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<MenuItem> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
