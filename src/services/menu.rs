//! Menu catalog
//!
//! Plain CRUD over menu items. Orders snapshot name and price at creation,
//! so edits here never reach back into existing orders.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use validator::Validate;

use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuItemRepository;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct MenuService {
    repo: MenuItemRepository,
}

impl MenuService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: MenuItemRepository::new(db),
        }
    }

    pub async fn create(&self, data: MenuItemCreate) -> AppResult<MenuItem> {
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let now = now_millis();
        let item = MenuItem {
            id: None,
            name: data.name,
            tagline: data.tagline,
            image_url: data.image_url,
            price: data.price,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repo.create(item).await?)
    }

    pub async fn find_all(&self) -> AppResult<Vec<MenuItem>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> AppResult<MenuItem> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("menu item not found"))
    }

    pub async fn update(&self, id: &RecordId, data: MenuItemUpdate) -> AppResult<MenuItem> {
        Ok(self.repo.update(id, data).await?)
    }

    pub async fn delete(&self, id: &RecordId) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("menu item not found"));
        }
        Ok(())
    }
}
