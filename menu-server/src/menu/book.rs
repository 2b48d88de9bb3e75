//! Menu book: dishes and categories persisted as JSON files

use super::defaults::{default_categories, default_dishes};
use crate::orders::money::MAX_PRICE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use shared::models::{CategoryConfig, Dish, MAX_SPICY_LEVEL};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const DISHES_FILE: &str = "dishes.json";
pub const CATEGORIES_FILE: &str = "categories.json";

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Dish not found: {0}")]
    DishNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category name already exists: {0}")]
    CategoryNameExists(String),

    #[error("Invalid dish price: {0}")]
    InvalidPrice(Decimal),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to save menu: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode menu: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        let code = match &err {
            MenuError::DishNotFound(_) => ErrorCode::DishNotFound,
            MenuError::CategoryNotFound(_) => ErrorCode::CategoryNotFound,
            MenuError::CategoryNameExists(_) => ErrorCode::CategoryNameExists,
            MenuError::InvalidPrice(_) => ErrorCode::DishInvalidPrice,
            MenuError::Validation(_) => ErrorCode::ValidationFailed,
            MenuError::Io(_) | MenuError::Encode(_) => ErrorCode::MenuPersistFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Dishes and categories in display order
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct MenuData {
    pub dishes: Vec<Dish>,
    pub categories: Vec<CategoryConfig>,
}

impl Default for MenuData {
    fn default() -> Self {
        Self {
            dishes: default_dishes(),
            categories: default_categories(),
        }
    }
}

/// Menu store shared across handlers
///
/// Mutations build the next menu, write the affected files and only then
/// swap it in, so a failed write leaves memory as it was. An empty
/// collection is never written, so the next start falls back to defaults.
pub struct MenuBook {
    dir: PathBuf,
    data: RwLock<MenuData>,
}

impl MenuBook {
    /// Load from `dir`, falling back to built-in defaults per file
    ///
    /// Dishes that would be rejected by an edit are dropped on load.
    pub async fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut dishes = read_or_default(&dir.join(DISHES_FILE), default_dishes).await;
        dishes.retain(|dish| match validate_dish(dish) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(dish_id = %dish.id, error = %e, "Skipping invalid dish");
                false
            }
        });
        let categories = read_or_default(&dir.join(CATEGORIES_FILE), default_categories).await;
        tracing::info!(
            dir = %dir.display(),
            dishes = dishes.len(),
            categories = categories.len(),
            "Menu loaded"
        );
        Self {
            dir,
            data: RwLock::new(MenuData { dishes, categories }),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn snapshot(&self) -> MenuData {
        self.data.read().await.clone()
    }

    pub async fn dishes(&self) -> Vec<Dish> {
        self.data.read().await.dishes.clone()
    }

    pub async fn categories(&self) -> Vec<CategoryConfig> {
        self.data.read().await.categories.clone()
    }

    /// Insert or replace a dish by id; an empty id gets a fresh one
    pub async fn upsert_dish(&self, mut dish: Dish) -> Result<Dish, MenuError> {
        validate_dish(&dish)?;
        if dish.id.trim().is_empty() {
            dish.id = Uuid::new_v4().to_string();
        }

        let mut data = self.data.write().await;
        let mut next = data.clone();
        match next.dishes.iter().position(|d| d.id == dish.id) {
            Some(index) => next.dishes[index] = dish.clone(),
            None => next.dishes.push(dish.clone()),
        }
        self.commit(&mut data, next).await?;
        tracing::info!(dish_id = %dish.id, name = %dish.name, "Dish saved");
        Ok(dish)
    }

    pub async fn remove_dish(&self, id: &str) -> Result<Dish, MenuError> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let index = next
            .dishes
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| MenuError::DishNotFound(id.to_string()))?;
        let removed = next.dishes.remove(index);
        self.commit(&mut data, next).await?;
        tracing::info!(dish_id = %id, "Dish removed");
        Ok(removed)
    }

    /// Insert or replace a category by id
    ///
    /// Renaming a category moves its dishes along with it.
    pub async fn upsert_category(
        &self,
        mut category: CategoryConfig,
    ) -> Result<CategoryConfig, MenuError> {
        validate_category(&category)?;
        if category.id.trim().is_empty() {
            category.id = Uuid::new_v4().to_string();
        }

        let mut data = self.data.write().await;
        if data
            .categories
            .iter()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(MenuError::CategoryNameExists(category.name));
        }

        let mut next = data.clone();
        match next.categories.iter().position(|c| c.id == category.id) {
            Some(index) => {
                let old = std::mem::replace(&mut next.categories[index], category.clone());
                if old.name != category.name {
                    for dish in next.dishes.iter_mut().filter(|d| d.category == old.name) {
                        dish.category = category.name.clone();
                    }
                }
            }
            None => next.categories.push(category.clone()),
        }
        self.commit(&mut data, next).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category saved");
        Ok(category)
    }

    /// Remove a category; its dishes stay but are no longer laid out
    pub async fn remove_category(&self, id: &str) -> Result<CategoryConfig, MenuError> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let index = next
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| MenuError::CategoryNotFound(id.to_string()))?;
        let removed = next.categories.remove(index);
        self.commit(&mut data, next).await?;
        tracing::info!(category_id = %id, "Category removed");
        Ok(removed)
    }

    pub async fn replace_dishes(&self, dishes: Vec<Dish>) -> Result<Vec<Dish>, MenuError> {
        dishes.iter().try_for_each(validate_dish)?;
        let mut data = self.data.write().await;
        let next = MenuData {
            dishes,
            categories: data.categories.clone(),
        };
        self.commit(&mut data, next).await?;
        Ok(data.dishes.clone())
    }

    pub async fn replace_categories(
        &self,
        categories: Vec<CategoryConfig>,
    ) -> Result<Vec<CategoryConfig>, MenuError> {
        categories.iter().try_for_each(validate_category)?;
        if let Some(name) = duplicate_name(&categories) {
            return Err(MenuError::CategoryNameExists(name));
        }
        let mut data = self.data.write().await;
        let next = MenuData {
            dishes: data.dishes.clone(),
            categories,
        };
        self.commit(&mut data, next).await?;
        Ok(data.categories.clone())
    }

    pub async fn replace_all(&self, menu: MenuData) -> Result<MenuData, MenuError> {
        menu.dishes.iter().try_for_each(validate_dish)?;
        menu.categories.iter().try_for_each(validate_category)?;
        if let Some(name) = duplicate_name(&menu.categories) {
            return Err(MenuError::CategoryNameExists(name));
        }
        let mut data = self.data.write().await;
        self.commit(&mut data, menu).await?;
        Ok(data.clone())
    }

    /// Write the files that differ, then swap `next` in
    async fn commit(&self, data: &mut MenuData, next: MenuData) -> Result<(), MenuError> {
        if next.dishes != data.dishes {
            self.persist(DISHES_FILE, &next.dishes).await?;
        }
        if next.categories != data.categories {
            self.persist(CATEGORIES_FILE, &next.categories).await?;
        }
        *data = next;
        Ok(())
    }

    /// Write-to-temp then rename
    async fn persist<T: Serialize>(&self, file: &str, items: &[T]) -> Result<(), MenuError> {
        if items.is_empty() {
            tracing::debug!(file, "Skipping write of empty collection");
            return Ok(());
        }
        let target = self.dir.join(file);
        let write = async {
            let json = serde_json::to_vec_pretty(items)?;
            tokio::fs::create_dir_all(&self.dir).await?;
            let tmp = self.dir.join(format!("{file}.tmp"));
            tokio::fs::write(&tmp, json).await?;
            tokio::fs::rename(&tmp, &target).await?;
            Ok::<(), MenuError>(())
        };
        write.await.inspect_err(|e| {
            tracing::error!(file = %target.display(), error = %e, "Failed to save menu file");
        })
    }
}

async fn read_or_default<T, F>(path: &Path, fallback: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return fallback(),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Cannot read menu file, using defaults");
            return fallback();
        }
    };
    match serde_json::from_str::<Vec<T>>(&text) {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => fallback(),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Corrupt menu file, using defaults");
            fallback()
        }
    }
}

fn validate_dish(dish: &Dish) -> Result<(), MenuError> {
    if dish.name.trim().is_empty() {
        return Err(MenuError::Validation("dish name is required".into()));
    }
    if dish.category.trim().is_empty() {
        return Err(MenuError::Validation(format!(
            "dish {} has no category",
            dish.name
        )));
    }
    if dish.price < Decimal::ZERO || dish.price > MAX_PRICE {
        return Err(MenuError::InvalidPrice(dish.price));
    }
    if dish.spicy_level.is_some_and(|l| l > MAX_SPICY_LEVEL) {
        return Err(MenuError::Validation(format!(
            "spicy level must be 0..={MAX_SPICY_LEVEL}"
        )));
    }
    Ok(())
}

fn validate_category(category: &CategoryConfig) -> Result<(), MenuError> {
    if category.name.trim().is_empty() {
        return Err(MenuError::Validation("category name is required".into()));
    }
    Ok(())
}

fn duplicate_name(categories: &[CategoryConfig]) -> Option<String> {
    categories.iter().enumerate().find_map(|(i, c)| {
        categories[..i]
            .iter()
            .any(|prev| prev.name == c.name)
            .then(|| c.name.clone())
    })
}
