//! In-memory directory store.
//!
//! Groups and important links live behind one `RwLock` with monotonically
//! assigned ids. Nothing is persisted; the directory is reseeded by admins
//! after a restart. Listing puts pinned groups first, then insertion order.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;

const MIN_NAME_CHARS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportantLink {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Catalog {
    groups: Vec<Group>,
    links: Vec<ImportantLink>,
    next_group_id: u64,
    next_link_id: u64,
}

#[derive(Default)]
pub struct Store {
    catalog: RwLock<Catalog>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pinned groups first, each section in insertion order.
    pub fn list_groups(&self) -> Vec<Group> {
        let catalog = self.read();
        let mut listing: Vec<Group> = catalog.groups.iter().filter(|g| g.pinned).cloned().collect();
        listing.extend(catalog.groups.iter().filter(|g| !g.pinned).cloned());
        listing
    }

    pub fn create_group(
        &self,
        name: &str,
        description: &str,
        url: &str,
    ) -> Result<Group, AppError> {
        let name = name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(AppError::Validation(format!(
                "group name must be at least {MIN_NAME_CHARS} characters"
            )));
        }

        let mut catalog = self.write();
        catalog.next_group_id += 1;
        let group = Group {
            id: catalog.next_group_id,
            name: name.to_string(),
            description: description.trim().to_string(),
            url: url.trim().to_string(),
            pinned: false,
            created_at: Utc::now(),
        };
        catalog.groups.push(group.clone());
        Ok(group)
    }

    pub fn update_group(
        &self,
        id: u64,
        name: &str,
        description: &str,
        url: &str,
    ) -> Result<Group, AppError> {
        let name = name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(AppError::Validation(format!(
                "group name must be at least {MIN_NAME_CHARS} characters"
            )));
        }

        let mut catalog = self.write();
        let group = catalog
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(AppError::NotFound)?;
        group.name = name.to_string();
        group.description = description.trim().to_string();
        group.url = url.trim().to_string();
        Ok(group.clone())
    }

    pub fn delete_group(&self, id: u64) -> Result<(), AppError> {
        let mut catalog = self.write();
        let before = catalog.groups.len();
        catalog.groups.retain(|g| g.id != id);
        if catalog.groups.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub fn set_pinned(&self, id: u64, pinned: bool) -> Result<Group, AppError> {
        let mut catalog = self.write();
        let group = catalog
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(AppError::NotFound)?;
        group.pinned = pinned;
        Ok(group.clone())
    }

    pub fn list_links(&self) -> Vec<ImportantLink> {
        self.read().links.clone()
    }

    pub fn create_link(
        &self,
        title: &str,
        description: &str,
        url: &str,
    ) -> Result<ImportantLink, AppError> {
        let title = title.trim();
        if title.chars().count() < MIN_NAME_CHARS {
            return Err(AppError::Validation(format!(
                "link title must be at least {MIN_NAME_CHARS} characters"
            )));
        }
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::Validation("link url is required".to_string()));
        }

        let mut catalog = self.write();
        catalog.next_link_id += 1;
        let link = ImportantLink {
            id: catalog.next_link_id,
            title: title.to_string(),
            description: description.trim().to_string(),
            url: url.to_string(),
            created_at: Utc::now(),
        };
        catalog.links.push(link.clone());
        Ok(link)
    }

    pub fn update_link(
        &self,
        id: u64,
        title: &str,
        description: &str,
        url: &str,
    ) -> Result<ImportantLink, AppError> {
        let mut catalog = self.write();
        let link = catalog
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(AppError::NotFound)?;
        link.title = title.trim().to_string();
        link.description = description.trim().to_string();
        link.url = url.trim().to_string();
        Ok(link.clone())
    }

    pub fn delete_link(&self, id: u64) -> Result<(), AppError> {
        let mut catalog = self.write();
        let before = catalog.links.len();
        catalog.links.retain(|l| l.id != id);
        if catalog.links.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Catalog> {
        self.catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Catalog> {
        self.catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
