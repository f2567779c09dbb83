use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::{Filter, Paginated, Patch, RecordId, Result};
use crate::store::Store;

use super::entity::{BaseRecord, Entity, Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Renter,
    Vendor,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Renter => "renter",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
        }
    }
}

impl From<UserRole> for JsonValue {
    fn from(role: UserRole) -> Self {
        JsonValue::String(role.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";

    fn base(&self) -> &BaseRecord {
        &self.base
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Accessor for the "users" collection.
#[derive(Clone)]
pub struct Users {
    records: Repository<User>,
}

impl Users {
    pub fn new(store: &Store) -> Self {
        Self {
            records: Repository::new(store),
        }
    }

    pub fn records(&self) -> &Repository<User> {
        &self.records
    }

    pub async fn create(&self, draft: &NewUser) -> Result<User> {
        self.records.create(draft).await
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<User>> {
        self.records.find(id).await
    }

    pub async fn update(&self, id: RecordId, patch: Patch) -> Result<User> {
        self.records.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<User> {
        self.records.delete(id).await
    }

    /// Exact email lookup, case-insensitive. Unlike the substring filters,
    /// an email must match whole or not at all.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.records.all().await?;
        Ok(users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    pub async fn paginate(
        &self,
        page: usize,
        per_page: usize,
        filter: &Filter,
    ) -> Result<Paginated<User>> {
        self.records.paginate(page, per_page, filter).await
    }
}
