use serde::{Deserialize, Serialize};

use crate::core::{Filter, Patch, RecordId, Result};
use crate::store::Store;

use super::entity::{BaseRecord, Entity, Repository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub user_id: RecordId,
    pub business_name: String,
    pub approved: bool,
}

impl Entity for Vendor {
    const COLLECTION: &'static str = "vendors";

    fn base(&self) -> &BaseRecord {
        &self.base
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewVendor {
    pub user_id: RecordId,
    pub business_name: String,
    pub approved: bool,
}

/// Accessor for the "vendors" collection.
#[derive(Clone)]
pub struct Vendors {
    records: Repository<Vendor>,
}

impl Vendors {
    pub fn new(store: &Store) -> Self {
        Self {
            records: Repository::new(store),
        }
    }

    pub fn records(&self) -> &Repository<Vendor> {
        &self.records
    }

    pub async fn create(&self, draft: &NewVendor) -> Result<Vendor> {
        self.records.create(draft).await
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<Vendor>> {
        self.records.find(id).await
    }

    pub async fn update(&self, id: RecordId, patch: Patch) -> Result<Vendor> {
        self.records.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<Vendor> {
        self.records.delete(id).await
    }

    /// The vendor profile belonging to a user account, if any.
    pub async fn find_by_user(&self, user_id: RecordId) -> Result<Option<Vendor>> {
        self.records
            .first_where(&Filter::new().equals("user_id", user_id))
            .await
    }

    pub async fn approved(&self) -> Result<Vec<Vendor>> {
        self.records
            .find_where(&Filter::new().equals("approved", true))
            .await
    }
}
