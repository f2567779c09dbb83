use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::{Filter, Paginated, Patch, RecordId, Result};
use crate::store::Store;

use super::entity::{BaseRecord, Entity, Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Maintenance,
    Retired,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
        }
    }
}

impl From<VehicleStatus> for JsonValue {
    fn from(status: VehicleStatus) -> Self {
        JsonValue::String(status.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub vendor_id: RecordId,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Daily rate in minor currency units.
    pub price_per_day: i64,
    pub status: VehicleStatus,
}

impl Entity for Vehicle {
    const COLLECTION: &'static str = "vehicles";

    fn base(&self) -> &BaseRecord {
        &self.base
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewVehicle {
    pub vendor_id: RecordId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price_per_day: i64,
    pub status: VehicleStatus,
}

/// Listing-search parameters. Text fields search by substring, the rest by
/// equality, the same split the generic filter applies.
#[derive(Debug, Clone, Default)]
pub struct VehicleSearch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub status: Option<VehicleStatus>,
    pub vendor_id: Option<RecordId>,
}

impl VehicleSearch {
    fn into_filter(self) -> Filter {
        let mut filter = Filter::new();
        if let Some(make) = self.make {
            filter = filter.contains("make", make);
        }
        if let Some(model) = self.model {
            filter = filter.contains("model", model);
        }
        if let Some(year) = self.year {
            filter = filter.equals("year", year);
        }
        if let Some(status) = self.status {
            filter = filter.equals("status", status);
        }
        if let Some(vendor_id) = self.vendor_id {
            filter = filter.equals("vendor_id", vendor_id);
        }
        filter
    }
}

/// Accessor for the "vehicles" collection.
#[derive(Clone)]
pub struct Vehicles {
    records: Repository<Vehicle>,
}

impl Vehicles {
    pub fn new(store: &Store) -> Self {
        Self {
            records: Repository::new(store),
        }
    }

    pub fn records(&self) -> &Repository<Vehicle> {
        &self.records
    }

    pub async fn create(&self, draft: &NewVehicle) -> Result<Vehicle> {
        self.records.create(draft).await
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<Vehicle>> {
        self.records.find(id).await
    }

    pub async fn update(&self, id: RecordId, patch: Patch) -> Result<Vehicle> {
        self.records.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<Vehicle> {
        self.records.delete(id).await
    }

    pub async fn find_by_vendor(&self, vendor_id: RecordId) -> Result<Vec<Vehicle>> {
        self.records
            .find_where(&Filter::new().equals("vendor_id", vendor_id))
            .await
    }

    pub async fn search(
        &self,
        page: usize,
        per_page: usize,
        search: VehicleSearch,
    ) -> Result<Paginated<Vehicle>> {
        self.records
            .paginate(page, per_page, &search.into_filter())
            .await
    }
}
