use serde::{Deserialize, Serialize};

use crate::core::{Filter, Patch, RecordId, Result, StoreError};
use crate::store::Store;

use super::entity::{BaseRecord, Entity, Repository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub vehicle_id: RecordId,
    pub renter_id: RecordId,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
}

impl Entity for Review {
    const COLLECTION: &'static str = "reviews";

    fn base(&self) -> &BaseRecord {
        &self.base
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub vehicle_id: RecordId,
    pub renter_id: RecordId,
    pub rating: u8,
    pub comment: String,
}

/// Accessor for the "reviews" collection.
#[derive(Clone)]
pub struct Reviews {
    records: Repository<Review>,
}

impl Reviews {
    pub fn new(store: &Store) -> Self {
        Self {
            records: Repository::new(store),
        }
    }

    pub fn records(&self) -> &Repository<Review> {
        &self.records
    }

    pub async fn create(&self, draft: &NewReview) -> Result<Review> {
        if !(1..=5).contains(&draft.rating) {
            return Err(StoreError::Invalid(format!(
                "rating must be between 1 and 5, got {}",
                draft.rating
            )));
        }
        self.records.create(draft).await
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<Review>> {
        self.records.find(id).await
    }

    pub async fn update(&self, id: RecordId, patch: Patch) -> Result<Review> {
        self.records.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<Review> {
        self.records.delete(id).await
    }

    pub async fn find_by_vehicle(&self, vehicle_id: RecordId) -> Result<Vec<Review>> {
        self.records
            .find_where(&Filter::new().equals("vehicle_id", vehicle_id))
            .await
    }

    /// Mean rating for a vehicle, or `None` when it has no reviews.
    pub async fn average_rating(&self, vehicle_id: RecordId) -> Result<Option<f64>> {
        let reviews = self.find_by_vehicle(vehicle_id).await?;
        if reviews.is_empty() {
            return Ok(None);
        }
        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        Ok(Some(f64::from(sum) / reviews.len() as f64))
    }
}
