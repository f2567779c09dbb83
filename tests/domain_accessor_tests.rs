//! Typed domain accessor tests over the in-memory backend: entity
//! round-trips through the generic store, entity-specific lookups, and
//! the typed search path.

use rentaldb::{
    Entity, NewReview, NewUser, NewVehicle, NewVendor, Patch, RentalDb, StoreError, UserRole,
    VehicleSearch, VehicleStatus,
};

fn vehicle_draft(vendor_id: u64, make: &str, model: &str, year: i32) -> NewVehicle {
    NewVehicle {
        vendor_id,
        make: make.to_string(),
        model: model.to_string(),
        year,
        price_per_day: 45_000,
        status: VehicleStatus::Available,
    }
}

#[tokio::test]
async fn test_user_round_trip_and_email_lookup() {
    let db = RentalDb::in_memory();

    let user = db
        .users()
        .create(&NewUser {
            name: "Alice".to_string(),
            email: "Alice@Example.com".to_string(),
            role: UserRole::Renter,
        })
        .await
        .unwrap();
    assert_eq!(user.id(), 1);

    let found = db
        .users()
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .expect("email lookup failed");
    assert_eq!(found, user);

    // Exact match only: a fragment is not an address.
    assert!(db.users().find_by_email("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_typed_update_applies_patch_and_keeps_rest() {
    let db = RentalDb::in_memory();
    let vehicle = db
        .vehicles()
        .create(&vehicle_draft(1, "Toyota", "Camry", 2022))
        .await
        .unwrap();

    let updated = db
        .vehicles()
        .update(vehicle.id(), Patch::new().set("price_per_day", 50_000))
        .await
        .unwrap();

    assert_eq!(updated.price_per_day, 50_000);
    assert_eq!(updated.make, "Toyota");
    assert_eq!(updated.model, "Camry");
    assert_eq!(updated.base.created_at, vehicle.base.created_at);
}

#[tokio::test]
async fn test_vendor_lookup_by_user_and_approved_listing() {
    let db = RentalDb::in_memory();

    let approved = db
        .vendors()
        .create(&NewVendor {
            user_id: 10,
            business_name: "Prime Rentals".to_string(),
            approved: true,
        })
        .await
        .unwrap();
    db.vendors()
        .create(&NewVendor {
            user_id: 11,
            business_name: "Budget Wheels".to_string(),
            approved: false,
        })
        .await
        .unwrap();

    let by_user = db.vendors().find_by_user(10).await.unwrap().unwrap();
    assert_eq!(by_user, approved);
    assert!(db.vendors().find_by_user(99).await.unwrap().is_none());

    let listed = db.vendors().approved().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].business_name, "Prime Rentals");
}

#[tokio::test]
async fn test_vehicle_search_combines_substring_and_equality() {
    let db = RentalDb::in_memory();
    let vehicles = db.vehicles();

    vehicles
        .create(&vehicle_draft(1, "Toyota", "Camry", 2022))
        .await
        .unwrap();
    vehicles
        .create(&vehicle_draft(1, "Toyota", "Corolla", 2020))
        .await
        .unwrap();
    vehicles
        .create(&vehicle_draft(2, "Honda", "Civic", 2022))
        .await
        .unwrap();

    let page = vehicles
        .search(
            1,
            10,
            VehicleSearch {
                make: Some("toy".to_string()),
                year: Some(2022),
                ..VehicleSearch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].model, "Camry");

    let by_vendor = vehicles.find_by_vendor(1).await.unwrap();
    assert_eq!(by_vendor.len(), 2);
}

#[tokio::test]
async fn test_vehicle_status_filter_is_exact() {
    let db = RentalDb::in_memory();
    let vehicles = db.vehicles();

    vehicles
        .create(&vehicle_draft(1, "Toyota", "Camry", 2022))
        .await
        .unwrap();
    let parked = vehicles
        .create(&NewVehicle {
            status: VehicleStatus::Maintenance,
            ..vehicle_draft(1, "Toyota", "Hilux", 2021)
        })
        .await
        .unwrap();

    let page = vehicles
        .search(
            1,
            10,
            VehicleSearch {
                status: Some(VehicleStatus::Maintenance),
                ..VehicleSearch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].id(), parked.id());
}

#[tokio::test]
async fn test_reviews_average_and_rating_bounds() {
    let db = RentalDb::in_memory();
    let reviews = db.reviews();

    for (rating, comment) in [(5, "great"), (4, "fine"), (3, "ok")] {
        reviews
            .create(&NewReview {
                vehicle_id: 1,
                renter_id: 7,
                rating,
                comment: comment.to_string(),
            })
            .await
            .unwrap();
    }

    assert_eq!(reviews.average_rating(1).await.unwrap(), Some(4.0));
    assert_eq!(reviews.average_rating(2).await.unwrap(), None);

    let err = reviews
        .create(&NewReview {
            vehicle_id: 1,
            renter_id: 7,
            rating: 6,
            comment: "too good".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
}

#[tokio::test]
async fn test_typed_delete_is_final() {
    let db = RentalDb::in_memory();
    let vehicle = db
        .vehicles()
        .create(&vehicle_draft(1, "Toyota", "Camry", 2022))
        .await
        .unwrap();

    db.vehicles().delete(vehicle.id()).await.unwrap();
    assert!(db.vehicles().find(vehicle.id()).await.unwrap().is_none());
    let err = db.vehicles().delete(vehicle.id()).await.unwrap_err();
    assert!(err.is_not_found());
}
