// ============================================================================
// RentalDB Library
// ============================================================================
//
// File-backed JSON collection store for a vehicle-rental marketplace:
// one pretty-printed JSON file per collection, integer ids, stamped
// timestamps, filtered and paginated scans, and a booking availability
// engine that keeps confirmed rentals from ever overlapping.

//! # Examples
//!
//! ```no_run
//! use rentaldb::{BookingStatus, Entity, NewBooking, NewVehicle, RentalDb, VehicleStatus};
//!
//! # #[tokio::main]
//! # async fn main() -> rentaldb::Result<()> {
//! let db = RentalDb::open("./data")?;
//!
//! let vehicle = db
//!     .vehicles()
//!     .create(&NewVehicle {
//!         vendor_id: 1,
//!         make: "Toyota".to_string(),
//!         model: "Camry".to_string(),
//!         year: 2022,
//!         price_per_day: 45_000,
//!         status: VehicleStatus::Available,
//!     })
//!     .await?;
//!
//! // Check-then-create runs as one critical section: a second caller
//! // racing for the same dates gets `StoreError::Conflict`.
//! let booking = db
//!     .bookings()
//!     .reserve(&NewBooking {
//!         vehicle_id: vehicle.id(),
//!         renter_id: 7,
//!         start_date: "2024-01-15".parse().unwrap(),
//!         end_date: "2024-01-17".parse().unwrap(),
//!         status: BookingStatus::Pending,
//!     })
//!     .await?;
//! let confirmed = db.bookings().confirm(booking.id()).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod facade;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use core::{
    Fields, Filter, FilterValue, PageInfo, Paginated, Patch, Record, RecordId, Result, StoreError,
};
pub use domain::{
    BaseRecord, Booking, BookingStatus, Bookings, Entity, NewBooking, NewReview, NewUser,
    NewVehicle, NewVendor, Repository, Review, Reviews, User, UserRole, Users, Vehicle,
    VehicleSearch, VehicleStatus, Vehicles, Vendor, Vendors, ranges_overlap,
};
pub use facade::RentalDb;
pub use storage::{DurabilityMode, FileBackend, MemoryBackend, StorageBackend};
pub use store::{Collection, Store, WriteGuard};
