pub mod error;
pub mod filter;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use filter::PropertyFilter;
pub use structs::{
    NewProperty, NewReservation, NewUser, Property, PropertyListing, Reservation,
    ReservationListing, User,
};
