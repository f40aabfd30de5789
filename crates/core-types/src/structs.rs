use crate::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// `password` holds the stored credential hash and is never serialized.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// The fields required to create a user. `password` must already be hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A row from the `properties` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in cents.
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

/// A property as returned by search: the full row plus its average review rating.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<Decimal>,
}

/// The fields required to list a new property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    /// Filled in from the session when a listing is submitted over HTTP.
    #[serde(default)]
    pub owner_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_photo_url: String,
    #[serde(default)]
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    #[serde(default)]
    pub parking_spaces: i32,
    #[serde(default)]
    pub number_of_bathrooms: i32,
    #[serde(default)]
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

impl NewProperty {
    /// Rejects values the `properties` table would store but nothing could sensibly search for.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::InvalidInput("title".into(), "must not be empty".into()));
        }
        if self.city.trim().is_empty() {
            return Err(CoreError::InvalidInput("city".into(), "must not be empty".into()));
        }
        if self.cost_per_night < 0 {
            return Err(CoreError::InvalidInput(
                "cost_per_night".into(),
                format!("must not be negative, got {}", self.cost_per_night),
            ));
        }
        let counts = [
            ("parking_spaces", self.parking_spaces),
            ("number_of_bathrooms", self.number_of_bathrooms),
            ("number_of_bedrooms", self.number_of_bedrooms),
        ];
        for (field, value) in counts {
            if value < 0 {
                return Err(CoreError::InvalidInput(
                    field.into(),
                    format!("must not be negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// A row from the `reservations` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub property_id: i32,
    pub guest_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReservation {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub property_id: i32,
    pub guest_id: i32,
}

impl NewReservation {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.end_date < self.start_date {
            return Err(CoreError::InvalidInput(
                "end_date".into(),
                format!("{} is before start_date {}", self.end_date, self.start_date),
            ));
        }
        Ok(())
    }
}

/// One line of a guest's reservation history, joined with the property it was for.
///
/// `id` is the property id, `rating` its average review rating.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ReservationListing {
    pub id: i32,
    pub reservation_id: i32,
    pub title: String,
    pub cost_per_night: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rating: Option<Decimal>,
    pub cover_photo_url: String,
    pub thumbnail_photo_url: String,
}
