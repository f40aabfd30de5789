use crate::gateway::ExecutionGateway;
use crate::query::{BuiltQuery, PriceConjunction, PropertySearch, SqlParam};
use crate::DbError;
use core_types::{
    NewProperty, NewReservation, NewUser, Property, PropertyFilter, PropertyListing, Reservation,
    ReservationListing, User,
};
use sqlx::postgres::PgPool;

const USER_BY_EMAIL: &str = "SELECT * FROM users WHERE email = $1";

const USER_BY_ID: &str = "SELECT * FROM users WHERE id = $1";

const USER_BY_NAME: &str = "SELECT * FROM users WHERE name = $1";

const INSERT_USER: &str = "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING *";

const INSERT_PROPERTY: &str = r#"
INSERT INTO properties (owner_id, title, description, thumbnail_photo_url,
    cover_photo_url, cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
    country, street, city, province, post_code)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
RETURNING *
"#;

const INSERT_RESERVATION: &str = r#"
INSERT INTO reservations (start_date, end_date, property_id, guest_id)
VALUES ($1, $2, $3, $4)
RETURNING *
"#;

// Only stays that have already ended are listed.
const PAST_RESERVATIONS_FOR_GUEST: &str = r#"
SELECT
    properties.id AS id,
    reservations.id AS reservation_id,
    properties.title,
    properties.cost_per_night,
    reservations.start_date,
    reservations.end_date,
    avg(property_reviews.rating) AS rating,
    properties.cover_photo_url,
    properties.thumbnail_photo_url
FROM reservations
JOIN properties ON reservations.property_id = properties.id
JOIN property_reviews ON property_reviews.property_id = properties.id
WHERE reservations.end_date < now()::date
    AND reservations.guest_id = $1
GROUP BY properties.id, reservations.id
ORDER BY reservations.start_date
LIMIT $2
"#;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// Lookups return `Ok(None)` when nothing matched and `Err` when the query
/// itself failed, so callers can tell the two apart.
#[derive(Debug, Clone)]
pub struct DbRepository {
    gateway: ExecutionGateway,
    price_conjunction: PriceConjunction,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            gateway: ExecutionGateway::new(pool),
            price_conjunction: PriceConjunction::default(),
        }
    }

    /// Selects how property searches join their price-range conditions.
    pub fn with_price_conjunction(mut self, mode: PriceConjunction) -> Self {
        self.price_conjunction = mode;
        self
    }

    pub fn gateway(&self) -> &ExecutionGateway {
        &self.gateway
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let query = BuiltQuery::fixed(USER_BY_EMAIL, [SqlParam::from(email)]);
        self.gateway.fetch_optional(&query).await
    }

    pub async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, DbError> {
        let query = BuiltQuery::fixed(USER_BY_ID, [SqlParam::from(id)]);
        self.gateway.fetch_optional(&query).await
    }

    /// Looks a user up by display name. Names are not unique; the first match wins.
    pub async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, DbError> {
        let query = BuiltQuery::fixed(USER_BY_NAME, [SqlParam::from(name)]);
        self.gateway.fetch_optional(&query).await
    }

    /// Inserts a user. The password must already be hashed.
    pub async fn insert_user(&self, user: &NewUser) -> Result<User, DbError> {
        let query = BuiltQuery::fixed(
            INSERT_USER,
            [
                SqlParam::from(user.name.as_str()),
                SqlParam::from(user.email.as_str()),
                SqlParam::from(user.password.as_str()),
            ],
        );
        self.gateway.fetch_one(&query).await
    }

    pub async fn insert_property(&self, property: &NewProperty) -> Result<Property, DbError> {
        property.validate()?;
        let query = BuiltQuery::fixed(
            INSERT_PROPERTY,
            [
                SqlParam::from(property.owner_id),
                SqlParam::from(property.title.as_str()),
                SqlParam::from(property.description.as_str()),
                SqlParam::from(property.thumbnail_photo_url.as_str()),
                SqlParam::from(property.cover_photo_url.as_str()),
                SqlParam::from(property.cost_per_night),
                SqlParam::from(property.parking_spaces),
                SqlParam::from(property.number_of_bathrooms),
                SqlParam::from(property.number_of_bedrooms),
                SqlParam::from(property.country.as_str()),
                SqlParam::from(property.street.as_str()),
                SqlParam::from(property.city.as_str()),
                SqlParam::from(property.province.as_str()),
                SqlParam::from(property.post_code.as_str()),
            ],
        );
        self.gateway.fetch_one(&query).await
    }

    pub async fn insert_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, DbError> {
        reservation.validate()?;
        let query = BuiltQuery::fixed(
            INSERT_RESERVATION,
            [
                SqlParam::from(reservation.start_date),
                SqlParam::from(reservation.end_date),
                SqlParam::from(reservation.property_id),
                SqlParam::from(reservation.guest_id),
            ],
        );
        self.gateway.fetch_one(&query).await
    }

    /// Lists a guest's past reservations (`end_date` before today), oldest stay first.
    pub async fn list_reservations_for_guest(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationListing>, DbError> {
        let query = BuiltQuery::fixed(
            PAST_RESERVATIONS_FOR_GUEST,
            [SqlParam::from(guest_id), SqlParam::from(limit)],
        );
        self.gateway.fetch_all(&query).await
    }

    /// Runs a filtered property search, cheapest first.
    pub async fn search_properties(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, DbError> {
        let query = PropertySearch::new(filter)
            .limit(limit)
            .price_conjunction(self.price_conjunction)
            .build()?;
        self.gateway.fetch_all(&query).await
    }
}
