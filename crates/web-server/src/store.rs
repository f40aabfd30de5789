use async_trait::async_trait;
use core_types::{
    NewProperty, NewUser, Property, PropertyFilter, PropertyListing, ReservationListing, User,
};
use database::{DbError, DbRepository};

/// The user lookups and inserts the auth routes rely on.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DbError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbError>;
    async fn insert(&self, user: &NewUser) -> Result<User, DbError>;
}

/// Property search, listing creation and reservation history.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn search(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, DbError>;
    async fn insert_property(&self, property: &NewProperty) -> Result<Property, DbError>;
    async fn past_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationListing>, DbError>;
}

#[async_trait]
impl UserStore for DbRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.find_user_by_email(email).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DbError> {
        self.find_user_by_name(name).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbError> {
        self.find_user_by_id(id).await
    }

    async fn insert(&self, user: &NewUser) -> Result<User, DbError> {
        self.insert_user(user).await
    }
}

#[async_trait]
impl ListingStore for DbRepository {
    async fn search(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, DbError> {
        self.search_properties(filter, limit).await
    }

    async fn insert_property(&self, property: &NewProperty) -> Result<Property, DbError> {
        DbRepository::insert_property(self, property).await
    }

    async fn past_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationListing>, DbError> {
        self.list_reservations_for_guest(guest_id, limit).await
    }
}
