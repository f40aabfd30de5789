//! Runs the data access functions against a real Postgres.
//!
//! Each test recreates the schema from `fixtures/schema.sql`, so point
//! `DATABASE_URL` at a throwaway database. Without it the tests return early.

use chrono::{Duration, Utc};
use core_types::{NewProperty, NewReservation, NewUser, PropertyFilter, User};
use database::{DbError, DbRepository, PriceConjunction};
use rust_decimal_macros::dec;
use serial_test::serial;
use sqlx::PgPool;

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };
    let pool = PgPool::connect(&url).await.expect("connect to DATABASE_URL");
    sqlx::raw_sql(include_str!("fixtures/schema.sql"))
        .execute(&pool)
        .await
        .expect("apply schema");
    Some(pool)
}

async fn create_user(repo: &DbRepository, name: &str) -> User {
    repo.insert_user(&NewUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        password: "$2b$04$notarealhashnotarealhashnotarealhashnotarealhas".to_string(),
    })
    .await
    .unwrap()
}

fn listing(owner_id: i32, city: &str, cost_per_night: i32) -> NewProperty {
    NewProperty {
        owner_id,
        title: format!("Loft in {city}"),
        description: "description".into(),
        thumbnail_photo_url: "https://example.com/thumb.jpg".into(),
        cover_photo_url: "https://example.com/cover.jpg".into(),
        cost_per_night,
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
        country: "Canada".into(),
        street: "1 Main St".into(),
        city: city.into(),
        province: "BC".into(),
        post_code: "V5K 0A1".into(),
    }
}

async fn review(pool: &PgPool, guest_id: i32, property_id: i32, reservation_id: i32, rating: i16) {
    sqlx::query(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating) VALUES ($1, $2, $3, $4)",
    )
    .bind(guest_id)
    .bind(property_id)
    .bind(reservation_id)
    .bind(rating)
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
#[serial]
async fn inserted_property_is_found_by_city_and_owner() {
    let Some(pool) = test_pool().await else { return };
    let repo = DbRepository::new(pool.clone());
    let owner = create_user(&repo, "Owner One").await;
    let guest = create_user(&repo, "Guest One").await;

    let property = repo.insert_property(&listing(owner.id, "Vancouver", 12_000)).await.unwrap();
    let today = Utc::now().date_naive();
    let stay = repo
        .insert_reservation(&NewReservation {
            start_date: today - Duration::days(10),
            end_date: today - Duration::days(5),
            property_id: property.id,
            guest_id: guest.id,
        })
        .await
        .unwrap();
    review(&pool, guest.id, property.id, stay.id, 4).await;

    let filter = PropertyFilter::default()
        .with_city(property.city.clone())
        .with_owner(property.owner_id);
    let results = repo.search_properties(&filter, 10).await.unwrap();

    assert!(results.iter().any(|row| row.property.id == property.id));
    let found = results.iter().find(|row| row.property.id == property.id).unwrap();
    assert_eq!(found.average_rating, Some(dec!(4)));
}

#[tokio::test]
#[serial]
async fn search_applies_partial_city_price_and_rating() {
    let Some(pool) = test_pool().await else { return };
    let repo = DbRepository::new(pool.clone());
    let owner = create_user(&repo, "Owner Two").await;
    let guest = create_user(&repo, "Guest Two").await;
    let today = Utc::now().date_naive();

    let mut ids = Vec::new();
    for (city, cost, rating) in [("Vancouver", 10_000, 5), ("North Vancouver", 30_000, 5), ("Toronto", 10_000, 2)] {
        let property = repo.insert_property(&listing(owner.id, city, cost)).await.unwrap();
        let stay = repo
            .insert_reservation(&NewReservation {
                start_date: today - Duration::days(3),
                end_date: today - Duration::days(1),
                property_id: property.id,
                guest_id: guest.id,
            })
            .await
            .unwrap();
        review(&pool, guest.id, property.id, stay.id, rating).await;
        ids.push(property.id);
    }

    let filter = PropertyFilter::default()
        .with_city("vancouver")
        .with_price_range(5_000, 20_000)
        .with_minimum_rating(dec!(4));
    let results = repo.search_properties(&filter, 10).await.unwrap();

    let found: Vec<i32> = results.iter().map(|row| row.property.id).collect();
    assert_eq!(found, vec![ids[0]]);
}

#[tokio::test]
#[serial]
async fn price_only_search_fails_in_legacy_mode_and_succeeds_composed() {
    let Some(pool) = test_pool().await else { return };
    let filter = PropertyFilter::default().with_price_range(100, 200);

    let legacy = DbRepository::new(pool.clone()).with_price_conjunction(PriceConjunction::Legacy);
    let err = legacy.search_properties(&filter, 10).await.unwrap_err();
    assert!(matches!(err, DbError::Query(_)));

    let composed = DbRepository::new(pool);
    assert!(composed.search_properties(&filter, 10).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn reservation_listing_excludes_current_and_future_stays() {
    let Some(pool) = test_pool().await else { return };
    let repo = DbRepository::new(pool.clone());
    let owner = create_user(&repo, "Owner Three").await;
    let guest = create_user(&repo, "Guest Three").await;
    let property = repo.insert_property(&listing(owner.id, "Banff", 20_000)).await.unwrap();
    let today = Utc::now().date_naive();

    let mut reservation_ids = Vec::new();
    for (start, end) in [(-20, -15), (-40, -30), (-2, 0), (5, 9)] {
        let stay = repo
            .insert_reservation(&NewReservation {
                start_date: today + Duration::days(start),
                end_date: today + Duration::days(end),
                property_id: property.id,
                guest_id: guest.id,
            })
            .await
            .unwrap();
        reservation_ids.push(stay.id);
    }
    review(&pool, guest.id, property.id, reservation_ids[0], 3).await;

    let listed = repo.list_reservations_for_guest(guest.id, 10).await.unwrap();

    assert!(listed.iter().all(|row| row.end_date < today));
    let listed_ids: Vec<i32> = listed.iter().map(|row| row.reservation_id).collect();
    // Oldest stay first.
    assert_eq!(listed_ids, vec![reservation_ids[1], reservation_ids[0]]);
}

#[tokio::test]
#[serial]
async fn user_lookups_distinguish_missing_from_found() {
    let Some(pool) = test_pool().await else { return };
    let repo = DbRepository::new(pool);
    let user = create_user(&repo, "Lookup User").await;

    assert_eq!(repo.find_user_by_id(user.id).await.unwrap(), Some(user.clone()));
    assert_eq!(repo.find_user_by_email(&user.email).await.unwrap(), Some(user.clone()));
    assert_eq!(repo.find_user_by_name("Lookup User").await.unwrap(), Some(user.clone()));
    assert_eq!(repo.find_user_by_id(user.id + 1000).await.unwrap(), None);
    // The name is not an id.
    assert_eq!(repo.find_user_by_email("Lookup User").await.unwrap(), None);
}
