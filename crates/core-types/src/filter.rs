use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The optional filters a property search can be narrowed by.
///
/// A field takes part in the search when it is `Some`, regardless of its value:
/// `city: Some("")` still produces a (match-everything) city filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub owner_id: Option<i32>,
    /// Lower price bound in cents. Only used together with `maximum_price_per_night`.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub minimum_price_per_night: Option<i64>,
    /// Upper price bound in cents. Only used together with `minimum_price_per_night`.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub maximum_price_per_night: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub minimum_rating: Option<Decimal>,
}

impl PropertyFilter {
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_price_range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum_price_per_night = Some(minimum);
        self.maximum_price_per_night = Some(maximum);
        self
    }

    pub fn with_minimum_rating(mut self, rating: Decimal) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// Both price bounds, if and only if both are present.
    pub fn price_range(&self) -> Option<(i64, i64)> {
        self.minimum_price_per_night
            .zip(self.maximum_price_per_night)
    }

    /// True when exactly one price bound was supplied. Such a bound is not applied.
    pub fn has_one_sided_price(&self) -> bool {
        self.minimum_price_per_night.is_some() != self.maximum_price_per_night.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrValue<T> {
    Text(String),
    Value(T),
}

/// Form and query-string values arrive as text; a blank field means "not set".
/// JSON bodies may carry the native value instead.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    match Option::<TextOrValue<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(TextOrValue::Value(value)) => Ok(Some(value)),
        Some(TextOrValue::Text(text)) => match text.trim() {
            "" => Ok(None),
            value => value.parse::<T>().map(Some).map_err(de::Error::custom),
        },
    }
}
