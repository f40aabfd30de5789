use super::composer::{FilterKind, PredicateComposer};
use super::params::{ParamList, SqlParam};
use crate::error::QueryBuildError;
use core_types::PropertyFilter;

/// Rows returned when the caller does not ask for a specific number.
pub const DEFAULT_LIMIT: i64 = 10;

const BASE_SELECT: &str = "SELECT properties.*, avg(property_reviews.rating) AS average_rating
FROM properties
JOIN property_reviews ON properties.id = property_reviews.property_id";

const GROUP_COLUMNS: &str = "properties.id";

/// How the two price-range conditions are joined to the statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceConjunction {
    /// Route both conditions through the composer like every other row filter,
    /// so a price-only search opens its own `WHERE`.
    #[default]
    Composed,
    /// Join both conditions with a bare `AND`, assuming an earlier filter opened
    /// `WHERE`. A price-only search then produces invalid SQL. This is the
    /// historical query shape, kept for compatibility.
    Legacy,
}

impl PriceConjunction {
    pub fn from_legacy_flag(legacy: bool) -> Self {
        if legacy { Self::Legacy } else { Self::Composed }
    }
}

/// A statement ready to run: SQL with `$1..$K` placeholders and exactly `K` values.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    /// A fixed-shape statement whose placeholders are already written out.
    pub fn fixed(sql: &str, params: impl IntoIterator<Item = SqlParam>) -> Self {
        Self {
            sql: sql.to_string(),
            params: params.into_iter().collect(),
        }
    }
}

/// The statement under construction and the values bound so far.
#[derive(Debug, Clone)]
pub(crate) struct SearchState {
    composer: PredicateComposer,
    params: ParamList,
}

impl SearchState {
    fn new() -> Self {
        Self {
            composer: PredicateComposer::new(BASE_SELECT),
            params: ParamList::new(),
        }
    }

    fn into_query(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.composer.finish(),
            params: self.params.into_vec(),
        }
    }
}

/// Builds the property search statement for a [`PropertyFilter`].
///
/// Filters are applied in a fixed order (city, owner, price range, rating),
/// each step only when its field is present:
///
/// ```text
/// SELECT properties.*, avg(property_reviews.rating) AS average_rating
/// FROM properties
/// JOIN property_reviews ON properties.id = property_reviews.property_id
/// WHERE city ILIKE $1
/// AND owner_id = $2
/// AND cost_per_night >= $3
/// AND cost_per_night <= $4
/// GROUP BY properties.id
/// HAVING AVG(property_reviews.rating) >= $5
/// ORDER BY cost_per_night
/// LIMIT $6
/// ```
#[derive(Debug, Clone)]
pub struct PropertySearch<'a> {
    filter: &'a PropertyFilter,
    limit: i64,
    price_conjunction: PriceConjunction,
}

impl<'a> PropertySearch<'a> {
    pub fn new(filter: &'a PropertyFilter) -> Self {
        Self {
            filter,
            limit: DEFAULT_LIMIT,
            price_conjunction: PriceConjunction::default(),
        }
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn price_conjunction(mut self, mode: PriceConjunction) -> Self {
        self.price_conjunction = mode;
        self
    }

    pub fn build(&self) -> Result<BuiltQuery, QueryBuildError> {
        let state = SearchState::new();
        let state = self.apply_city(state)?;
        let state = self.apply_owner(state)?;
        let state = self.apply_price_range(state)?;
        let state = self.apply_group_by(state)?;
        let state = self.apply_minimum_rating(state)?;
        let state = self.apply_order_and_limit(state);
        Ok(state.into_query())
    }

    pub(crate) fn apply_city(&self, mut state: SearchState) -> Result<SearchState, QueryBuildError> {
        if let Some(city) = &self.filter.city {
            let placeholder = state.params.placeholder(format!("%{city}%"));
            state
                .composer
                .open_or_continue(&format!("city ILIKE {placeholder}"), FilterKind::Row)?;
        }
        Ok(state)
    }

    pub(crate) fn apply_owner(&self, mut state: SearchState) -> Result<SearchState, QueryBuildError> {
        if let Some(owner_id) = self.filter.owner_id {
            let placeholder = state.params.placeholder(owner_id);
            state
                .composer
                .open_or_continue(&format!("owner_id = {placeholder}"), FilterKind::Row)?;
        }
        Ok(state)
    }

    pub(crate) fn apply_price_range(
        &self,
        mut state: SearchState,
    ) -> Result<SearchState, QueryBuildError> {
        let Some((minimum, maximum)) = self.filter.price_range() else {
            if self.filter.has_one_sided_price() {
                tracing::debug!(
                    minimum = ?self.filter.minimum_price_per_night,
                    maximum = ?self.filter.maximum_price_per_night,
                    "Ignoring one-sided price bound; both bounds are required."
                );
            }
            return Ok(state);
        };

        let lower = format!("cost_per_night >= {}", state.params.placeholder(minimum));
        let upper = format!("cost_per_night <= {}", state.params.placeholder(maximum));
        match self.price_conjunction {
            PriceConjunction::Composed => {
                state.composer.open_or_continue(&lower, FilterKind::Row)?;
                state.composer.open_or_continue(&upper, FilterKind::Row)?;
            }
            PriceConjunction::Legacy => {
                state.composer.append_and(&lower)?;
                state.composer.append_and(&upper)?;
            }
        }
        Ok(state)
    }

    fn apply_group_by(&self, mut state: SearchState) -> Result<SearchState, QueryBuildError> {
        state.composer.group_by(GROUP_COLUMNS)?;
        Ok(state)
    }

    pub(crate) fn apply_minimum_rating(
        &self,
        mut state: SearchState,
    ) -> Result<SearchState, QueryBuildError> {
        if let Some(rating) = self.filter.minimum_rating {
            let placeholder = state.params.placeholder(rating);
            state.composer.open_or_continue(
                &format!("AVG(property_reviews.rating) >= {placeholder}"),
                FilterKind::Aggregate,
            )?;
        }
        Ok(state)
    }

    fn apply_order_and_limit(&self, mut state: SearchState) -> SearchState {
        let placeholder = state.params.placeholder(self.limit);
        state.composer.push_clause("ORDER BY cost_per_night");
        state.composer.push_clause(&format!("LIMIT {placeholder}"));
        state
    }
}
