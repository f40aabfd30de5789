//! Statement assembly: bound parameters, filter composition and the property search.

pub mod composer;
pub mod params;
pub mod search;

pub use composer::{FilterKind, PredicateComposer};
pub use params::{ParamList, SqlParam};
pub use search::{BuiltQuery, PriceConjunction, PropertySearch, DEFAULT_LIMIT};
