use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    BigInt(i64),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::BigInt(value)
    }
}

impl From<Decimal> for SqlParam {
    fn from(value: Decimal) -> Self {
        SqlParam::Decimal(value)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(value: NaiveDate) -> Self {
        SqlParam::Date(value)
    }
}

/// Bound values in the order their placeholders were emitted.
///
/// `len()` is always the number of placeholders handed out so far, and the
/// value at index `i` belongs to placeholder `$i+1`. Values cannot be removed
/// or replaced once pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamList {
    values: Vec<SqlParam>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` and returns its 1-based ordinal.
    pub fn push(&mut self, value: impl Into<SqlParam>) -> usize {
        self.values.push(value.into());
        self.values.len()
    }

    /// Appends `value` and returns the placeholder token (`$n`) that refers to it.
    pub fn placeholder(&mut self, value: impl Into<SqlParam>) -> String {
        format!("${}", self.push(value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[SqlParam] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<SqlParam> {
        self.values
    }
}

impl<T: Into<SqlParam>> FromIterator<T> for ParamList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut params = ParamList::new();
        for value in iter {
            params.push(value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn push_returns_one_based_ordinals() {
        let mut params = ParamList::new();
        assert_eq!(params.push("%van%"), 1);
        assert_eq!(params.push(3_i32), 2);
        assert_eq!(params.push(dec!(4)), 3);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn placeholder_matches_position() {
        let mut params = ParamList::new();
        assert_eq!(params.placeholder(10_000_i64), "$1");
        assert_eq!(params.placeholder(20_000_i64), "$2");
        assert_eq!(
            params.as_slice(),
            &[SqlParam::BigInt(10_000), SqlParam::BigInt(20_000)]
        );
    }

    #[test]
    fn collected_values_keep_their_order() {
        let params: ParamList = ["a", "b", "c"].into_iter().collect();
        assert_eq!(
            params.into_vec(),
            vec![
                SqlParam::Text("a".into()),
                SqlParam::Text("b".into()),
                SqlParam::Text("c".into()),
            ]
        );
    }
}
