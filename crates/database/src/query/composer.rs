use crate::error::QueryBuildError;

/// Where a filter condition belongs in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// A condition on individual rows, placed in `WHERE`.
    Row,
    /// A condition on an aggregate, placed in `HAVING` after `GROUP BY`.
    Aggregate,
}

/// Appends filter conditions to a base statement with the right conjunction.
///
/// The composer tracks whether a `WHERE` clause has been opened as an explicit
/// flag: the first row filter opens it, every later one continues it with `AND`.
/// Aggregate filters go to `HAVING` and are only accepted after [`group_by`].
///
/// [`group_by`]: PredicateComposer::group_by
#[derive(Debug, Clone)]
pub struct PredicateComposer {
    sql: String,
    clause_opened: bool,
    grouped: bool,
    having_opened: bool,
}

impl PredicateComposer {
    pub fn new(base: &str) -> Self {
        Self {
            sql: base.trim_end().to_string(),
            clause_opened: false,
            grouped: false,
            having_opened: false,
        }
    }

    /// Adds `fragment` as a filter, prefixed with `WHERE`, `AND` or `HAVING`.
    pub fn open_or_continue(
        &mut self,
        fragment: &str,
        kind: FilterKind,
    ) -> Result<(), QueryBuildError> {
        match kind {
            FilterKind::Row => {
                if self.grouped {
                    return Err(QueryBuildError::RowFilterAfterGroupBy);
                }
                let keyword = if self.clause_opened { "AND" } else { "WHERE" };
                self.clause_opened = true;
                self.line(keyword, fragment);
            }
            FilterKind::Aggregate => {
                if !self.grouped {
                    return Err(QueryBuildError::HavingBeforeGroupBy);
                }
                let keyword = if self.having_opened { "AND" } else { "HAVING" };
                self.having_opened = true;
                self.line(keyword, fragment);
            }
        }
        Ok(())
    }

    /// Adds `fragment` joined with a bare `AND`, whether or not a `WHERE` exists.
    ///
    /// Does not touch the clause-opened flag. If nothing opened the clause
    /// beforehand the resulting statement is not valid SQL.
    pub fn append_and(&mut self, fragment: &str) -> Result<(), QueryBuildError> {
        if self.grouped {
            return Err(QueryBuildError::RowFilterAfterGroupBy);
        }
        self.line("AND", fragment);
        Ok(())
    }

    pub fn group_by(&mut self, columns: &str) -> Result<(), QueryBuildError> {
        if self.grouped {
            return Err(QueryBuildError::DuplicateGroupBy);
        }
        self.grouped = true;
        self.line("GROUP BY", columns);
        Ok(())
    }

    /// Appends a clause verbatim on its own line (`ORDER BY ...`, `LIMIT ...`).
    pub fn push_clause(&mut self, clause: &str) {
        self.sql.push('\n');
        self.sql.push_str(clause);
    }

    pub fn clause_opened(&self) -> bool {
        self.clause_opened
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn finish(self) -> String {
        self.sql
    }

    fn line(&mut self, keyword: &str, body: &str) {
        self.sql.push('\n');
        self.sql.push_str(keyword);
        self.sql.push(' ');
        self.sql.push_str(body);
    }
}
