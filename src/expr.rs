//! Column expressions and the identifier-quoting trust boundary.
//!
//! Plain identifiers are backtick-quoted before they reach the rendered SQL.
//! Qualified names (`users.id`), function calls (`COUNT(id)`), and the
//! wildcard pass through untouched — callers are trusted for those fragments,
//! and the [`Expr::Raw`] variant makes that trust explicit in the type system.

/// A column expression used in select lists, joins, filters, and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A plain identifier, backtick-quoted when rendered.
    Ident(String),
    /// A raw SQL fragment, rendered verbatim.
    Raw(String),
}

impl Expr {
    /// A plain identifier, always quoted when rendered.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// A raw fragment, never quoted. The caller is trusted for its content.
    pub fn raw(fragment: impl Into<String>) -> Self {
        Expr::Raw(fragment.into())
    }

    /// Render to SQL text, quoting identifiers.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Expr::Ident(name) => quote_ident(name),
            Expr::Raw(fragment) => fragment.clone(),
        }
    }
}

/// The automatic classification applied to bare strings: the wildcard,
/// qualified names (containing `.`), and function calls (containing `(`)
/// are raw; everything else is an identifier.
impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        if s == "*" || s.contains('.') || s.contains('(') {
            Expr::Raw(s.to_string())
        } else {
            Expr::Ident(s.to_string())
        }
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::from(s.as_str())
    }
}

/// Backtick-quote an identifier.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("`{name}`")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_are_quoted() {
        assert_eq!(Expr::from("name").render(), "`name`");
    }

    #[test]
    fn qualified_names_pass_through() {
        assert_eq!(Expr::from("users.id").render(), "users.id");
    }

    #[test]
    fn function_calls_pass_through() {
        assert_eq!(Expr::from("COUNT(id)").render(), "COUNT(id)");
    }

    #[test]
    fn wildcard_passes_through() {
        assert_eq!(Expr::from("*").render(), "*");
    }

    #[test]
    fn explicit_raw_beats_auto_quoting() {
        assert_eq!(Expr::raw("name").render(), "name");
        assert_eq!(Expr::ident("users.id").render(), "`users.id`");
    }
}
