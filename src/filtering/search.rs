use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{BinOper, Expr, Func, SimpleExpr},
};

/// Escape LIKE wildcards so user input only ever matches literally.
/// Escapes: `\` (the escape character itself), `%` and `_`.
#[must_use]
pub fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\") // Escape backslash first
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn like_escaped(column: SimpleExpr, pattern: SimpleExpr) -> SimpleExpr {
    let pattern = SimpleExpr::Binary(
        Box::new(pattern),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant('\\'.into())),
    );
    SimpleExpr::Binary(Box::new(column), BinOper::Like, Box::new(pattern))
}

/// `UPPER(table.column) LIKE UPPER('%term%') ESCAPE '\'`
///
/// Both sides go through the database's own `UPPER`, so the exact stored
/// spelling always matches. SQLite's `UPPER` only folds ASCII, so a term with
/// other letters is also compared against its Rust upper-casing, which lets
/// `şahin` find a stored `Şahin`.
#[must_use]
pub fn contains_ignore_case<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let column: SimpleExpr = Func::upper(Expr::col((column.entity_name(), column))).into();
    let escaped = escape_like_wildcards(term);

    let folded_by_db = like_escaped(
        column.clone(),
        Func::upper(Expr::val(format!("%{escaped}%"))).into(),
    );
    if term.is_ascii() {
        return folded_by_db;
    }
    let folded_here = like_escaped(column, Expr::val(format!("%{}%", escaped.to_uppercase())).into());
    folded_by_db.or(folded_here)
}

/// Matches when any of `columns` contains `term`, ignoring case.
#[must_use]
pub fn contains_any<C: ColumnTrait>(columns: &[C], term: &str) -> Condition {
    columns
        .iter()
        .fold(Condition::any(), |condition, column| {
            condition.add(contains_ignore_case(*column, term))
        })
}
