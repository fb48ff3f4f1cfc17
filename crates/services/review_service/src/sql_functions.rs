use diesel::sql_types::Text;

diesel::define_sql_function! {
    /// SQL `LOWER()`, used for case-insensitive name matching and ordering.
    fn lower(x: Text) -> Text;
}
