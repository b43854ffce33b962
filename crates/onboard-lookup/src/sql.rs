pub(crate) fn quote_identifier(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

/// `SELECT 1 FROM "table" WHERE "column" = ? LIMIT 1`
pub(crate) fn exists_sql(table: &str, column: &str) -> String {
    format!(
        "SELECT 1 FROM {} WHERE {} = ? LIMIT 1",
        quote_identifier(table),
        quote_identifier(column)
    )
}
