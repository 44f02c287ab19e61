//! SQL identifier checks.
//!
//! Table and column names come from [`EntityMeta`](crate::EntityMeta) and are written
//! into SQL verbatim, so they are validated once when an entity is registered.
//!
//! - Plain parts must match `[A-Za-z_][A-Za-z0-9_$]*`
//! - A table name may be schema-qualified (`public.users`)
//! - Output aliases are always quoted, with `"` escaped as `""`

use crate::error::{OrmError, OrmResult};

/// Validate a single unquoted identifier part (a column name).
pub fn validate_part(name: &str) -> OrmResult<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(OrmError::validation("Identifier cannot be empty"));
    };
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return Err(OrmError::validation(format!(
            "Invalid identifier start character '{first}' in '{name}'"
        )));
    }
    if let Some(c) = chars.find(|c| !(*c == '_' || *c == '$' || c.is_ascii_alphanumeric())) {
        return Err(OrmError::validation(format!(
            "Invalid character '{c}' in identifier '{name}'"
        )));
    }
    Ok(())
}

/// Validate a possibly schema-qualified identifier (`schema.table`).
pub fn validate_qualified(name: &str) -> OrmResult<()> {
    if name.is_empty() {
        return Err(OrmError::validation("Identifier cannot be empty"));
    }
    for part in name.split('.') {
        if part.is_empty() {
            return Err(OrmError::validation(format!(
                "Empty identifier segment in '{name}'"
            )));
        }
        validate_part(part)?;
    }
    Ok(())
}

/// Append `name` as a quoted identifier.
pub(crate) fn write_quoted(out: &mut String, name: &str) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else if ch != '\0' {
            out.push(ch);
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(validate_part("username").is_ok());
        assert!(validate_part("_private$1").is_ok());
    }

    #[test]
    fn rejects_bad_parts() {
        assert!(validate_part("").is_err());
        assert!(validate_part("1abc").is_err());
        assert!(validate_part("user name").is_err());
        assert!(validate_part("a;drop").is_err());
    }

    #[test]
    fn qualified_names() {
        assert!(validate_qualified("public.users").is_ok());
        assert!(validate_qualified("users").is_ok());
        assert!(validate_qualified("public..users").is_err());
        assert!(validate_qualified("public.").is_err());
    }

    #[test]
    fn quoting_escapes_quotes() {
        let mut out = String::new();
        write_quoted(&mut out, r#"author."x""#);
        assert_eq!(out, "\"author.\"\"x\"\"\"");
    }
}
