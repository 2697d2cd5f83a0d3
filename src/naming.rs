//! The `base$$branch` schema naming convention.

use crate::error::{Error, Result};

pub const DELIMITER: &str = "$$";
pub const MAINLINE: &str = "mainline";

/// MySQL rejects schema names longer than this.
pub const MAX_SCHEMA_NAME_LEN: usize = 64;

/// Splits a schema name on the first delimiter into its base name and branch label.
pub fn parse_schema_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once(DELIMITER) {
        Some((base, branch)) => (base, Some(branch)),
        None => (name, None),
    }
}

/// Branch label of a schema name, `mainline` when it carries none.
pub fn branch_label(name: &str) -> &str {
    parse_schema_name(name).1.unwrap_or(MAINLINE)
}

pub fn branch_schema_name(base: &str, branch: &str) -> String {
    format!("{base}{DELIMITER}{branch}")
}

fn validate_part(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName(format!("{kind} name must not be empty")));
    }
    if name.contains(DELIMITER) {
        return Err(Error::InvalidName(format!(
            "{kind} name '{name}' contains the branch delimiter '{DELIMITER}'"
        )));
    }
    if name.contains('\0') {
        return Err(Error::InvalidName(format!("{kind} name contains a NUL character")));
    }
    if name.ends_with(' ') {
        return Err(Error::InvalidName(format!("{kind} name '{name}' ends with a space")));
    }
    Ok(())
}

pub fn validate_base_name(name: &str) -> Result<()> {
    validate_part("schema", name)?;
    // `price$` + `$$dev` would read back as base `price`, branch `$dev`.
    if (1..DELIMITER.len()).any(|n| name.ends_with(&DELIMITER[..n])) {
        return Err(Error::InvalidName(format!(
            "schema name '{name}' ends with part of the branch delimiter '{DELIMITER}'"
        )));
    }
    if name.chars().count() > MAX_SCHEMA_NAME_LEN {
        return Err(Error::InvalidName(format!(
            "schema name '{name}' is longer than {MAX_SCHEMA_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates both parts and returns the derived schema name.
pub fn validate_branch_name(base: &str, branch: &str) -> Result<String> {
    validate_base_name(base)?;
    validate_part("branch", branch)?;
    let derived = branch_schema_name(base, branch);
    if derived.chars().count() > MAX_SCHEMA_NAME_LEN {
        return Err(Error::InvalidName(format!(
            "branch schema name '{derived}' is longer than {MAX_SCHEMA_NAME_LEN} characters"
        )));
    }
    Ok(derived)
}
