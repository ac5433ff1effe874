//! Validation of names that become path components

use crate::{Error, Result};

/// Check that `name` can be used as a single directory name.
///
/// Package names are used verbatim as directory names under the module
/// root, so anything that could resolve outside of it is rejected.
pub fn validate_path_component(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative path marker")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.contains(':') {
        Some("name contains a drive or stream separator")
    } else if name.chars().any(char::is_control) {
        Some("name contains control characters")
    } else if name.trim() != name {
        Some("name has leading or trailing whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("corelib")]
    #[case("weather-widget")]
    #[case("Nura_Shade.Weather")]
    #[case("@scoped")]
    fn accepts_plain_names(#[case] name: &str) {
        assert!(validate_path_component(name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("../x")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("C:evil")]
    #[case("nul\0byte")]
    #[case(" padded")]
    fn rejects_unsafe_names(#[case] name: &str) {
        let err = validate_path_component(name).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }
}
