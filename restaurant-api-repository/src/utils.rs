//! Utility functions for the restaurant API repository.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use mongodb::bson::oid::ObjectId;

use crate::errors::ApiError;

/// Parse a hex string identifier into a database `ObjectId`.
///
/// A malformed identifier can never match a stored document, so the failure
/// is reported as a database error rather than a parse error.
///
/// # Arguments
///
/// * `id` - The identifier as a 24 character hex string
///
/// # Returns
///
/// * `Ok(ObjectId)` - The parsed identifier
/// * `Err(ApiError::DatabaseError)` - If the string is not a valid ObjectId
///
/// # Example
///
/// ```
/// use restaurant_api_repository::parse_object_id;
///
/// let id = parse_object_id("64a1f0c2e4b0a1b2c3d4e5f6").expect("valid id");
/// assert_eq!(id.to_hex(), "64a1f0c2e4b0a1b2c3d4e5f6");
/// ```
pub fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id)
        .map_err(|e| ApiError::database(format!("Invalid id '{}': {}", id, e)))
}

/// Render a modification stamp in the local time zone using a chrono format
/// string.
///
/// # Returns
///
/// * `Ok(String)` - The rendered stamp
/// * `Err(ApiError::ParseError)` - If the format contains an invalid specifier
pub fn format_stamp(now: DateTime<Utc>, format: &str) -> Result<String, ApiError> {
    let mut stamp = String::new();
    write!(stamp, "{}", now.with_timezone(&Local).format(format))
        .map_err(|_| ApiError::parse(format!("Invalid date format '{}'", format)))?;
    Ok(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};

    #[test]
    fn test_parse_object_id() {
        let id = parse_object_id("64a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id.to_hex(), "64a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_parse_object_id_invalid() {
        for input in ["", "invalid", "64a1f0c2e4b0a1b2c3d4e5f", "zza1f0c2e4b0a1b2c3d4e5f6"] {
            let result = parse_object_id(input);
            assert!(
                matches!(result, Err(ApiError::DatabaseError(_))),
                "Expected DatabaseError for '{}'",
                input
            );
        }
    }

    #[test]
    fn test_format_stamp_medium_style() {
        let format = "%b %-d, %Y, %-I:%M:%S %p";
        let now = Utc.with_ymd_and_hms(2017, 7, 4, 15, 4, 5).unwrap();

        let stamp = format_stamp(now, format).unwrap();

        let parsed = NaiveDateTime::parse_from_str(&stamp, format).unwrap();
        assert_eq!(parsed, now.with_timezone(&Local).naive_local());
    }

    #[test]
    fn test_format_stamp_invalid_format() {
        let result = format_stamp(Utc::now(), "%Y %");
        assert!(matches!(result, Err(ApiError::ParseError(_))));
    }
}
