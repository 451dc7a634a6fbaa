//! Configuration types for the Restaurant service.

use chrono::format::{Item, StrftimeItems};

use crate::errors::ApiError;

/// Medium date style followed by medium time style, e.g. "Jul 4, 2017, 3:04:05 PM".
pub const MEDIUM_DATE_TIME_FORMAT: &str = "%b %-d, %Y, %-I:%M:%S %p";

/// Configuration for the `Restaurant` service.
#[derive(Debug, Clone)]
pub struct RestaurantServiceConfig {
    /// chrono format string used for the `date` stamp of menu items and events.
    ///
    /// Defaults to [`MEDIUM_DATE_TIME_FORMAT`].
    pub date_format: String,
}

impl Default for RestaurantServiceConfig {
    fn default() -> Self {
        Self {
            date_format: MEDIUM_DATE_TIME_FORMAT.to_string(),
        }
    }
}

impl RestaurantServiceConfig {
    /// Create a config with a custom date stamp format.
    ///
    /// # Arguments
    ///
    /// * `date_format` - A chrono `strftime` style format string
    pub fn with_date_format(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Check that the date format only contains valid specifiers.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every specifier is understood by chrono
    /// * `Err(ApiError::ParseError)` - If the format cannot be rendered
    pub fn validate(&self) -> Result<(), ApiError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ApiError::parse(format!(
                "Invalid date format '{}'",
                self.date_format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_valid() {
        assert!(RestaurantServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let config = RestaurantServiceConfig::with_date_format("%Y-%m %");
        assert!(matches!(config.validate(), Err(ApiError::ParseError(_))));
    }
}
