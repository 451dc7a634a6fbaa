//! Review entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user review attached to a menu item or an event.
///
/// Unlike the other entities, `post_date` is a real timestamp. Reviews are
/// listed newest first by it.
///
/// # Fields
///
/// - `review_id`: Database-assigned identifier, as a hex string
/// - `user_id`: Author of the review
/// - `review_title`: Short headline
/// - `review_content`: Body text
/// - `post_date`: When the review was last written
/// - `rating`: Score given by the author
/// - `parent_item`: Identifier of the reviewed menu item or event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub review_id: String,
    pub user_id: String,
    pub review_title: String,
    pub review_content: String,
    pub post_date: DateTime<Utc>,
    pub rating: i64,
    pub parent_item: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_review_json_shape() {
        let review = ReviewItem {
            review_id: "64a1f0c2e4b0a1b2c3d4e5f6".to_string(),
            user_id: "user-1".to_string(),
            review_title: "Great".to_string(),
            review_content: "Would eat again".to_string(),
            post_date: Utc.with_ymd_and_hms(2017, 7, 4, 15, 4, 5).unwrap(),
            rating: 5,
            parent_item: "64a1f0c2e4b0a1b2c3d4e5f7".to_string(),
        };

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["reviewId"], "64a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(json["parentItem"], "64a1f0c2e4b0a1b2c3d4e5f7");
        assert_eq!(json["rating"], 5);

        let back: ReviewItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, review);
    }
}
