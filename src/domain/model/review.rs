use crate::domain::model::coerce;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A stored review document.
///
/// `id` is allocated by the store; everything else lives in the flattened
/// [`ReviewDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(flatten)]
    pub draft: ReviewDraft,
}

/// Review fields as submitted by a client, before an id is assigned.
///
/// Unknown fields (e.g. `rating`) are kept in `extra` and stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewDraft {
    /// Id of the reviewed dealership. Not checked against the dealerships collection.
    #[serde(
        default,
        deserialize_with = "coerce::opt_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub dealership: Option<i64>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub review: Option<String>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase: Option<bool>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub car_make: Option<String>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub car_model: Option<String>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub car_year: Option<i64>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl ReviewDraft {
    /// Attaches a store-allocated id. Any client-supplied `id` is discarded.
    pub fn into_review(mut self, id: i64) -> Review {
        self.extra.remove("id");
        Review { id, draft: self }
    }
}

impl Review {
    pub fn dealership(&self) -> Option<i64> {
        self.draft.dealership
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let review: Review = serde_json::from_value(json!({
            "id": 7,
            "dealership": "15",
            "name": "Berkly Shepley",
            "purchase": "true",
            "car_year": 2009,
            "rating": 5
        }))
        .unwrap();

        assert_eq!(review.id, 7);
        assert_eq!(review.dealership(), Some(15));
        assert_eq!(review.draft.purchase, Some(true));
        assert_eq!(review.draft.extra.get("rating"), Some(&json!(5)));

        let out = serde_json::to_value(&review).unwrap();
        assert_eq!(out["id"], json!(7));
        assert_eq!(out["dealership"], json!(15));
        assert_eq!(out["rating"], json!(5));
        assert!(out.get("review").is_none());
    }

    #[test]
    fn test_into_review_drops_client_id() {
        let draft: ReviewDraft =
            serde_json::from_value(json!({"id": 99, "dealership": 1, "name": "A"})).unwrap();
        assert_eq!(draft.extra.get("id"), Some(&json!(99)));

        let review = draft.into_review(3);
        let raw = serde_json::to_string(&review).unwrap();
        assert_eq!(raw.matches("\"id\"").count(), 1);
        let out: JsonValue = serde_json::from_str(&raw).unwrap();
        assert_eq!(out["id"], json!(3));
    }

    #[test]
    fn test_text_fields_accept_scalars() {
        let draft: ReviewDraft = serde_json::from_value(json!({
            "dealership": 1,
            "name": 123,
            "car_model": 3,
            "purchase_date": null,
            "review": true
        }))
        .unwrap();
        assert_eq!(draft.name.as_deref(), Some("123"));
        assert_eq!(draft.car_model.as_deref(), Some("3"));
        assert_eq!(draft.review.as_deref(), Some("true"));
        assert!(draft.purchase_date.is_none());

        let res: Result<ReviewDraft, _> = serde_json::from_value(json!({"name": ["a"]}));
        assert!(res.is_err());
    }

    #[test]
    fn test_bad_dealership_is_rejected() {
        let res: Result<ReviewDraft, _> = serde_json::from_value(json!({"dealership": "abc"}));
        assert!(res.is_err());
    }
}
