use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! opaque_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Value);

        impl $name {
            /// Wrap a backend record as-is.
            pub fn new(value: Value) -> Self {
                Self(value)
            }

            /// The record exactly as the backend returned it.
            pub fn as_value(&self) -> &Value {
                &self.0
            }

            /// Unwrap into the backend record.
            pub fn into_value(self) -> Value {
                self.0
            }

            fn str_field(&self, key: &str) -> Option<&str> {
                self.0.get(key).and_then(Value::as_str)
            }
        }

        impl From<Value> for $name {
            fn from(value: Value) -> Self {
                Self(value)
            }
        }
    };
}

opaque_record!(
    /// A listing as returned by the backend.
    ///
    /// The shape differs between the listing query (`_id`, `title`, `slug`,
    /// `metadata`) and the search query (nested location, user and
    /// categories), so it is stored verbatim.
    Post
);

opaque_record!(
    /// A post category used for filtering and navigation.
    Category
);

opaque_record!(
    /// An item condition used for filtering.
    Condition
);

impl Post {
    /// Backend identifier, `_id` first, then `id`.
    pub fn id(&self) -> Option<&str> {
        self.str_field("_id").or_else(|| self.str_field("id"))
    }

    /// The `title` field, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// The `slug` field, if it is a string.
    pub fn slug(&self) -> Option<&str> {
        self.str_field("slug")
    }
}

impl Category {
    /// The `name` field, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }
}

impl Condition {
    /// The `name` field, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }
}

/// Where the user is browsing from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Location {
    /// Location from its three parts.
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Credentials of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Payload accepted by the listing actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Free-text search term
    pub term: Option<String>,
}

impl PostQuery {
    /// Query carrying a search term.
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
        }
    }
}

/// JavaScript truthiness of a parsed JSON body.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_helpers_read_both_shapes() {
        let listed = Post::new(json!({"_id": "5c1", "title": "Oak desk", "slug": "oak-desk"}));
        assert_eq!(listed.id(), Some("5c1"));
        assert_eq!(listed.slug(), Some("oak-desk"));

        let searched = Post::new(json!({"id": 7, "title": null}));
        assert_eq!(searched.id(), None);
        assert_eq!(searched.title(), None);
    }

    #[test]
    fn records_round_trip_verbatim() {
        let raw = json!([{"name": "Furniture", "extra": {"order": 1}}]);
        let categories: Vec<Category> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(categories[0].name(), Some("Furniture"));
        assert_eq!(serde_json::to_value(&categories).unwrap(), raw);
    }

    #[test]
    fn location_uses_camel_case() {
        let location = Location::new("Orlando", "FL", "32821");
        assert_eq!(
            serde_json::to_value(&location).unwrap(),
            json!({"city": "Orlando", "state": "FL", "postalCode": "32821"})
        );
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("new")));
    }
}
