use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic `{"message": ...}` acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deserializers that accept either a JSON number or a numeric string.
///
/// The web client posts form values verbatim, so `"12.5"` and `12.5` must
/// both be understood.
pub mod lenient {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<T> {
        Number(T),
        Text(String),
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match NumberOrText::<T>::deserialize(deserializer)? {
            NumberOrText::Number(value) => Ok(value),
            NumberOrText::Text(text) => text
                .trim()
                .parse()
                .map_err(|err| D::Error::custom(format!("invalid number \"{text}\": {err}"))),
        }
    }
}

pub mod user {
    use super::*;

    /// Body of both `POST /register` and `POST /login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub access_token: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
    }
}

pub mod item {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub title: String,
        #[serde(deserialize_with = "lenient::number")]
        pub amount: f64,
        /// Free-form kind, usually `income` or `expense`.
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(deserialize_with = "lenient::number")]
        pub category_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemCreated {
        pub message: String,
        pub id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: i32,
        pub title: String,
        pub amount: f64,
        #[serde(rename = "type")]
        pub kind: String,
        pub created_at: DateTime<Utc>,
        /// Name of the owning category.
        pub category: String,
    }
}

pub mod shared {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SharedNew {
        #[serde(deserialize_with = "lenient::number")]
        pub budget_item_id: i32,
        /// Percentage in `0..=100`.
        #[serde(deserialize_with = "lenient::number")]
        pub contribution_percent: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SharedView {
        /// Title of the shared budget item.
        pub item: String,
        pub amount: f64,
        #[serde(rename = "type")]
        pub kind: String,
        pub contribution_percent: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::{item::ItemNew, shared::SharedNew};

    #[test]
    fn item_accepts_form_strings() {
        let item: ItemNew = serde_json::from_str(
            r#"{"title":"Rent","amount":"800.5","type":"expense","category_id":"3"}"#,
        )
        .unwrap();
        assert_eq!(item.amount, 800.5);
        assert_eq!(item.category_id, 3);
        assert_eq!(item.kind, "expense");
    }

    #[test]
    fn item_accepts_plain_numbers() {
        let item: ItemNew = serde_json::from_str(
            r#"{"title":"Salary","amount":2000,"type":"income","category_id":1}"#,
        )
        .unwrap();
        assert_eq!(item.amount, 2000.0);
        assert_eq!(item.category_id, 1);
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        let res: Result<SharedNew, _> =
            serde_json::from_str(r#"{"budget_item_id":1,"contribution_percent":"half"}"#);
        assert!(res.is_err());
    }
}
