//! Wire types for the Up banking API (`https://api.up.com.au/api/v1`).
//!
//! The API speaks JSON:API: list endpoints return `{data: [...], links:
//! {prev?, next?}}` documents and failures return `{errors: [...]}`. Only the
//! fields the client actually reads are modelled; serde skips the rest.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A `{data, links}` list document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub links: PageLinks,
}

/// Pagination links; `next` is an opaque cursor URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// A `{type, id}` resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// A to-one relationship, e.g. `{"data": {"type": "categories", "id": ...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<ResourceIdentifier>,
}

/// A to-many relationship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipList {
    #[serde(default)]
    pub data: Option<Vec<ResourceIdentifier>>,
}

/// An `{errors: [...]}` failure document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorObject>,
}

/// One structured error object from an `{errors: [...]}` body.
///
/// `status` is the HTTP status as a string (JSON:API convention).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

pub mod account {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AccountResource {
        pub id: String,
        pub attributes: AccountAttributes,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountAttributes {
        pub display_name: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryResource {
        pub id: String,
        pub attributes: CategoryAttributes,
        pub relationships: CategoryRelationships,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryAttributes {
        pub name: String,
    }

    /// Root categories have `parent.data == null`.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct CategoryRelationships {
        #[serde(default)]
        pub parent: Relationship,
    }
}

pub mod tag {
    use super::*;

    /// Tags have no attributes; the id is the label.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TagResource {
        pub id: String,
    }

    /// Request body for `POST /transactions/{id}/relationships/tags`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TagAttachBody {
        pub data: Vec<ResourceIdentifier>,
    }

    impl TagAttachBody {
        pub fn single(tag_id: &str) -> Self {
            Self {
                data: vec![ResourceIdentifier {
                    kind: "tags".to_string(),
                    id: tag_id.to_string(),
                }],
            }
        }
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TransactionResource {
        pub id: String,
        pub attributes: TransactionAttributes,
        pub relationships: TransactionRelationships,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionAttributes {
        pub description: String,
        #[serde(default)]
        pub raw_text: Option<String>,
        pub is_categorizable: bool,
        pub amount: MoneyObject,
        pub created_at: DateTime<FixedOffset>,
    }

    /// Monetary amount; `value_in_base_units` is signed integer cents.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyObject {
        pub currency_code: String,
        pub value: String,
        pub value_in_base_units: i64,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionRelationships {
        #[serde(default)]
        pub category: Relationship,
        #[serde(default)]
        pub transfer_account: Relationship,
        #[serde(default)]
        pub tags: RelationshipList,
    }
}
