//! Flattened views of the JSON:API resources, plus the cover links the
//! matcher fills in.

use api_types::account::AccountResource;
use api_types::tag::TagResource;
use api_types::transaction::{MoneyObject, TransactionResource};
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub display_name: String,
}

impl From<AccountResource> for Account {
    fn from(resource: AccountResource) -> Self {
        Self {
            id: resource.id,
            display_name: resource.attributes.display_name,
        }
    }
}

/// Tags carry no attributes; the id doubles as the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
}

impl From<TagResource> for Tag {
    fn from(resource: TagResource) -> Self {
        Self { id: resource.id }
    }
}

/// Signed amount; `value` is the display string ("-5.50"), `value_in_base_units`
/// the integer cents the cover matcher works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub value: String,
    pub value_in_base_units: i64,
}

impl From<MoneyObject> for Amount {
    fn from(money: MoneyObject) -> Self {
        Self {
            value: money.value,
            value_in_base_units: money.value_in_base_units,
        }
    }
}

/// One transaction as held by the pagination store.
///
/// The cover pairing is deliberately stored as two id back-references rather
/// than owned links in both directions: `cover_transaction_id` on the normal
/// transaction points at its matched cover, `original_transaction_id` on the
/// cover points back. At most one of the two is ever set on a given
/// transaction, and full objects are resolved through a lookup over the
/// owning list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub raw_text: Option<String>,
    pub amount: Amount,
    pub created_at: DateTime<FixedOffset>,
    pub is_categorizable: bool,
    pub category_id: Option<String>,
    pub transfer_account_id: Option<String>,
    pub tag_ids: Vec<String>,
    pub cover_transaction_id: Option<String>,
    pub original_transaction_id: Option<String>,
}

impl From<TransactionResource> for Transaction {
    fn from(resource: TransactionResource) -> Self {
        let relationships = resource.relationships;
        Self {
            id: resource.id,
            description: resource.attributes.description,
            raw_text: resource.attributes.raw_text,
            amount: resource.attributes.amount.into(),
            created_at: resource.attributes.created_at,
            is_categorizable: resource.attributes.is_categorizable,
            category_id: relationships.category.data.map(|category| category.id),
            transfer_account_id: relationships.transfer_account.data.map(|account| account.id),
            tag_ids: relationships
                .tags
                .data
                .unwrap_or_default()
                .into_iter()
                .map(|tag| tag.id)
                .collect(),
            cover_transaction_id: None,
            original_transaction_id: None,
        }
    }
}
