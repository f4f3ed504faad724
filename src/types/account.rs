//! Account resource and the JSON envelopes wrapping it.
//!
//! Every payload sits under a top-level `data` member. Responses carry an
//! additional `links` map (`self`, `first`, `next`, ...) that is passed
//! through untouched.

use super::common::{AccountId, OrganisationId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Discriminator sent as `type` for every account resource.
pub const ACCOUNT_RESOURCE_TYPE: &str = "accounts";

/// Relation name → URL, e.g. `self` or `next`.
pub type Links = BTreeMap<String, String>;

/// Domain fields of an account.
///
/// The commonly used fields are typed. Anything else the service returns is
/// kept in [`AccountAttributes::extra`] and sent back verbatim on encode, so
/// newer server-side fields survive a decode/encode cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountAttributes {
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    /// Scheme of `bank_id`, e.g. `GBDSC`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<String>>,
    /// `Personal` or `Business`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Attributes without a typed field.
    ///
    /// Keys listed in [`AccountAttributes::TYPED_KEYS`] must not be put here;
    /// they would be encoded twice.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountAttributes {
    /// Wire names backed by a typed field.
    pub const TYPED_KEYS: [&'static str; 10] = [
        "country",
        "base_currency",
        "bank_id",
        "bank_id_code",
        "bic",
        "account_number",
        "iban",
        "name",
        "account_classification",
        "status",
    ];

    #[must_use]
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn base_currency(mut self, value: impl Into<String>) -> Self {
        self.base_currency = Some(value.into());
        self
    }

    #[must_use]
    pub fn bank_id(mut self, value: impl Into<String>) -> Self {
        self.bank_id = Some(value.into());
        self
    }

    #[must_use]
    pub fn bank_id_code(mut self, value: impl Into<String>) -> Self {
        self.bank_id_code = Some(value.into());
        self
    }

    #[must_use]
    pub fn bic(mut self, value: impl Into<String>) -> Self {
        self.bic = Some(value.into());
        self
    }

    /// Set an attribute that has no typed field.
    ///
    /// A key from [`AccountAttributes::TYPED_KEYS`] is ignored; use the typed
    /// setter instead.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !Self::TYPED_KEYS.contains(&key.as_str()) {
            self.extra.insert(key, value.into());
        }
        self
    }
}

/// An account as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub organisation_id: OrganisationId,
    #[serde(rename = "type", default = "account_resource_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
    /// Optimistic-concurrency token; deletion must quote it verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default)]
    pub attributes: AccountAttributes,
}

fn account_resource_type() -> String {
    ACCOUNT_RESOURCE_TYPE.to_owned()
}

/// `{"data": <account>, "links": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEnvelope {
    pub data: Account,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Links,
}

/// `{"data": [<account>...], "links": {...}}`
///
/// Pagination links are kept as received; the client never follows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Account>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Links,
}

impl AccountList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Account> {
        self.data.iter()
    }

    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }
}

impl IntoIterator for AccountList {
    type Item = Account;
    type IntoIter = std::vec::IntoIter<Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a AccountList {
    type Item = &'a Account;
    type IntoIter = std::slice::Iter<'a, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Outbound body of `POST /v1/organisation/accounts`.
///
/// Carries no server-assigned fields.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest<'a> {
    pub data: NewAccount<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAccount<'a> {
    pub id: &'a AccountId,
    pub organisation_id: &'a OrganisationId,
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub attributes: &'a AccountAttributes,
}

impl<'a> CreateAccountRequest<'a> {
    #[must_use]
    pub fn new(
        id: &'a AccountId,
        organisation_id: &'a OrganisationId,
        attributes: &'a AccountAttributes,
    ) -> Self {
        Self {
            data: NewAccount {
                id,
                organisation_id,
                resource_type: ACCOUNT_RESOURCE_TYPE,
                attributes,
            },
        }
    }
}

// The service sends `null` instead of `[]`/`{}` for empty members.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
