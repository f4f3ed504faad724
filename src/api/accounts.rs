//! Organisation accounts: create, fetch, delete, list.
//!
//! Each operation only builds its route and payload; the client owns the
//! exchange, status classification and decoding.

use crate::transport::request::Request;
use crate::{
    Account, AccountAttributes, AccountEnvelope, AccountId, AccountList, CreateAccountRequest,
    Error, OrganisationId,
};

const COLLECTION: [&str; 3] = ["v1", "organisation", "accounts"];

/// `POST /v1/organisation/accounts`
fn create_request(
    id: &AccountId,
    organisation_id: &OrganisationId,
    attributes: &AccountAttributes,
) -> Result<Request, Error> {
    Request::post(COLLECTION).json(&CreateAccountRequest::new(id, organisation_id, attributes))
}

/// `GET /v1/organisation/accounts/{id}`
fn fetch_request(id: &AccountId) -> Request {
    Request::get(item_segments(id))
}

/// `DELETE /v1/organisation/accounts/{id}?version={version}`
fn delete_request(id: &AccountId, version: u64) -> Request {
    Request::delete(item_segments(id)).query_pair("version", version)
}

/// `GET /v1/organisation/accounts`
fn list_request() -> Request {
    Request::get(COLLECTION)
}

/// `GET /v1/organisation/accounts/?page[number]={n}&page[size]={m}`
///
/// Values are passed through unchecked; the service decides what they mean.
fn list_page_request(page_number: i64, page_size: i64) -> Request {
    Request::get(COLLECTION.into_iter().chain([""]))
        .query_pair("page[number]", page_number)
        .query_pair("page[size]", page_size)
}

fn item_segments(id: &AccountId) -> impl Iterator<Item = &str> {
    COLLECTION.into_iter().chain([id.as_str()])
}

/// Organisation accounts APIs.
#[derive(Clone)]
#[cfg(feature = "async")]
pub struct AccountsService {
    client: crate::Client,
}

#[cfg(feature = "async")]
impl AccountsService {
    pub(crate) fn new(client: crate::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "async")]
impl AccountsService {
    /// Register a new account and return it as stored by the service.
    pub async fn create(
        &self,
        id: impl Into<AccountId>,
        organisation_id: impl Into<OrganisationId>,
        attributes: &AccountAttributes,
    ) -> Result<Account, Error> {
        let req = create_request(&id.into(), &organisation_id.into(), attributes)?;
        let envelope: AccountEnvelope = self.client.send_json(req).await?;
        Ok(envelope.data)
    }

    /// A missing id surfaces as [`Error::Remote`] with status `404`.
    pub async fn fetch(&self, id: impl Into<AccountId>) -> Result<Account, Error> {
        let envelope: AccountEnvelope = self.client.send_json(fetch_request(&id.into())).await?;
        Ok(envelope.data)
    }

    /// Delete `id` if its current version is `version`.
    pub async fn delete(&self, id: impl Into<AccountId>, version: u64) -> Result<(), Error> {
        self.client.send_unit(delete_request(&id.into(), version)).await
    }

    pub async fn list(&self) -> Result<AccountList, Error> {
        self.client.send_json(list_request()).await
    }

    /// One page of the collection; `page_number` is zero-based.
    pub async fn list_page(&self, page_number: i64, page_size: i64) -> Result<AccountList, Error> {
        self.client
            .send_json(list_page_request(page_number, page_size))
            .await
    }
}

/// Organisation accounts APIs (blocking).
#[cfg(feature = "blocking")]
#[derive(Clone)]
pub struct BlockingAccountsService {
    client: crate::BlockingClient,
}

#[cfg(feature = "blocking")]
impl BlockingAccountsService {
    pub(crate) fn new(client: crate::BlockingClient) -> Self {
        Self { client }
    }
}

#[cfg(feature = "blocking")]
impl BlockingAccountsService {
    /// Register a new account and return it as stored by the service.
    ///
    /// The returned account carries the server-assigned `version` and timestamps.
    pub fn create(
        &self,
        id: impl Into<AccountId>,
        organisation_id: impl Into<OrganisationId>,
        attributes: &AccountAttributes,
    ) -> Result<Account, Error> {
        let req = create_request(&id.into(), &organisation_id.into(), attributes)?;
        let envelope: AccountEnvelope = self.client.send_json(req)?;
        Ok(envelope.data)
    }

    /// A missing id surfaces as [`Error::Remote`] with status `404`.
    pub fn fetch(&self, id: impl Into<AccountId>) -> Result<Account, Error> {
        let envelope: AccountEnvelope = self.client.send_json(fetch_request(&id.into()))?;
        Ok(envelope.data)
    }

    /// Delete `id` if its current version is `version`.
    ///
    /// A stale version is rejected by the service (usually `409`). On any
    /// error the account is left untouched.
    pub fn delete(&self, id: impl Into<AccountId>, version: u64) -> Result<(), Error> {
        self.client.send_unit(delete_request(&id.into(), version))
    }

    pub fn list(&self) -> Result<AccountList, Error> {
        self.client.send_json(list_request())
    }

    /// One page of the collection; `page_number` is zero-based.
    pub fn list_page(&self, page_number: i64, page_size: i64) -> Result<AccountList, Error> {
        self.client
            .send_json(list_page_request(page_number, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn routes_match_the_accounts_api() {
        let id = AccountId::from("ad27e265");

        let fetch = fetch_request(&id);
        assert_eq!(fetch.method, Method::GET);
        assert_eq!(fetch.display_path(), "/v1/organisation/accounts/ad27e265");

        let delete = delete_request(&id, 4);
        assert_eq!(delete.method, Method::DELETE);
        assert_eq!(delete.display_path(), "/v1/organisation/accounts/ad27e265");
        assert_eq!(delete.query, vec![("version".to_string(), "4".to_string())]);

        let list = list_request();
        assert_eq!(list.display_path(), "/v1/organisation/accounts");
        assert!(list.query.is_empty());
    }

    #[test]
    fn list_page_passes_values_through_verbatim() {
        let req = list_page_request(-1, 0);
        assert_eq!(req.display_path(), "/v1/organisation/accounts/");
        assert_eq!(
            req.query,
            vec![
                ("page[number]".to_string(), "-1".to_string()),
                ("page[size]".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn create_posts_a_data_envelope() {
        let req = create_request(
            &AccountId::from("ad27e265"),
            &OrganisationId::from("eb0bd6f5"),
            &AccountAttributes::new("GB").bic("NWBKGB22"),
        )
        .unwrap();

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.display_path(), "/v1/organisation/accounts");
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["data"]["type"], "accounts");
        assert_eq!(body["data"]["organisation_id"], "eb0bd6f5");
        assert_eq!(body["data"]["attributes"]["bic"], "NWBKGB22");
        assert!(body["data"].get("version").is_none());
    }
}
