//! End-to-end blocking demo: create, fetch, page through and delete an account.
//!
//! Build with:
//! ```bash
//! cargo run --example account_lifecycle
//! # or: cargo run --no-default-features --features blocking,native-tls --example account_lifecycle
//! ```
//!
//! Set env vars to point it at a running accounts API:
//! - `ACCOUNTS_URL` (default: `http://localhost:8080`)
//! - `ACCOUNT_ID` (default: a fixed UUID)
//! - `ORGANISATION_ID` (default: a fixed UUID)
//! - `ACCOUNTS_PAGE_SIZE` (default: `10`)

use accounts_sdk::{AccountAttributes, BlockingClient};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let base_url = env_or("ACCOUNTS_URL", "http://localhost:8080");
    let account_id = env_or("ACCOUNT_ID", "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc");
    let organisation_id = env_or("ORGANISATION_ID", "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c");
    let page_size: i64 = env_or("ACCOUNTS_PAGE_SIZE", "10").parse()?;

    let client = BlockingClient::builder()
        .base_url(base_url)
        .no_system_proxy()
        .timeout(Duration::from_secs(20))
        .build()?;
    let accounts = client.accounts();

    let attributes = AccountAttributes::new("GB")
        .base_currency("GBP")
        .bank_id("400300")
        .bank_id_code("GBDSC")
        .bic("NWBKGB22");

    let created = accounts.create(account_id.as_str(), organisation_id.as_str(), &attributes)?;
    let version = created
        .version
        .ok_or_else(|| anyhow::anyhow!("service returned account {} without a version", created.id))?;
    println!("created: {} (version {version})", created.id);

    let fetched = accounts.fetch(&created.id)?;
    println!(
        "fetched: {} country={} bic={}",
        fetched.id,
        fetched.attributes.country,
        fetched.attributes.bic.as_deref().unwrap_or("<none>")
    );

    let all = accounts.list()?;
    println!("accounts on first default page: {}", all.len());

    let page = accounts.list_page(0, page_size)?;
    println!("page 0 (size {page_size}):");
    for account in &page {
        println!("  - {}", account.id);
    }
    if let Some(next) = page.link("next") {
        println!("next page: {next}");
    }

    accounts.delete(&created.id, version)?;
    println!("deleted: {}", created.id);

    match accounts.fetch(&created.id) {
        Err(err) if err.is_not_found() => println!("fetch after delete: not found"),
        Err(err) => return Err(err.into()),
        Ok(account) => println!("fetch after delete still returned {}", account.id),
    }

    Ok(())
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}
