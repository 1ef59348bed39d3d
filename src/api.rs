use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::types::{AccountInfo, AccountInfoResponse, ConnectPayload, ExtensionPayload, IpResponse};

/// Fetch the caller's public IP through the given client, and therefore
/// through its proxy when one is configured.
pub async fn fetch_public_ip(client: &Client, lookup_url: &str) -> Result<String> {
    let resp: IpResponse = client
        .get(lookup_url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("malformed IP lookup response")?;
    debug!("public IP: {}", resp.ip);
    Ok(resp.ip)
}

/// `GET /account/web/me`: the cumulative reward snapshot for the token.
pub async fn fetch_account_info(client: &Client, api_base: &str) -> Result<AccountInfo> {
    let resp: AccountInfoResponse = client
        .get(format!("{api_base}/account/web/me"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("malformed account info response")?;
    resp.data.context("account info payload missing `data`")
}

/// `POST /extension/stats`: report the extension identifier. The response
/// body is not used.
pub async fn post_stats(client: &Client, api_base: &str, identifier: &str) -> Result<()> {
    client
        .post(format!("{api_base}/extension/stats"))
        .json(&ExtensionPayload {
            extension_id: identifier,
        })
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// `POST /extension/liveness`: signal that the extension is alive.
pub async fn post_liveness(client: &Client, api_base: &str, identifier: &str) -> Result<()> {
    client
        .post(format!("{api_base}/extension/liveness"))
        .json(&ExtensionPayload {
            extension_id: identifier,
        })
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// `POST /extension/connect`: report a connection from `ip`.
pub async fn post_connect(client: &Client, api_base: &str, ip: &str, identifier: &str) -> Result<()> {
    client
        .post(format!("{api_base}/extension/connect"))
        .json(&ConnectPayload {
            ip,
            extension_id: identifier,
        })
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
