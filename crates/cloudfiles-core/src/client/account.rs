//! Account-level metadata operations.

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use super::StorageClient;
use crate::constants::{ACCOUNT_TEMP_URL_KEY, HEADER_AUTH_TOKEN, METADATA_ACCOUNT_HEADER};
use crate::types::{Method, StorageRequest};
use crate::{Result, TRACING_TARGET_ACCOUNT};

impl StorageClient {
    /// Sets the account temp-URL signing key (`X-Account-Meta-Temp-Url-Key`).
    ///
    /// Once set, the key should not be changed: every temporary URL signed
    /// with the previous key stops working.
    ///
    /// Returns whether the response was 2xx.
    #[instrument(skip_all, target = TRACING_TARGET_ACCOUNT)]
    pub async fn set_account_metadata_key(&mut self, key: &str) -> Result<bool> {
        self.ensure_session().await?;
        let url = self.account_url()?;

        let request = StorageRequest::new(Method::Post, url)
            .with_header(HEADER_AUTH_TOKEN, self.token().to_owned())
            .with_header(ACCOUNT_TEMP_URL_KEY, key);
        let response = self.dispatch(request).await?;

        if !response.is_success() {
            warn!(
                target: TRACING_TARGET_ACCOUNT,
                status = response.status,
                "Setting temp URL key rejected"
            );
        }

        Ok(response.is_success())
    }

    /// Returns every `X-Account-*` header of the account.
    ///
    /// Keys are the lowercased header names with the `X-Account-` prefix
    /// removed, e.g. `X-Account-Meta-Temp-Url-Key` becomes
    /// `meta-temp-url-key`. Returns `Ok(None)` if the request was not 2xx.
    #[instrument(skip_all, target = TRACING_TARGET_ACCOUNT)]
    pub async fn get_info_account(&mut self) -> Result<Option<BTreeMap<String, String>>> {
        self.ensure_session().await?;
        let url = self.account_url()?;

        let response = self.dispatch(StorageRequest::new(Method::Head, url)).await?;
        if !response.is_success() {
            warn!(
                target: TRACING_TARGET_ACCOUNT,
                status = response.status,
                "Account metadata request rejected"
            );
            return Ok(None);
        }

        let metadata = account_metadata(&response.headers);

        debug!(
            target: TRACING_TARGET_ACCOUNT,
            count = metadata.len(),
            "Account metadata retrieved"
        );

        Ok(Some(metadata))
    }
}

fn account_metadata(headers: &[(String, String)]) -> BTreeMap<String, String> {
    let prefix_len = METADATA_ACCOUNT_HEADER.len();

    headers
        .iter()
        .filter(|(name, _)| {
            name.get(..prefix_len)
                .is_some_and(|head| head.eq_ignore_ascii_case(METADATA_ACCOUNT_HEADER))
        })
        .map(|(name, value)| (name[prefix_len..].to_ascii_lowercase(), value.clone()))
        .collect()
}
