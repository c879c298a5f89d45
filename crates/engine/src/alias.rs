// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Account alias provisioning

use adf_adapters::{AdapterError, IamAdapter};
use serde::{Deserialize, Serialize};

/// Account passed through the alias step of account provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAliasRequest {
    #[serde(rename = "Id")]
    pub account_id: String,
    pub account_full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Create the account's alias if it carries one. An alias that already
/// exists is not an error. Returns the request unchanged.
pub async fn ensure_account_alias<I: IamAdapter>(
    iam: &I,
    account: AccountAliasRequest,
) -> Result<AccountAliasRequest, AdapterError> {
    let Some(alias) = account.alias.as_deref() else {
        tracing::debug!(account = %account.account_id, "no alias requested");
        return Ok(account);
    };
    match iam.create_account_alias(alias).await {
        Ok(()) => {
            tracing::info!(account = %account.account_id, alias, "created account alias");
        }
        Err(AdapterError::AlreadyExists(_)) => {
            tracing::info!(account = %account.account_id, alias, "account alias already exists");
        }
        Err(e) => return Err(e),
    }
    Ok(account)
}
