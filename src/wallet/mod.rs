pub mod types;

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::tasks::types::TodoToken;
use types::{
    ActionInput, ActionOutput, CreateActionRequest, CreateActionResponse, EncodeScriptRequest,
    EncodeScriptResponse, ListOutputsRequest, ListOutputsResponse, ListedOutput, OutputToRedeem,
    RedeemScriptRequest, RedeemScriptResponse, Redemption,
};

/// First pushed field of every token output; identifies our outputs on the
/// ledger.
pub const TODO_PROTO_ADDR: &str = "my todo protocol";
/// Protocol id under which the wallet derives the token keys.
pub const PROTOCOL_ID: &str = "todo list";
pub const KEY_ID: &str = "1";
/// Wallet basket tracking the app's unredeemed token outputs.
pub const TOKEN_BASKET: &str = "todo tokens";

const DEFAULT_WALLET_URL: &str = "http://localhost:3301";

/// Narrow interface to the external wallet/signing service. Script
/// construction, key derivation and transaction building all happen on the
/// other side of this boundary.
#[async_trait]
pub trait TokenWallet: Send + Sync {
    /// Mint a token output of `satoshis` carrying the task text, and submit
    /// the transaction creating it.
    async fn create_output(&self, task: &str, satoshis: u64) -> Result<TodoToken, AppError>;

    /// Produce an unlocking proof for the token's output and submit a
    /// transaction redeeming it back to the user.
    async fn redeem_output(
        &self,
        token: &TodoToken,
        satoshis: u64,
        task: &str,
    ) -> Result<Redemption, AppError>;

    /// List the unredeemed token outputs currently held in the app basket.
    async fn list_outputs(&self) -> Result<Vec<ListedOutput>, AppError>;
}

/// `TokenWallet` backed by the local wallet daemon's HTTP API.
pub struct HttpWallet {
    client: Client,
    base_url: String,
}

impl HttpWallet {
    pub fn new() -> Self {
        let base_url =
            std::env::var("TODO_WALLET_URL").unwrap_or_else(|_| DEFAULT_WALLET_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, AppError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                format!("wallet returned {status}")
            } else {
                body
            };
            return Err(AppError::Wallet(message));
        }

        Ok(response.json().await?)
    }
}

impl Default for HttpWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenWallet for HttpWallet {
    async fn create_output(&self, task: &str, satoshis: u64) -> Result<TodoToken, AppError> {
        let encoded: EncodeScriptResponse = self
            .post(
                "/v1/script/encode",
                &EncodeScriptRequest {
                    protocol_id: PROTOCOL_ID.into(),
                    key_id: KEY_ID.into(),
                    fields: vec![TODO_PROTO_ADDR.into(), task.into()],
                },
            )
            .await?;
        debug!(task, "encoded token output script");

        let action: CreateActionResponse = self
            .post(
                "/v1/action/create",
                &CreateActionRequest {
                    description: format!("Create a TODO task: \"{task}\""),
                    outputs: vec![ActionOutput {
                        satoshis,
                        script: encoded.script.clone(),
                    }],
                    inputs: HashMap::new(),
                },
            )
            .await?;
        debug!(txid = %action.txid, satoshis, "created token output");

        Ok(TodoToken {
            txid: action.txid,
            output_index: 0,
            locking_script: encoded.script,
        })
    }

    async fn redeem_output(
        &self,
        token: &TodoToken,
        satoshis: u64,
        task: &str,
    ) -> Result<Redemption, AppError> {
        let unlock: RedeemScriptResponse = self
            .post(
                "/v1/script/redeem",
                &RedeemScriptRequest {
                    protocol_id: PROTOCOL_ID.into(),
                    key_id: KEY_ID.into(),
                    prev_txid: token.txid.clone(),
                    output_index: token.output_index,
                    locking_script: token.locking_script.clone(),
                    output_amount: satoshis,
                },
            )
            .await?;

        let mut inputs = HashMap::new();
        inputs.insert(
            token.txid.clone(),
            ActionInput {
                locking_script: token.locking_script.clone(),
                outputs_to_redeem: vec![OutputToRedeem {
                    index: token.output_index,
                    unlocking_script: unlock.unlocking_script,
                }],
            },
        );

        let action: CreateActionResponse = self
            .post(
                "/v1/action/create",
                &CreateActionRequest {
                    description: format!("Complete a TODO task: \"{task}\""),
                    outputs: vec![],
                    inputs,
                },
            )
            .await?;
        debug!(txid = %action.txid, "redeemed token output");

        Ok(Redemption { txid: action.txid })
    }

    async fn list_outputs(&self) -> Result<Vec<ListedOutput>, AppError> {
        let listed: ListOutputsResponse = self
            .post(
                "/v1/output/list",
                &ListOutputsRequest {
                    basket: TOKEN_BASKET.into(),
                },
            )
            .await?;
        Ok(listed.outputs)
    }
}
