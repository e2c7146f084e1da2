use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wire types for the local wallet daemon. Field names follow the
/// daemon's camelCase JSON convention.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeScriptRequest {
    pub protocol_id: String,
    pub key_id: String,
    /// Pushed data fields, in order: protocol address, then the task text.
    pub fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeScriptResponse {
    pub script: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemScriptRequest {
    pub protocol_id: String,
    pub key_id: String,
    pub prev_txid: String,
    pub output_index: u32,
    pub locking_script: String,
    pub output_amount: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemScriptResponse {
    pub unlocking_script: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionRequest {
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<ActionOutput>,
    /// Keyed by the txid of the transaction being spent from.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub inputs: HashMap<String, ActionInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutput {
    pub satoshis: u64,
    pub script: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInput {
    pub locking_script: String,
    pub outputs_to_redeem: Vec<OutputToRedeem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputToRedeem {
    pub index: u32,
    pub unlocking_script: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionResponse {
    pub txid: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOutputsRequest {
    pub basket: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOutputsResponse {
    pub outputs: Vec<ListedOutput>,
}

/// An unredeemed token output held in the app's basket, with its pushed
/// data fields already decoded by the daemon.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedOutput {
    pub txid: String,
    pub output_index: u32,
    pub locking_script: String,
    pub satoshis: u64,
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Confirmation of a redemption transaction.
#[derive(Clone, Debug, Deserialize)]
pub struct Redemption {
    pub txid: String,
}
