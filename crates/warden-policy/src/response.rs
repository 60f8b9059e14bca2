//! Server policy list decoding
//!
//! The server returns an ordered list of policy records. Field names arrive
//! in camelCase or PascalCase depending on the endpoint, so both are accepted.

use serde::{Deserialize, Serialize};
use warden_core::{
    OrganizationId, Policy, PolicyData, PolicyDataMap, PolicyId, PolicyPayload, PolicyType,
    WardenResult,
};

/// One policy as sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
    /// Policy id
    #[serde(alias = "Id")]
    pub id: PolicyId,
    /// Owning organization
    #[serde(alias = "OrganizationId")]
    pub organization_id: OrganizationId,
    /// Numeric policy type
    #[serde(rename = "type", alias = "Type")]
    pub policy_type: PolicyType,
    /// Enabled flag
    #[serde(alias = "Enabled")]
    pub enabled: bool,
    /// Type-specific payload
    #[serde(default, alias = "Data")]
    pub data: Option<PolicyPayload>,
}

impl From<PolicyResponse> for PolicyData {
    fn from(response: PolicyResponse) -> Self {
        Self {
            id: response.id,
            organization_id: response.organization_id,
            policy_type: response.policy_type,
            enabled: response.enabled,
            data: response.data,
        }
    }
}

impl From<PolicyResponse> for Policy {
    fn from(response: PolicyResponse) -> Self {
        PolicyData::from(response).into()
    }
}

/// Paged list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Items, absent on some error responses
    #[serde(alias = "Data")]
    pub data: Option<Vec<T>>,
    /// Token for the next page
    #[serde(alias = "ContinuationToken")]
    pub continuation_token: Option<String>,
}

/// Decode a response into policies, 1:1 and in order.
///
/// `None` when the response or its data is absent.
pub fn policies_from_response(
    response: Option<&ListResponse<PolicyResponse>>,
) -> Option<Vec<Policy>> {
    let data = response?.data.as_ref()?;
    Some(data.iter().cloned().map(Policy::from).collect())
}

/// Key server records by id for the encrypted snapshot.
///
/// A repeated id keeps the later record.
pub fn policy_map_from_response(response: &ListResponse<PolicyResponse>) -> PolicyDataMap {
    response
        .data
        .iter()
        .flatten()
        .cloned()
        .map(|record| (record.id.clone(), PolicyData::from(record)))
        .collect()
}

/// Parse a JSON list response and decode it
pub fn decode_policy_list(json: &str) -> WardenResult<Option<Vec<Policy>>> {
    let response: Option<ListResponse<PolicyResponse>> = serde_json::from_str(json)?;
    Ok(policies_from_response(response.as_ref()))
}
