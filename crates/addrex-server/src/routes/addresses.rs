//! Address recognition endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use addrex_core::error::{AddrexError, AddrexResult};
use addrex_core::{ExtractedAddress, PartialAddress};

use crate::error::ApiResult;
use crate::state::AppState;

/// Request body for address recognition.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecognizeRequest {
    /// Free text to parse, such as a pasted shipping label.
    pub text: String,
    /// Fields the caller already knows; these always win.
    #[serde(default)]
    pub address: Option<PartialAddress>,
}

impl RecognizeRequest {
    /// Check length bounds before the request reaches the extractor.
    pub fn validate(&self, max_text_length: usize) -> AddrexResult<()> {
        let len = self.text.chars().count();
        if len < 1 {
            return Err(AddrexError::too_short("text", 1));
        }
        if len > max_text_length {
            return Err(AddrexError::too_long("text", max_text_length));
        }
        if let Some(ref address) = self.address {
            address.validate()?;
        }
        Ok(())
    }
}

/// Recognize a structured address in free text.
/// PUT /v1/addresses/recognize
pub async fn recognize_address(
    State(state): State<AppState>,
    payload: Result<Json<RecognizeRequest>, JsonRejection>,
) -> ApiResult<Json<ExtractedAddress>> {
    let Json(request) = payload?;
    request.validate(state.config().max_text_length)?;

    let extractor = state.extractor().await?;
    let address = extractor
        .extract(&request.text, request.address.as_ref())
        .await?;

    debug!(
        model = extractor.model_name(),
        seeded = request.address.as_ref().map(PartialAddress::present_count).unwrap_or(0),
        "Recognized address"
    );

    Ok(Json(address))
}
