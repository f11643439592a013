use quick_xml::escape::escape;
use serde::Deserialize;

use super::TransportError;
use crate::domain::{CheckStatus, CheckStatusResponse, SmsId, StateCode};

#[derive(Debug, Clone, Deserialize)]
struct CheckStatusXmlResponse {
    description: String,
}

pub fn encode_check_status_body(request: &CheckStatus) -> String {
    format!(
        "<{field}>{id}</{field}>",
        field = SmsId::FIELD,
        id = escape(request.sms_id().as_str()),
    )
}

pub fn decode_check_status_xml_response(xml: &str) -> Result<CheckStatusResponse, TransportError> {
    let parsed: CheckStatusXmlResponse = quick_xml::de::from_str(xml)?;
    Ok(CheckStatusResponse {
        state: StateCode::new(parsed.description.trim()),
    })
}
