//! Transport layer: XML wire-format details (serialization/deserialization).

mod balance;
mod check_status;
mod envelope;
mod send_sms;

pub use balance::{decode_balance_xml_response, encode_balance_body};
pub use check_status::{decode_check_status_xml_response, encode_check_status_body};
pub use envelope::{decode_envelope, encode_request};
pub use send_sms::{decode_send_sms_xml_response, encode_send_sms_body};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("response not valid XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("invalid balance value: {value:?}")]
    InvalidBalance { value: String },

    #[error("response is missing `{field}`")]
    MissingField { field: &'static str },
}
