use quick_xml::escape::escape;
use serde::Deserialize;

use super::TransportError;
use crate::domain::{
    MessageText, RawPhoneNumber, SendSms, SendSmsResponse, SenderName, SmsId, StateCode,
};

#[derive(Debug, Clone, Deserialize)]
struct SendSmsXmlResponse {
    #[serde(default)]
    description: Option<String>,
    sms_id: String,
}

pub fn encode_send_sms_body(sender: &SenderName, request: &SendSms) -> String {
    format!(
        "<message><{from}>{sender}</{from}><{text}>{body}</{text}>\
         <{recipient}>{to}</{recipient}></message>",
        from = SenderName::FIELD,
        text = MessageText::FIELD,
        recipient = RawPhoneNumber::FIELD,
        sender = escape(sender.as_str()),
        body = escape(request.text().as_str()),
        to = escape(request.to().normalized()),
    )
}

pub fn decode_send_sms_xml_response(xml: &str) -> Result<SendSmsResponse, TransportError> {
    let parsed: SendSmsXmlResponse = quick_xml::de::from_str(xml)?;
    let campaign_id = SmsId::new(parsed.sms_id).map_err(|_| TransportError::MissingField {
        field: SmsId::FIELD,
    })?;

    Ok(SendSmsResponse {
        campaign_id,
        status: StateCode::queued(),
        description: parsed
            .description
            .map(|description| description.trim().to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(to: &str, text: &str) -> SendSms {
        SendSms::new(
            RawPhoneNumber::new(to).unwrap(),
            MessageText::new(text).unwrap(),
        )
    }

    #[test]
    fn encode_strips_plus_and_escapes_text() {
        let body = encode_send_sms_body(
            &SenderName::default(),
            &request("+380501234567", "<b>hi</b> & 'bye'"),
        );
        assert_eq!(
            body,
            "<message><from>Test</from>\
             <text>&lt;b&gt;hi&lt;/b&gt; &amp; &apos;bye&apos;</text>\
             <recipient>380501234567</recipient></message>"
        );
    }

    #[test]
    fn encode_uses_configured_sender() {
        let sender = SenderName::new("Shop").unwrap();
        let body = encode_send_sms_body(&sender, &request("380501234567", "hi"));
        assert!(body.contains("<from>Shop</from>"));
        assert!(body.contains("<recipient>380501234567</recipient>"));
    }

    #[test]
    fn decode_returns_id_and_queued_state() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <response>
          <name>Complete</name>
          <description>1 messages put into queue</description>
          <sms_id>999</sms_id>
        </response>"#;

        let response = decode_send_sms_xml_response(xml).unwrap();
        assert_eq!(response.campaign_id.as_str(), "999");
        assert_eq!(response.status, StateCode::queued());
        assert_eq!(
            response.description.as_deref(),
            Some("1 messages put into queue")
        );
    }

    #[test]
    fn decode_without_sms_id_is_a_schema_error() {
        let err = decode_send_sms_xml_response("<response><name>Complete</name></response>")
            .unwrap_err();
        assert!(matches!(err, TransportError::Xml(_)));
    }

    #[test]
    fn decode_with_blank_sms_id_is_rejected() {
        let err =
            decode_send_sms_xml_response("<response><sms_id></sms_id></response>").unwrap_err();
        assert!(matches!(
            err,
            TransportError::MissingField { field: "sms_id" }
        ));
    }
}
