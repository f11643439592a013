use quick_xml::escape::escape;
use serde::Deserialize;

use super::TransportError;
use crate::domain::{Login, Password};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// `name` value LetsAds uses for rejected requests.
const ERROR_NAME: &str = "Error";

/// Fields shared by every LetsAds response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ResponseEnvelope {
    /// The error code carried by an `Error` response, `None` for any other response.
    pub fn error_code(&self) -> Option<&str> {
        if self.name.as_deref().map(str::trim) != Some(ERROR_NAME) {
            return None;
        }
        Some(self.description.as_deref().map(str::trim).unwrap_or_default())
    }
}

/// Wrap an operation body into the authenticated `<request>` envelope.
pub fn encode_request(login: &Login, password: &Password, body: &str) -> String {
    format!(
        "{XML_DECLARATION}<request><auth><{login_field}>{login}</{login_field}>\
         <{password_field}>{password}</{password_field}></auth>{body}</request>",
        login_field = Login::FIELD,
        password_field = Password::FIELD,
        login = escape(login.as_str()),
        password = escape(password.as_str()),
    )
}

pub fn decode_envelope(xml: &str) -> Result<ResponseEnvelope, TransportError> {
    Ok(quick_xml::de::from_str(xml)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_request_wraps_body_with_escaped_auth() {
        let xml = encode_request(
            &Login::new("user").unwrap(),
            &Password::new("p<&>ss").unwrap(),
            "<balance />",
        );
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><request><auth><login>user</login>\
             <password>p&lt;&amp;&gt;ss</password></auth><balance /></request>"
        );
    }

    #[test]
    fn decode_envelope_detects_error_name() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <response>
          <name>Error</name>
          <description>AUTH_DATA</description>
        </response>"#;

        let envelope = decode_envelope(xml).unwrap();
        assert_eq!(envelope.error_code(), Some("AUTH_DATA"));
    }

    #[test]
    fn decode_envelope_without_name_is_not_an_error() {
        let envelope = decode_envelope("<response><balance>1.00</balance></response>").unwrap();
        assert_eq!(envelope.name, None);
        assert_eq!(envelope.error_code(), None);

        let envelope =
            decode_envelope("<response><name>Complete</name><sms_id>1</sms_id></response>")
                .unwrap();
        assert_eq!(envelope.error_code(), None);
    }

    #[test]
    fn decode_envelope_rejects_malformed_xml() {
        let err = decode_envelope("<response><name>Error</response>").unwrap_err();
        assert!(matches!(err, TransportError::Xml(_)));
        assert!(err.to_string().starts_with("response not valid XML"));
    }
}
