use crate::domain::value::{MessageText, RawPhoneNumber, SmsId};

/// Send one message to one recipient.
#[derive(Debug, Clone)]
pub struct SendSms {
    to: RawPhoneNumber,
    text: MessageText,
}

impl SendSms {
    pub fn new(to: RawPhoneNumber, text: MessageText) -> Self {
        Self { to, text }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }
}

/// Query the delivery state of a previously sent message.
///
/// The recipient is kept alongside the id for callers that track it, but LetsAds keys the
/// status query on the message id alone and the recipient is never transmitted.
#[derive(Debug, Clone)]
pub struct CheckStatus {
    sms_id: SmsId,
    recipient: Option<RawPhoneNumber>,
}

impl CheckStatus {
    pub fn new(sms_id: SmsId) -> Self {
        Self {
            sms_id,
            recipient: None,
        }
    }

    pub fn with_recipient(sms_id: SmsId, recipient: RawPhoneNumber) -> Self {
        Self {
            sms_id,
            recipient: Some(recipient),
        }
    }

    pub fn sms_id(&self) -> &SmsId {
        &self.sms_id
    }

    pub fn recipient(&self) -> Option<&RawPhoneNumber> {
        self.recipient.as_ref()
    }
}
