use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// LetsAds error code, as carried in the `description` of an `Error` response.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ErrorCode(String);

impl ErrorCode {
    /// Construct an error code from the raw provider string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code as provided by LetsAds.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a known error code variant, if one exists.
    pub fn known(&self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(&self.0)
    }

    /// Human-readable description; unknown codes get a fallback text embedding the code.
    pub fn description(&self) -> Cow<'static, str> {
        match self.known() {
            Some(kind) => Cow::Borrowed(kind.description()),
            None => Cow::Owned(format!("unknown error code {}", self.0)),
        }
    }

    /// Returns `true` if the provider rejected the credentials or API access.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.known(),
            Some(KnownErrorCode::AuthData | KnownErrorCode::ApiDisabled)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known LetsAds error codes.
pub enum KnownErrorCode {
    ApiDisabled,
    AuthData,
    IncorrectFrom,
    InvalidFrom,
    MaxMessagesCount,
    MessageNotExist,
    MessageTooLong,
    NoData,
    NoMessage,
    NotEnoughMoney,
    RequestFormat,
    UnknownError,
    UserNotModerated,
    WrongDataFormat,
}

impl KnownErrorCode {
    /// Convert a raw LetsAds error string into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code.trim() {
            "API_DISABLED" => Self::ApiDisabled,
            "AUTH_DATA" => Self::AuthData,
            "INCORRECT_FROM" => Self::IncorrectFrom,
            "INVALID_FROM" => Self::InvalidFrom,
            "MAX_MESSAGES_COUNT" => Self::MaxMessagesCount,
            "MESSAGE_NOT_EXIST" => Self::MessageNotExist,
            "MESSAGE_TOO_LONG" => Self::MessageTooLong,
            "NO_DATA" => Self::NoData,
            "NO_MESSAGE" => Self::NoMessage,
            "NOT_ENOUGH_MONEY" => Self::NotEnoughMoney,
            "REQUEST_FORMAT" => Self::RequestFormat,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "USER_NOT_MODERATED" => Self::UserNotModerated,
            "WRONG_DATA_FORMAT" => Self::WrongDataFormat,
            _ => return None,
        })
    }

    /// Wire representation of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApiDisabled => "API_DISABLED",
            Self::AuthData => "AUTH_DATA",
            Self::IncorrectFrom => "INCORRECT_FROM",
            Self::InvalidFrom => "INVALID_FROM",
            Self::MaxMessagesCount => "MAX_MESSAGES_COUNT",
            Self::MessageNotExist => "MESSAGE_NOT_EXIST",
            Self::MessageTooLong => "MESSAGE_TOO_LONG",
            Self::NoData => "NO_DATA",
            Self::NoMessage => "NO_MESSAGE",
            Self::NotEnoughMoney => "NOT_ENOUGH_MONEY",
            Self::RequestFormat => "REQUEST_FORMAT",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::UserNotModerated => "USER_NOT_MODERATED",
            Self::WrongDataFormat => "WRONG_DATA_FORMAT",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ApiDisabled => "API access is disabled for this account",
            Self::AuthData => "authorization failed: unknown user or wrong login/password pair",
            Self::IncorrectFrom => "malformed sender name",
            Self::InvalidFrom => "sender name is not registered for this account",
            Self::MaxMessagesCount => "too many recipients in a single request",
            Self::MessageNotExist => "no message with the given id",
            Self::MessageTooLong => {
                "message is too long: 201 characters for Cyrillic, 459 for Latin"
            }
            Self::NoData => "no XML data in the request",
            Self::NoMessage => "message text is empty",
            Self::NotEnoughMoney => "not enough funds to send the message to all recipients",
            Self::RequestFormat => "wrong request type",
            Self::UnknownError => "unknown error",
            Self::UserNotModerated => "sending without moderation is forbidden for this account",
            Self::WrongDataFormat => "malformed request XML",
        }
    }
}

impl From<KnownErrorCode> for ErrorCode {
    fn from(value: KnownErrorCode) -> Self {
        Self(value.as_str().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Delivery state of a message as reported by LetsAds.
///
/// This value is preserved as-is even when the state is unknown to this crate.
pub struct StateCode(String);

impl StateCode {
    /// Construct a state code from the raw provider string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// State assigned to every freshly sent message.
    pub fn queued() -> Self {
        KnownStateCode::InQueue.into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this state to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownStateCode> {
        KnownStateCode::from_code(&self.0)
    }

    /// Human-readable description; unknown states get a fallback text embedding the code.
    pub fn description(&self) -> Cow<'static, str> {
        match self.known() {
            Some(kind) => Cow::Borrowed(kind.description()),
            None => Cow::Owned(format!("unknown state code {}", self.0)),
        }
    }

    /// Returns `true` while the provider may still change this state.
    pub fn is_pending(&self) -> bool {
        matches!(self.known(), Some(KnownStateCode::InQueue))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known LetsAds message states.
pub enum KnownStateCode {
    Delivered,
    Sent,
    NotDelivered,
    InQueue,
}

impl KnownStateCode {
    /// Convert a raw LetsAds state string into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code.trim() {
            "MESSAGE_IS_DELIVERED" => Self::Delivered,
            "MESSAGE_IS_SENT" => Self::Sent,
            "MESSAGE_NOT_DELIVERED" => Self::NotDelivered,
            "MESSAGE_IN_QUEUE" => Self::InQueue,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "MESSAGE_IS_DELIVERED",
            Self::Sent => "MESSAGE_IS_SENT",
            Self::NotDelivered => "MESSAGE_NOT_DELIVERED",
            Self::InQueue => "MESSAGE_IN_QUEUE",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Delivered => "message delivered to the recipient",
            Self::Sent => "message sent",
            Self::NotDelivered => "message not delivered",
            Self::InQueue => "message queued for sending",
        }
    }
}

impl From<KnownStateCode> for StateCode {
    fn from(value: KnownStateCode) -> Self {
        Self(value.as_str().to_owned())
    }
}

/// Describe a LetsAds error code.
pub fn error_text(code: &str) -> Cow<'static, str> {
    ErrorCode::new(code).description()
}

/// Describe a LetsAds message state code.
pub fn state_text(code: &str) -> Cow<'static, str> {
    StateCode::new(code).description()
}
