use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// LetsAds account login.
///
/// Invariant: non-empty after trimming.
pub struct Login(String);

impl Login {
    /// XML element name used by LetsAds (`login`).
    pub const FIELD: &'static str = "login";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// LetsAds account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// XML element name used by LetsAds (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender alpha name (`from`).
///
/// Invariant: non-empty after trimming. The name must be registered for the account;
/// [`SenderName::default`] is the `Test` name every LetsAds account can use.
pub struct SenderName(String);

impl SenderName {
    /// XML element name used by LetsAds (`from`).
    pub const FIELD: &'static str = "from";

    /// Alpha name available to every account without registration.
    pub const TEST: &'static str = "Test";

    /// Create a validated [`SenderName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SenderName {
    fn default() -> Self {
        Self(Self::TEST.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`text`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved;
/// XML escaping happens at the wire layer.
pub struct MessageText(String);

impl MessageText {
    /// XML element name used by LetsAds (`text`).
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// LetsAds message id (`sms_id`), also called the campaign id.
///
/// Invariant: non-empty after trimming.
pub struct SmsId(String);

impl SmsId {
    /// XML element name used by LetsAds (`sms_id`).
    pub const FIELD: &'static str = "sms_id";

    /// Create a validated [`SmsId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sms id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number in international format (`recipient`).
///
/// Invariant: non-empty after trimming. LetsAds expects numbers without the leading `+`;
/// use [`RawPhoneNumber::normalized`] to get the value that goes on the wire.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// XML element name used by LetsAds (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as provided.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Value as sent to LetsAds: the raw number without its leading `+`.
    pub fn normalized(&self) -> &str {
        process_phone(&self.0)
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Convert an already-parsed phone number to a normalized raw value (E.164).
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

/// Strip exactly one leading `+` from an international phone number.
///
/// Numbers without a leading `+` are returned unchanged.
pub fn process_phone(international_phone: &str) -> &str {
    international_phone
        .strip_prefix('+')
        .unwrap_or(international_phone)
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// XML element name used by LetsAds (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Name of the table holding outgoing messages for the reconciliation sweep.
///
/// Invariant: non-empty, ASCII letters, digits, `_` and `.` only. Store implementations
/// interpolate it into queries, so nothing else is accepted.
pub struct TableName(String);

impl TableName {
    pub const FIELD: &'static str = "table";

    /// Create a validated [`TableName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let valid = trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.');
        if !valid {
            return Err(ValidationError::InvalidTableName {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
