//! Domain layer: strong types with validation and invariants (no I/O).

mod code;
mod request;
mod response;
mod validation;
mod value;

pub use code::{ErrorCode, KnownErrorCode, KnownStateCode, StateCode, error_text, state_text};
pub use request::{CheckStatus, SendSms};
pub use response::{BalanceResponse, CheckStatusResponse, SendSmsResponse};
pub use validation::ValidationError;
pub use value::{
    Login, MessageText, Password, PhoneNumber, RawPhoneNumber, SenderName, SmsId, TableName,
    process_phone,
};
