use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod codec;
pub mod failure;

pub use codec::{CodecError, EnumCodec, ResolverCache, WireEnum};
pub use failure::{ClassifiedFailure, ErrorCategory, ErrorMapping, ErrorResponse, StatusReason};

/// A type decoded from a JSON body in two steps: serde into its wire form,
/// then enum fields resolved through the [`EnumCodec`].
pub trait FromWire: Sized {
    type Wire: DeserializeOwned;

    fn from_wire(wire: Self::Wire, codec: &EnumCodec) -> Result<Self, CodecError>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl WireEnum for Currency {
    const MEMBERS: &'static [Self] = &[Currency::Usd, Currency::Eur, Currency::Gbp];

    fn name(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotifyChannel {
    Email,
    Sms,
    Webhook,
}

impl WireEnum for NotifyChannel {
    const MEMBERS: &'static [Self] = &[
        NotifyChannel::Email,
        NotifyChannel::Sms,
        NotifyChannel::Webhook,
    ];

    fn name(&self) -> &'static str {
        match self {
            NotifyChannel::Email => "EMAIL",
            NotifyChannel::Sms => "SMS",
            NotifyChannel::Webhook => "WEBHOOK",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DepositStatus {
    Accepted,
    Pending,
    Rejected,
    Unknown,
}

impl WireEnum for DepositStatus {
    const MEMBERS: &'static [Self] = &[
        DepositStatus::Accepted,
        DepositStatus::Pending,
        DepositStatus::Rejected,
        DepositStatus::Unknown,
    ];

    fn name(&self) -> &'static str {
        match self {
            DepositStatus::Accepted => "ACCEPTED",
            DepositStatus::Pending => "PENDING",
            DepositStatus::Rejected => "REJECTED",
            DepositStatus::Unknown => "UNKNOWN",
        }
    }

    fn default_member() -> Option<Self> {
        Some(DepositStatus::Unknown)
    }
}

/// Outbound deposit body. Sent snake_case with null fields omitted.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct DepositRequest {
    pub account_id: String,
    pub amount: i64,
    #[serde(
        serialize_with = "codec::serialize_lowercase_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(
        serialize_with = "codec::serialize_lowercase_seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub notify: Vec<NotifyChannel>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateDeposit {
    pub account_id: String,
    pub amount: i64,
    pub currency: Option<String>,
    pub reference: Option<String>,
    #[serde(default)]
    pub notify: Vec<String>,
}

impl FromWire for DepositRequest {
    type Wire = CreateDeposit;

    fn from_wire(wire: CreateDeposit, codec: &EnumCodec) -> Result<Self, CodecError> {
        Ok(Self {
            account_id: wire.account_id,
            amount: wire.amount,
            currency: codec.decode(wire.currency.as_deref())?,
            reference: wire.reference,
            notify: codec.decode_all(&wire.notify)?,
        })
    }
}

/// Partner's answer to a successful deposit. Read camelCase.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub amount: i64,
    #[serde(
        serialize_with = "codec::serialize_lowercase_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<DepositStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponseWire {
    pub amount: i64,
    pub status: Option<String>,
    pub transaction_id: Option<String>,
}

impl FromWire for DepositResponse {
    type Wire = DepositResponseWire;

    fn from_wire(wire: DepositResponseWire, codec: &EnumCodec) -> Result<Self, CodecError> {
        Ok(Self {
            amount: wire.amount,
            status: codec.decode(wire.status.as_deref())?,
            transaction_id: wire.transaction_id,
        })
    }
}

/// Error body returned by the partner on non-2xx responses.
#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartnerErrorPayload {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error_constant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FromWire for PartnerErrorPayload {
    type Wire = Self;

    fn from_wire(wire: Self, _codec: &EnumCodec) -> Result<Self, CodecError> {
        Ok(wire)
    }
}
