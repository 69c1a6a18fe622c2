//! Postgres enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `fee_frequency` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_frequency")]
pub enum FeeFrequency {
    /// Charged once.
    #[sea_orm(string_value = "ONE_TIME")]
    OneTime,
    /// Charged every month.
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
}

impl From<FeeFrequency> for bursar_core::catalog::FeeFrequency {
    fn from(value: FeeFrequency) -> Self {
        match value {
            FeeFrequency::OneTime => Self::OneTime,
            FeeFrequency::Monthly => Self::Monthly,
        }
    }
}

impl From<bursar_core::catalog::FeeFrequency> for FeeFrequency {
    fn from(value: bursar_core::catalog::FeeFrequency) -> Self {
        match value {
            bursar_core::catalog::FeeFrequency::OneTime => Self::OneTime,
            bursar_core::catalog::FeeFrequency::Monthly => Self::Monthly,
        }
    }
}

/// `payment_mode` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_mode")]
pub enum PaymentMode {
    /// Cash.
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// UPI.
    #[sea_orm(string_value = "UPI")]
    Upi,
    /// Cheque.
    #[sea_orm(string_value = "CHEQUE")]
    Cheque,
    /// Online gateway.
    #[sea_orm(string_value = "ONLINE")]
    Online,
    /// Bank transfer.
    #[sea_orm(string_value = "BANK_TRANSFER")]
    BankTransfer,
}

impl From<PaymentMode> for bursar_core::payment::PaymentMode {
    fn from(value: PaymentMode) -> Self {
        match value {
            PaymentMode::Cash => Self::Cash,
            PaymentMode::Upi => Self::Upi,
            PaymentMode::Cheque => Self::Cheque,
            PaymentMode::Online => Self::Online,
            PaymentMode::BankTransfer => Self::BankTransfer,
        }
    }
}

impl From<bursar_core::payment::PaymentMode> for PaymentMode {
    fn from(value: bursar_core::payment::PaymentMode) -> Self {
        use bursar_core::payment::PaymentMode as Mode;
        match value {
            Mode::Cash => Self::Cash,
            Mode::Upi => Self::Upi,
            Mode::Cheque => Self::Cheque,
            Mode::Online => Self::Online,
            Mode::BankTransfer => Self::BankTransfer,
        }
    }
}
