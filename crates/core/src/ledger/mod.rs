//! Account ledger statements.
//!
//! Builds a running-balance statement for one account from the full
//! financial record log, with optional date windowing.

pub mod statement;
pub mod types;

pub use statement::compute_statement;
pub use types::{
    AccountSelector, AccountType, BANK_TRANSFER_CATEGORY, CASH_CUSTOMER_NAME, LedgerEntry,
    LedgerRow, LedgerStatement, MILK_SALE_CATEGORY, PaymentMethod, RecordKind,
};
