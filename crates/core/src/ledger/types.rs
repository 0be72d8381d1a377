//! Ledger domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category label on the milk sale record pair.
pub const MILK_SALE_CATEGORY: &str = "Milk Sale";

/// Category label on both legs of a bank transfer.
pub const BANK_TRANSFER_CATEGORY: &str = "Bank Transfer";

/// Display name of the unlinked walk-in milk buyer.
pub const CASH_CUSTOMER_NAME: &str = "Cash Customer";

/// Kind of a financial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Money received. The only kind that credits an account.
    Receipt,
    /// Money paid out.
    Payment,
    /// Operating expense.
    Expense,
    /// Milk sale leg posted to a customer account.
    #[serde(rename = "Milk Sale")]
    MilkSale,
    /// Bank-side record (e.g. a transfer leg).
    #[serde(rename = "Bank Record")]
    BankRecord,
}

impl RecordKind {
    /// Parse a record kind from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Receipt" => Some(Self::Receipt),
            "Payment" => Some(Self::Payment),
            "Expense" => Some(Self::Expense),
            "Milk Sale" => Some(Self::MilkSale),
            "Bank Record" => Some(Self::BankRecord),
            _ => None,
        }
    }

    /// Returns the stored string form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receipt => "Receipt",
            Self::Payment => "Payment",
            Self::Expense => "Expense",
            Self::MilkSale => "Milk Sale",
            Self::BankRecord => "Bank Record",
        }
    }

    /// Sign rule: a record credits the account iff it is a receipt.
    #[must_use]
    pub const fn is_credit(self) -> bool {
        matches!(self, Self::Receipt)
    }
}

/// Payment method recorded on receipts and renewals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Real-time gross settlement.
    #[serde(rename = "RTGS")]
    Rtgs,
    /// National electronic funds transfer.
    #[serde(rename = "NEFT")]
    Neft,
    /// Unified payments interface.
    #[serde(rename = "UPI")]
    Upi,
    /// Cash in hand.
    Cash,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Parse a payment method from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RTGS" => Some(Self::Rtgs),
            "NEFT" => Some(Self::Neft),
            "UPI" => Some(Self::Upi),
            "Cash" => Some(Self::Cash),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Returns the stored string form of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rtgs => "RTGS",
            Self::Neft => "NEFT",
            Self::Upi => "UPI",
            Self::Cash => "Cash",
            Self::Other => "Other",
        }
    }
}

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// A milk or donation customer.
    Customer,
    /// A bank account.
    Bank,
    /// An expense head.
    Expense,
}

impl AccountType {
    /// Parse an account type from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Customer" => Some(Self::Customer),
            "Bank" => Some(Self::Bank),
            "Expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the stored string form of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Bank => "Bank",
            Self::Expense => "Expense",
        }
    }
}

/// Which account a ledger statement is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSelector {
    /// A stored account.
    Account(Uuid),
    /// The synthetic cash-customer: milk sale records not tied to a
    /// customer account.
    CashCustomer,
}

/// A financial record as seen by the ledger engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Record ID.
    pub id: Uuid,
    /// Calendar day of the record.
    pub date: NaiveDate,
    /// Record kind.
    pub kind: RecordKind,
    /// Optional category label.
    pub category: Option<String>,
    /// Amount, always positive; the kind decides the column.
    pub amount: Decimal,
    /// Narrative description.
    pub description: String,
    /// Account the record is posted to, if any.
    pub account_id: Option<Uuid>,
    /// Milk sale quantity in liters, if this is a milk sale leg.
    pub quantity: Option<Decimal>,
    /// Milk sale rate per liter.
    pub rate: Option<Decimal>,
    /// Milk sale invoice number.
    pub invoice_no: Option<String>,
}

impl LedgerEntry {
    /// Signed effect of this entry on the account balance.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }

    /// Narrative shown on the statement. Milk sale legs render the invoice
    /// line instead of the stored description.
    #[must_use]
    pub fn display_description(&self) -> String {
        if self.category.as_deref() == Some(MILK_SALE_CATEGORY) && !self.kind.is_credit() {
            format!(
                "Inv#{}: {}L @ \u{20b9}{}",
                self.invoice_no.as_deref().unwrap_or(""),
                self.quantity.unwrap_or(Decimal::ZERO),
                self.rate.unwrap_or(Decimal::ZERO),
            )
        } else {
            self.description.clone()
        }
    }
}

/// One statement row with the balance after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Source record ID.
    pub id: Uuid,
    /// Calendar day.
    pub date: NaiveDate,
    /// Record kind.
    pub kind: RecordKind,
    /// Narrative (with the milk sale invoice override applied).
    pub description: String,
    /// Debit column amount (zero for credits).
    pub debit: Decimal,
    /// Credit column amount (zero for debits).
    pub credit: Decimal,
    /// Running balance after this row.
    pub balance: Decimal,
}

/// A computed ledger statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStatement {
    /// Rows inside the requested window, in chronological order.
    pub rows: Vec<LedgerRow>,
    /// Balance carried in from before the window.
    pub opening_balance: Decimal,
    /// Balance after the last row, or the opening balance if no rows.
    pub closing_balance: Decimal,
}

impl LedgerStatement {
    /// An empty statement with zero balances.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            opening_balance: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_kind_round_trip() {
        for kind in [
            RecordKind::Receipt,
            RecordKind::Payment,
            RecordKind::Expense,
            RecordKind::MilkSale,
            RecordKind::BankRecord,
        ] {
            assert_eq!(RecordKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RecordKind::parse("Milk Record"), None);
    }

    #[test]
    fn test_only_receipts_credit() {
        assert!(RecordKind::Receipt.is_credit());
        assert!(!RecordKind::Payment.is_credit());
        assert!(!RecordKind::Expense.is_credit());
        assert!(!RecordKind::MilkSale.is_credit());
        assert!(!RecordKind::BankRecord.is_credit());
    }

    #[test]
    fn test_payment_method_round_trip() {
        for m in [
            PaymentMethod::Rtgs,
            PaymentMethod::Neft,
            PaymentMethod::Upi,
            PaymentMethod::Cash,
            PaymentMethod::Other,
        ] {
            assert_eq!(PaymentMethod::parse(m.as_str()), Some(m));
        }
        assert_eq!(PaymentMethod::parse("rtgs"), None);
    }

    #[test]
    fn test_milk_sale_description_override() {
        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            date: "2024-03-01".parse().unwrap(),
            kind: RecordKind::MilkSale,
            category: Some(MILK_SALE_CATEGORY.to_string()),
            amount: dec!(450),
            description: "Milk sale to Sharma Dairy".to_string(),
            account_id: Some(Uuid::new_v4()),
            quantity: Some(dec!(10)),
            rate: Some(dec!(45)),
            invoice_no: Some("INV-007".to_string()),
        };
        assert_eq!(entry.display_description(), "Inv#INV-007: 10L @ \u{20b9}45");
    }

    #[test]
    fn test_cash_receipt_keeps_description() {
        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            date: "2024-03-01".parse().unwrap(),
            kind: RecordKind::Receipt,
            category: Some(MILK_SALE_CATEGORY.to_string()),
            amount: dec!(450),
            description: "Milk sale to Cash Customer".to_string(),
            account_id: None,
            quantity: Some(dec!(10)),
            rate: Some(dec!(45)),
            invoice_no: Some("INV-008".to_string()),
        };
        assert_eq!(entry.display_description(), "Milk sale to Cash Customer");
    }
}
