//! Finance repository for financial records, bank transfers, and milk-sale
//! postings.
//!
//! A bank transfer writes exactly two records (a Payment leg and a Receipt
//! leg) in one database transaction. Transfer legs and milk-sale records are
//! immutable once written; edits must be corrected with a fresh record.

use chrono::NaiveDate;
use gaurakshak_core::ledger::{
    BANK_TRANSFER_CATEGORY, CASH_CUSTOMER_NAME, MILK_SALE_CATEGORY, PaymentMethod, RecordKind,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{accounts, financial_records};

/// Error types for finance operations.
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    /// Record not found for this owner.
    #[error("financial record not found: {0}")]
    NotFound(Uuid),

    /// Referenced account not found for this owner.
    #[error("account not found: {0}")]
    AccountNotFound(Uuid),

    /// Amounts must be strictly positive.
    #[error("amount must be positive")]
    NonPositiveAmount,

    /// The record type string is not one of the known kinds.
    #[error("unknown record type '{0}'")]
    UnknownKind(String),

    /// The payment method string is not one of the known methods.
    #[error("unknown payment method '{0}'")]
    UnknownPaymentMethod(String),

    /// Transfer legs and milk sales cannot be edited or deleted.
    #[error("transfer legs and milk sales are immutable")]
    ImmutableRecord,

    /// A transfer needs two distinct accounts.
    #[error("cannot transfer between an account and itself")]
    SameAccount,

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError<Self>> for FinanceError {
    fn from(err: TransactionError<Self>) -> Self {
        match err {
            TransactionError::Connection(db) => Self::Database(db),
            TransactionError::Transaction(inner) => inner,
        }
    }
}

/// Input for creating a plain financial record.
#[derive(Debug, Clone)]
pub struct CreateRecordInput {
    /// Calendar day of the record.
    pub date: NaiveDate,
    /// Stored record kind string.
    pub record_type: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Narrative.
    pub description: String,
    /// Optional account the record posts to.
    pub account_id: Option<Uuid>,
    /// Optional stored payment method string.
    pub payment_method: Option<String>,
}

/// Input for updating a plain financial record.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecordInput {
    /// New day.
    pub date: Option<NaiveDate>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New narrative.
    pub description: Option<String>,
    /// New stored payment method string.
    pub payment_method: Option<Option<String>>,
}

/// Input for a bank transfer between two of the owner's accounts.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// Source account.
    pub from_account_id: Uuid,
    /// Destination account.
    pub to_account_id: Uuid,
    /// Transferred amount.
    pub amount: Decimal,
    /// Calendar day.
    pub date: NaiveDate,
    /// Narrative appended to both legs.
    pub description: String,
}

/// Input for posting a milk sale.
#[derive(Debug, Clone)]
pub struct MilkSaleInput {
    /// Buying customer account; `None` means the cash customer.
    pub customer_id: Option<Uuid>,
    /// Liters sold.
    pub quantity: Decimal,
    /// Price per liter.
    pub rate: Decimal,
    /// Invoice number printed on the sale.
    pub invoice_no: String,
    /// Calendar day of the sale.
    pub date: NaiveDate,
}

/// A record ready to insert; produced by the pure builders below so the
/// narratives and sign conventions can be tested without a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    /// Calendar day.
    pub date: NaiveDate,
    /// Record kind.
    pub kind: RecordKind,
    /// Category label.
    pub category: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Narrative.
    pub description: String,
    /// Account the record posts to, if any.
    pub account_id: Option<Uuid>,
    /// Milk-sale quantity.
    pub quantity: Option<Decimal>,
    /// Milk-sale rate.
    pub rate: Option<Decimal>,
    /// Milk-sale invoice number.
    pub invoice_no: Option<String>,
    /// Milk-sale customer name.
    pub customer_name: Option<String>,
}

/// Builds the two legs of a bank transfer: a Payment on the source account
/// and a Receipt on the destination, linked narratives, equal amounts.
#[must_use]
pub fn transfer_legs(
    from: (Uuid, &str),
    to: (Uuid, &str),
    amount: Decimal,
    date: NaiveDate,
    description: &str,
) -> [RecordDraft; 2] {
    let base = RecordDraft {
        date,
        kind: RecordKind::Payment,
        category: BANK_TRANSFER_CATEGORY.to_string(),
        amount,
        description: String::new(),
        account_id: None,
        quantity: None,
        rate: None,
        invoice_no: None,
        customer_name: None,
    };
    [
        RecordDraft {
            kind: RecordKind::Payment,
            description: format!("Transfer to {}: {description}", to.1),
            account_id: Some(from.0),
            ..base.clone()
        },
        RecordDraft {
            kind: RecordKind::Receipt,
            description: format!("Transfer from {}: {description}", from.1),
            account_id: Some(to.0),
            ..base
        },
    ]
}

/// Builds the financial record for a milk sale. The cash customer pays on
/// the spot, so that sale posts as a Receipt with no account link; a named
/// customer accrues a `MilkSale` debit on their account.
#[must_use]
pub fn milk_sale_draft(
    customer: Option<(Uuid, &str)>,
    quantity: Decimal,
    rate: Decimal,
    invoice_no: &str,
    date: NaiveDate,
) -> RecordDraft {
    let customer_name = customer.map_or(CASH_CUSTOMER_NAME, |(_, name)| name);
    let kind = if customer.is_none() {
        RecordKind::Receipt
    } else {
        RecordKind::MilkSale
    };
    RecordDraft {
        date,
        kind,
        category: MILK_SALE_CATEGORY.to_string(),
        amount: quantity * rate,
        description: format!("Milk sale to {customer_name}"),
        account_id: customer.map(|(id, _)| id),
        quantity: Some(quantity),
        rate: Some(rate),
        invoice_no: Some(invoice_no.to_string()),
        customer_name: Some(customer_name.to_string()),
    }
}

fn immutable_category(category: Option<&str>) -> bool {
    matches!(category, Some(BANK_TRANSFER_CATEGORY | MILK_SALE_CATEGORY))
}

fn draft_to_active(owner_id: Uuid, draft: RecordDraft) -> financial_records::ActiveModel {
    let now = chrono::Utc::now().into();
    financial_records::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        date: Set(draft.date),
        record_type: Set(draft.kind.as_str().to_string()),
        category: Set(Some(draft.category)),
        amount: Set(draft.amount),
        description: Set(draft.description),
        account_id: Set(draft.account_id),
        quantity: Set(draft.quantity),
        rate: Set(draft.rate),
        invoice_no: Set(draft.invoice_no),
        customer_name: Set(draft.customer_name),
        payment_method: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Finance repository for record and transfer operations.
#[derive(Debug, Clone)]
pub struct FinanceRepository {
    db: DatabaseConnection,
}

impl FinanceRepository {
    /// Creates a new finance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's records in chronological order; insertion order
    /// breaks same-day ties.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<financial_records::Model>, FinanceError> {
        let mut query = financial_records::Entity::find()
            .filter(financial_records::Column::OwnerId.eq(owner_id))
            .order_by_asc(financial_records::Column::Date)
            .order_by_asc(financial_records::Column::CreatedAt);

        if let Some(from) = from {
            query = query.filter(financial_records::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(financial_records::Column::Date.lte(to));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Creates a plain record. When an account is given, the record's
    /// category is that account's type.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, the kind or payment
    /// method does not parse, or the account is missing.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateRecordInput,
    ) -> Result<financial_records::Model, FinanceError> {
        if input.amount <= Decimal::ZERO {
            return Err(FinanceError::NonPositiveAmount);
        }
        if RecordKind::parse(&input.record_type).is_none() {
            return Err(FinanceError::UnknownKind(input.record_type));
        }
        if let Some(method) = &input.payment_method
            && PaymentMethod::parse(method).is_none()
        {
            return Err(FinanceError::UnknownPaymentMethod(method.clone()));
        }

        let category = match input.account_id {
            Some(account_id) => {
                let account = self.find_account(owner_id, account_id).await?;
                Some(account.account_type)
            }
            None => None,
        };

        let now = chrono::Utc::now().into();
        let record = financial_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            date: Set(input.date),
            record_type: Set(input.record_type),
            category: Set(category),
            amount: Set(input.amount),
            description: Set(input.description),
            account_id: Set(input.account_id),
            quantity: Set(None),
            rate: Set(None),
            invoice_no: Set(None),
            customer_name: Set(None),
            payment_method: Set(input.payment_method),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(record.insert(&self.db).await?)
    }

    /// Updates a plain record. Transfer legs and milk sales are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is missing, immutable, or the new
    /// values fail validation.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        input: UpdateRecordInput,
    ) -> Result<financial_records::Model, FinanceError> {
        let record = self.find_record(owner_id, id).await?;
        if immutable_category(record.category.as_deref()) {
            return Err(FinanceError::ImmutableRecord);
        }
        if let Some(amount) = input.amount
            && amount <= Decimal::ZERO
        {
            return Err(FinanceError::NonPositiveAmount);
        }
        if let Some(Some(method)) = &input.payment_method
            && PaymentMethod::parse(method).is_none()
        {
            return Err(FinanceError::UnknownPaymentMethod(method.clone()));
        }

        let mut active: financial_records::ActiveModel = record.into();
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(payment_method) = input.payment_method {
            active.payment_method = Set(payment_method);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a plain record. Transfer legs and milk sales are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is missing or immutable.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), FinanceError> {
        let record = self.find_record(owner_id, id).await?;
        if immutable_category(record.category.as_deref()) {
            return Err(FinanceError::ImmutableRecord);
        }
        record.delete(&self.db).await?;
        Ok(())
    }

    /// Writes both legs of a bank transfer atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if either account is missing, the accounts are the
    /// same, or the amount is not positive.
    pub async fn create_transfer(
        &self,
        owner_id: Uuid,
        input: TransferInput,
    ) -> Result<Vec<financial_records::Model>, FinanceError> {
        if input.amount <= Decimal::ZERO {
            return Err(FinanceError::NonPositiveAmount);
        }
        if input.from_account_id == input.to_account_id {
            return Err(FinanceError::SameAccount);
        }

        let from = self.find_account(owner_id, input.from_account_id).await?;
        let to = self.find_account(owner_id, input.to_account_id).await?;

        let legs = transfer_legs(
            (from.id, &from.name),
            (to.id, &to.name),
            input.amount,
            input.date,
            &input.description,
        );

        let models = self
            .db
            .transaction::<_, Vec<financial_records::Model>, FinanceError>(|txn| {
                Box::pin(async move {
                    let mut inserted = Vec::with_capacity(2);
                    for leg in legs {
                        inserted.push(draft_to_active(owner_id, leg).insert(txn).await?);
                    }
                    Ok(inserted)
                })
            })
            .await?;
        Ok(models)
    }

    /// Posts a milk sale as a financial record.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity or rate is not positive, or a named
    /// customer account is missing.
    pub async fn create_milk_sale(
        &self,
        owner_id: Uuid,
        input: MilkSaleInput,
    ) -> Result<financial_records::Model, FinanceError> {
        if input.quantity <= Decimal::ZERO || input.rate <= Decimal::ZERO {
            return Err(FinanceError::NonPositiveAmount);
        }

        let customer = match input.customer_id {
            Some(id) => Some(self.find_account(owner_id, id).await?),
            None => None,
        };
        let draft = milk_sale_draft(
            customer.as_ref().map(|c| (c.id, c.name.as_str())),
            input.quantity,
            input.rate,
            &input.invoice_no,
            input.date,
        );
        Ok(draft_to_active(owner_id, draft).insert(&self.db).await?)
    }

    async fn find_record(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<financial_records::Model, FinanceError> {
        financial_records::Entity::find_by_id(id)
            .filter(financial_records::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(FinanceError::NotFound(id))
    }

    async fn find_account(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<accounts::Model, FinanceError> {
        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(FinanceError::AccountNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_transfer_legs_narratives() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let [payment, receipt] = transfer_legs(
            (from, "SBI Main"),
            (to, "HDFC Savings"),
            dec!(2500),
            d("2024-02-10"),
            "month end sweep",
        );

        assert_eq!(payment.kind, RecordKind::Payment);
        assert_eq!(payment.account_id, Some(from));
        assert_eq!(payment.description, "Transfer to HDFC Savings: month end sweep");
        assert_eq!(receipt.kind, RecordKind::Receipt);
        assert_eq!(receipt.account_id, Some(to));
        assert_eq!(receipt.description, "Transfer from SBI Main: month end sweep");
        assert_eq!(payment.category, BANK_TRANSFER_CATEGORY);
        assert_eq!(receipt.category, BANK_TRANSFER_CATEGORY);
    }

    #[test]
    fn test_milk_sale_cash_customer_is_receipt() {
        let draft = milk_sale_draft(None, dec!(12), dec!(55), "INV-9", d("2024-03-01"));
        assert_eq!(draft.kind, RecordKind::Receipt);
        assert_eq!(draft.account_id, None);
        assert_eq!(draft.amount, dec!(660));
        assert_eq!(draft.description, "Milk sale to Cash Customer");
        assert_eq!(draft.customer_name.as_deref(), Some(CASH_CUSTOMER_NAME));
    }

    #[test]
    fn test_milk_sale_named_customer_accrues() {
        let id = Uuid::new_v4();
        let draft = milk_sale_draft(Some((id, "Sharma Dairy")), dec!(10), dec!(60), "INV-10", d("2024-03-01"));
        assert_eq!(draft.kind, RecordKind::MilkSale);
        assert_eq!(draft.account_id, Some(id));
        assert_eq!(draft.description, "Milk sale to Sharma Dairy");
        assert_eq!(draft.invoice_no.as_deref(), Some("INV-10"));
    }

    #[test]
    fn test_immutable_categories() {
        assert!(immutable_category(Some("Bank Transfer")));
        assert!(immutable_category(Some("Milk Sale")));
        assert!(!immutable_category(Some("Bank")));
        assert!(!immutable_category(None));
    }

    proptest! {
        /// Both legs of any transfer carry the same amount and date, and
        /// under the ledger sign rule they cancel exactly.
        #[test]
        fn prop_transfer_pair_symmetry(
            amount in 1i64..10_000_000,
            from_bits in any::<u128>(),
            to_bits in any::<u128>(),
        ) {
            let amount = Decimal::from(amount);
            let [payment, receipt] = transfer_legs(
                (Uuid::from_u128(from_bits), "A"),
                (Uuid::from_u128(to_bits), "B"),
                amount,
                d("2024-01-01"),
                "x",
            );

            prop_assert_eq!(payment.amount, receipt.amount);
            prop_assert_eq!(payment.date, receipt.date);
            prop_assert!(!payment.kind.is_credit());
            prop_assert!(receipt.kind.is_credit());

            let signed = |draft: &RecordDraft| if draft.kind.is_credit() { draft.amount } else { -draft.amount };
            prop_assert_eq!(signed(&payment) + signed(&receipt), Decimal::ZERO);
        }

        /// A milk sale's amount is always quantity times rate, and the kind
        /// follows the customer link.
        #[test]
        fn prop_milk_sale_amount(
            qty in 1i64..1000,
            rate in 1i64..1000,
            named in any::<bool>(),
        ) {
            let qty = Decimal::from(qty);
            let rate = Decimal::from(rate);
            let customer = named.then(|| (Uuid::new_v4(), "C"));
            let draft = milk_sale_draft(customer, qty, rate, "I", d("2024-01-01"));

            prop_assert_eq!(draft.amount, qty * rate);
            prop_assert_eq!(draft.kind == RecordKind::MilkSale, named);
            prop_assert_eq!(draft.account_id.is_some(), named);
        }
    }
}
