//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Business rules live in `gaurakshak-core`; repositories call
//! into it and apply the resulting transitions.

pub mod account;
pub mod animal;
pub mod finance;
pub mod milk;
pub mod movement;
pub mod renewal;
pub mod user;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use animal::{AnimalError, AnimalRepository, CreateAnimalInput, UpdateAnimalInput};
pub use finance::{
    CreateRecordInput, FinanceError, FinanceRepository, MilkSaleInput, RecordDraft,
    TransferInput, UpdateRecordInput, milk_sale_draft, transfer_legs,
};
pub use milk::{CreateProductionInput, MilkError, MilkRepository, ProductionEntry};
pub use movement::{
    CreateMovementInput, MovementError, MovementRepository, UpdateMovementInput,
};
pub use renewal::{RenewalError, RenewalRepository, SubmitRenewalInput};
pub use user::{RegisterUserInput, UserError, UserRepository, normalize_email};
