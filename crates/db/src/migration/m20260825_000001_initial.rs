//! Initial schema.
//!
//! Creates every table: users, accounts, financial records, animals,
//! movements, milk production records, and AMC renewals. Domain enumerations
//! are TEXT columns constrained by CHECK so the stored strings always parse
//! in `gaurakshak-core`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(FINANCIAL_RECORDS_SQL).await?;
        db.execute_unprepared(ANIMALS_SQL).await?;
        db.execute_unprepared(MOVEMENTS_SQL).await?;
        db.execute_unprepared(MILK_RECORDS_SQL).await?;
        db.execute_unprepared(AMC_RENEWALS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS amc_renewals, milk_records, movements, animals, \
             financial_records, accounts, users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
-- Users: operators and admins. Status drives the login gate.
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    address TEXT,
    mobile_no VARCHAR(20),
    role TEXT NOT NULL DEFAULT 'User'
        CHECK (role IN ('Admin', 'User')),
    status TEXT NOT NULL DEFAULT 'Pending'
        CHECK (status IN ('Pending', 'Active', 'Inactive', 'Expired')),
    customer_id VARCHAR(64),
    validity_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_status ON users(status);
";

const ACCOUNTS_SQL: &str = r"
-- Financial accounts (customers, banks, expense heads), scoped per owner.
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    account_type TEXT NOT NULL
        CHECK (account_type IN ('Customer', 'Bank', 'Expense')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_owner ON accounts(owner_id, name);
";

const FINANCIAL_RECORDS_SQL: &str = r"
-- Financial records. Deleting an account leaves its records in place, so
-- account_id carries no foreign key.
CREATE TABLE financial_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date DATE NOT NULL,
    record_type TEXT NOT NULL
        CHECK (record_type IN ('Receipt', 'Payment', 'Expense', 'Milk Sale', 'Bank Record')),
    category TEXT,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    description TEXT NOT NULL,
    account_id UUID,
    quantity NUMERIC(10, 2),
    rate NUMERIC(10, 2),
    invoice_no VARCHAR(64),
    customer_name VARCHAR(255),
    payment_method TEXT
        CHECK (payment_method IN ('RTGS', 'NEFT', 'UPI', 'Cash', 'Other')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_financial_records_owner_date ON financial_records(owner_id, date);
CREATE INDEX idx_financial_records_account ON financial_records(account_id) WHERE account_id IS NOT NULL;
";

const ANIMALS_SQL: &str = r"
-- Animal roster. Government tag numbers are unique per owner.
CREATE TABLE animals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    species VARCHAR(64) NOT NULL,
    govt_tag_no VARCHAR(64) NOT NULL,
    breed VARCHAR(128) NOT NULL,
    color VARCHAR(64) NOT NULL,
    gender TEXT NOT NULL CHECK (gender IN ('Male', 'Female')),
    year_of_birth INTEGER NOT NULL CHECK (year_of_birth > 1900),
    health_status TEXT NOT NULL
        CHECK (health_status IN ('Healthy', 'Sick', 'Under Treatment')),
    tag_color VARCHAR(64) NOT NULL,
    identification_mark TEXT,
    image_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_animals_owner_tag UNIQUE (owner_id, govt_tag_no)
);
";

const MOVEMENTS_SQL: &str = r"
-- Entry/exit log. Alternation per animal is enforced at the write boundary.
CREATE TABLE movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    animal_id UUID NOT NULL REFERENCES animals(id) ON DELETE RESTRICT,
    kind TEXT NOT NULL CHECK (kind IN ('Entry', 'Exit')),
    date DATE NOT NULL,
    reason TEXT NOT NULL CHECK (length(trim(reason)) > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_movements_owner_date ON movements(owner_id, date);
CREATE INDEX idx_movements_animal ON movements(animal_id, date);
";

const MILK_RECORDS_SQL: &str = r"
-- Milk production entries, one per animal per session.
CREATE TABLE milk_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    animal_id UUID NOT NULL REFERENCES animals(id) ON DELETE RESTRICT,
    animal_tag VARCHAR(64) NOT NULL,
    date DATE NOT NULL,
    quantity NUMERIC(10, 2) NOT NULL CHECK (quantity > 0),
    session TEXT NOT NULL CHECK (session IN ('Morning', 'Evening')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_milk_records_owner_date ON milk_records(owner_id, date);
";

const AMC_RENEWALS_SQL: &str = r"
-- AMC renewal submissions, global (not owner scoped).
CREATE TABLE amc_renewals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    user_name VARCHAR(255) NOT NULL,
    customer_id VARCHAR(64),
    date DATE NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    payment_method TEXT NOT NULL
        CHECK (payment_method IN ('RTGS', 'NEFT', 'UPI', 'Cash', 'Other')),
    status TEXT NOT NULL DEFAULT 'Pending'
        CHECK (status IN ('Pending', 'Approved')),
    submitted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_amc_renewals_status ON amc_renewals(status, submitted_at);
";
