//! Initial database migration.
//!
//! Creates the ledger tables, enums and the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(UPDATED_AT_FUNCTION_SQL).await?;

        // ============================================================
        // PART 2: LEDGER ENTITIES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;

        // ============================================================
        // PART 3: TRANSACTIONS & LINES
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRANSACTION_LINES_SQL).await?;

        // ============================================================
        // PART 4: INVESTMENTS
        // ============================================================
        db.execute_unprepared(SECURITIES_SQL).await?;
        db.execute_unprepared(INVESTMENT_LOTS_SQL).await?;
        db.execute_unprepared(INVESTMENT_SALES_SQL).await?;
        db.execute_unprepared(INVESTMENT_LOT_ALLOCATIONS_SQL).await?;

        // ============================================================
        // PART 5: SNAPSHOTS
        // ============================================================
        db.execute_unprepared(ACCOUNT_SNAPSHOTS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'cash',
    'liability',
    'debt',
    'investment',
    'other_asset'
);

CREATE TYPE category_kind AS ENUM (
    'income',
    'expense',
    'transfer',
    'investment'
);
";

const UPDATED_AT_FUNCTION_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    currency VARCHAR(10) NOT NULL DEFAULT 'CNY',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_accounts_ledger ON accounts(ledger_id) WHERE deleted_at IS NULL;
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    name VARCHAR(255) NOT NULL,
    kind category_kind NOT NULL,
    parent_id BIGINT REFERENCES categories(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,
    CHECK (parent_id IS NULL OR parent_id <> id)
);

CREATE INDEX idx_categories_ledger ON categories(ledger_id, kind) WHERE deleted_at IS NULL;
CREATE INDEX idx_categories_parent ON categories(parent_id) WHERE parent_id IS NOT NULL;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    occurred_on DATE NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    note TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_transactions_ledger_date ON transactions(ledger_id, occurred_on DESC)
    WHERE deleted_at IS NULL;
";

const TRANSACTION_LINES_SQL: &str = r"
CREATE TABLE transaction_lines (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    transaction_id BIGINT NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    account_id BIGINT NOT NULL REFERENCES accounts(id),
    category_id BIGINT REFERENCES categories(id),
    amount NUMERIC(24, 8) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_lines_transaction ON transaction_lines(transaction_id) WHERE deleted_at IS NULL;
CREATE INDEX idx_lines_account ON transaction_lines(account_id) WHERE deleted_at IS NULL;
CREATE INDEX idx_lines_category ON transaction_lines(category_id) WHERE category_id IS NOT NULL;
";

const SECURITIES_SQL: &str = r"
CREATE TABLE securities (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    ticker VARCHAR(32) NOT NULL,
    name VARCHAR(255) NOT NULL,
    currency VARCHAR(10) NOT NULL DEFAULT 'CNY',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE UNIQUE INDEX idx_securities_ticker ON securities(ticker) WHERE deleted_at IS NULL;
";

const INVESTMENT_LOTS_SQL: &str = r"
CREATE TABLE investment_lots (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    transaction_line_id BIGINT NOT NULL REFERENCES transaction_lines(id),
    security_id BIGINT NOT NULL REFERENCES securities(id),
    quantity NUMERIC(24, 8) NOT NULL CHECK (quantity > 0),
    price NUMERIC(24, 8) NOT NULL,
    trade_price NUMERIC(24, 8) NOT NULL,
    fee NUMERIC(24, 8) NOT NULL DEFAULT 0,
    tax NUMERIC(24, 8) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_lots_ledger_security ON investment_lots(ledger_id, security_id)
    WHERE deleted_at IS NULL;
CREATE INDEX idx_lots_line ON investment_lots(transaction_line_id);
";

const INVESTMENT_SALES_SQL: &str = r"
CREATE TABLE investment_sales (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    transaction_line_id BIGINT NOT NULL REFERENCES transaction_lines(id),
    security_id BIGINT NOT NULL REFERENCES securities(id),
    quantity NUMERIC(24, 8) NOT NULL CHECK (quantity > 0),
    price NUMERIC(24, 8) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_sales_line ON investment_sales(transaction_line_id);
";

const INVESTMENT_LOT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE investment_lot_allocations (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    buy_lot_id BIGINT NOT NULL REFERENCES investment_lots(id),
    sale_id BIGINT NOT NULL REFERENCES investment_sales(id),
    quantity NUMERIC(24, 8) NOT NULL CHECK (quantity > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_allocations_lot ON investment_lot_allocations(buy_lot_id) WHERE deleted_at IS NULL;
CREATE INDEX idx_allocations_sale ON investment_lot_allocations(sale_id);
";

const ACCOUNT_SNAPSHOTS_SQL: &str = r"
CREATE TABLE account_snapshots (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL DEFAULT 1,
    account_id BIGINT NOT NULL REFERENCES accounts(id),
    as_of DATE NOT NULL,
    amount NUMERIC(24, 8) NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_snapshots_account_date ON account_snapshots(ledger_id, account_id, as_of DESC)
    WHERE deleted_at IS NULL;
";

const TRIGGERS_SQL: &str = r"
CREATE TRIGGER trg_accounts_updated_at BEFORE UPDATE ON accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_categories_updated_at BEFORE UPDATE ON categories
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_transactions_updated_at BEFORE UPDATE ON transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_transaction_lines_updated_at BEFORE UPDATE ON transaction_lines
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_securities_updated_at BEFORE UPDATE ON securities
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_investment_lots_updated_at BEFORE UPDATE ON investment_lots
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_investment_sales_updated_at BEFORE UPDATE ON investment_sales
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_investment_lot_allocations_updated_at BEFORE UPDATE ON investment_lot_allocations
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_account_snapshots_updated_at BEFORE UPDATE ON account_snapshots
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS account_snapshots CASCADE;
DROP TABLE IF EXISTS investment_lot_allocations CASCADE;
DROP TABLE IF EXISTS investment_sales CASCADE;
DROP TABLE IF EXISTS investment_lots CASCADE;
DROP TABLE IF EXISTS securities CASCADE;
DROP TABLE IF EXISTS transaction_lines CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;
DROP TYPE IF EXISTS category_kind;
DROP TYPE IF EXISTS account_type;
";
