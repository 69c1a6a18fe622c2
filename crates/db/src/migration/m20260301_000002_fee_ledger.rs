//! Fee catalog and payment tables.
//!
//! Creates the fee enums, fee heads and structures, payment events and
//! allocations, and the triggers that keep payments append-only and
//! allocations within each obligation's amount.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: FEE CATALOG
        // ============================================================
        db.execute_unprepared(FEE_HEADS_SQL).await?;
        db.execute_unprepared(FEE_STRUCTURES_SQL).await?;

        // ============================================================
        // PART 3: PAYMENTS
        // ============================================================
        db.execute_unprepared(PAYMENT_EVENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_ALLOCATIONS_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS & FUNCTIONS
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
CREATE TYPE fee_frequency AS ENUM ('ONE_TIME', 'MONTHLY');

CREATE TYPE payment_mode AS ENUM (
    'CASH',
    'UPI',
    'CHEQUE',
    'ONLINE',
    'BANK_TRANSFER'
);
";

const FEE_HEADS_SQL: &str = r"
CREATE TABLE fee_heads (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL UNIQUE,
    new_student_only BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_fee_heads_name CHECK (length(trim(name)) > 0)
);
";

const FEE_STRUCTURES_SQL: &str = r"
CREATE TABLE fee_structures (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    class_id UUID NOT NULL REFERENCES classes(id),
    academic_year_id UUID NOT NULL REFERENCES academic_years(id),
    fee_head_id UUID NOT NULL REFERENCES fee_heads(id),
    amount NUMERIC(12, 2) NOT NULL,
    frequency fee_frequency NOT NULL,
    due_date DATE NOT NULL,
    stream VARCHAR(50),
    subject_count INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_fee_structures_amount CHECK (amount > 0),
    CONSTRAINT chk_fee_structures_subject_count CHECK (subject_count IS NULL OR subject_count > 0),
    CONSTRAINT chk_fee_structures_stream CHECK (stream IS NULL OR length(trim(stream)) > 0)
);

-- One row per slot for a (class, year, head, stream, subject count) key
CREATE UNIQUE INDEX uq_fee_structures_slot ON fee_structures(
    class_id,
    academic_year_id,
    fee_head_id,
    COALESCE(stream, ''),
    COALESCE(subject_count, 0),
    due_date
);

CREATE INDEX idx_fee_structures_class_year ON fee_structures(class_id, academic_year_id);
";

const PAYMENT_EVENTS_SQL: &str = r"
CREATE TABLE payment_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    receipt_number VARCHAR(32) NOT NULL UNIQUE,
    student_id UUID NOT NULL REFERENCES students(id),
    academic_year_id UUID NOT NULL REFERENCES academic_years(id),
    mode payment_mode NOT NULL,
    transaction_reference VARCHAR(100),
    remarks TEXT,
    payment_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    total_amount NUMERIC(12, 2) NOT NULL,
    collected_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_payment_events_total CHECK (total_amount > 0),
    CONSTRAINT chk_payment_events_receipt CHECK (receipt_number ~ '^REC-[0-9]{8}-[0-9]{4}$')
);

CREATE INDEX idx_payment_events_student ON payment_events(student_id, payment_date DESC);
CREATE INDEX idx_payment_events_date ON payment_events(payment_date);
";

const PAYMENT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE payment_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    payment_event_id UUID NOT NULL REFERENCES payment_events(id),
    student_id UUID NOT NULL REFERENCES students(id),
    fee_structure_id UUID NOT NULL REFERENCES fee_structures(id),
    amount_paid NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_payment_allocations_amount CHECK (amount_paid > 0),
    CONSTRAINT uq_payment_allocations_event_item UNIQUE (payment_event_id, fee_structure_id)
);

CREATE INDEX idx_payment_allocations_obligation ON payment_allocations(student_id, fee_structure_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_allocation_within_amount
-- Sum of allocations per (student, fee structure) never exceeds the amount
-- ============================================================
CREATE OR REPLACE FUNCTION check_allocation_within_amount()
RETURNS TRIGGER AS $$
DECLARE
    owed NUMERIC(12, 2);
    paid NUMERIC(12, 2);
BEGIN
    SELECT amount INTO owed
    FROM fee_structures
    WHERE id = NEW.fee_structure_id;

    SELECT COALESCE(SUM(amount_paid), 0) INTO paid
    FROM payment_allocations
    WHERE student_id = NEW.student_id
      AND fee_structure_id = NEW.fee_structure_id;

    IF paid > owed THEN
        RAISE EXCEPTION 'Allocations for fee structure % exceed amount. Paid: %, Amount: %',
            NEW.fee_structure_id, paid, owed;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_allocation_within_amount
AFTER INSERT ON payment_allocations
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_allocation_within_amount();

-- ============================================================
-- FUNCTION: check_payment_event_total
-- Event total equals the sum of its allocations
-- ============================================================
CREATE OR REPLACE FUNCTION check_payment_event_total()
RETURNS TRIGGER AS $$
DECLARE
    allocated NUMERIC(12, 2);
BEGIN
    SELECT COALESCE(SUM(amount_paid), 0) INTO allocated
    FROM payment_allocations
    WHERE payment_event_id = NEW.id;

    IF allocated <> NEW.total_amount THEN
        RAISE EXCEPTION 'Payment event % total % does not match allocations %',
            NEW.id, NEW.total_amount, allocated;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_payment_event_total
AFTER INSERT ON payment_events
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_payment_event_total();

-- ============================================================
-- FUNCTION: prevent_payment_update
-- Payment events and allocations are append-only
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_payment_update()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Recorded payments cannot be modified';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_payment_event_update
BEFORE UPDATE ON payment_events
FOR EACH ROW
EXECUTE FUNCTION prevent_payment_update();

CREATE TRIGGER trg_prevent_payment_allocation_update
BEFORE UPDATE ON payment_allocations
FOR EACH ROW
EXECUTE FUNCTION prevent_payment_update();

-- ============================================================
-- FUNCTION: prevent_structure_update
-- Structures are immutable once created
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_structure_update()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Fee structures cannot be modified; configure a new structure instead';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_structure_update
BEFORE UPDATE ON fee_structures
FOR EACH ROW
EXECUTE FUNCTION prevent_structure_update();
";

const DROP_ALL_SQL: &str = r"
-- Drop triggers
DROP TRIGGER IF EXISTS trg_prevent_structure_update ON fee_structures;
DROP TRIGGER IF EXISTS trg_prevent_payment_allocation_update ON payment_allocations;
DROP TRIGGER IF EXISTS trg_prevent_payment_event_update ON payment_events;
DROP TRIGGER IF EXISTS trg_check_payment_event_total ON payment_events;
DROP TRIGGER IF EXISTS trg_check_allocation_within_amount ON payment_allocations;

-- Drop functions
DROP FUNCTION IF EXISTS prevent_structure_update();
DROP FUNCTION IF EXISTS prevent_payment_update();
DROP FUNCTION IF EXISTS check_payment_event_total();
DROP FUNCTION IF EXISTS check_allocation_within_amount();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS payment_allocations CASCADE;
DROP TABLE IF EXISTS payment_events CASCADE;
DROP TABLE IF EXISTS fee_structures CASCADE;
DROP TABLE IF EXISTS fee_heads CASCADE;

-- Drop enums
DROP TYPE IF EXISTS payment_mode;
DROP TYPE IF EXISTS fee_frequency;
";
