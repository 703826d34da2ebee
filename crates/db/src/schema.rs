use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            teacher_id VARCHAR(255) NOT NULL,
            teacher_name VARCHAR(255) NOT NULL,
            level INTEGER NOT NULL,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            topic VARCHAR(255) NOT NULL,
            description TEXT NULL,
            location VARCHAR(255) NOT NULL,
            max_students INTEGER NOT NULL,
            current_bookings INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_level CHECK (level >= 1),
            CONSTRAINT valid_capacity CHECK (max_students >= 1),
            CONSTRAINT bookings_within_capacity
                CHECK (current_bookings >= 0 AND current_bookings <= max_students)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_id UUID NOT NULL REFERENCES slots(id),
            student_id VARCHAR(255) NOT NULL,
            notes TEXT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('confirmed', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One confirmed booking per student per slot; cancelled rows stay behind
    // as history and do not count against the constraint.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_one_confirmed_seat
            ON bookings(slot_id, student_id) WHERE status = 'confirmed';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_slots_teacher_id ON slots(teacher_id);
        CREATE INDEX IF NOT EXISTS idx_slots_level_date ON slots(level, date, start_time);
        CREATE INDEX IF NOT EXISTS idx_bookings_slot_id ON bookings(slot_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_student_id ON bookings(student_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
