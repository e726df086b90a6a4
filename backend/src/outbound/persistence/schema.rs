//! Diesel table definitions matching `backend/migrations`.
//!
//! Regenerate with `diesel print-schema` whenever a migration changes the
//! `users` table.

diesel::table! {
    /// Registered users. `email_address` carries a unique constraint and
    /// every text column rejects the empty string.
    users (id) {
        /// Primary key: UUID v4 assigned on insert.
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Login email, unique across rows.
        email_address -> Varchar,
        /// bcrypt digest of the password; plaintext is never stored.
        password -> Varchar,
        created_at -> Timestamptz,
        /// Maintained by the `users_touch_updated_at` trigger.
        updated_at -> Timestamptz,
    }
}
