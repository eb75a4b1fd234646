//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database when the
//! migrations change.

diesel::table! {
    /// Registered user accounts.
    ///
    /// The `email` column carries a unique index and is compared
    /// case-sensitively. Enumerated columns are guarded by CHECK constraints
    /// in the migrations.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Unique, case-sensitive login email.
        email -> Varchar,
        /// Argon2 PHC hash string; never leaves the persistence layer.
        password_hash -> Text,
        /// Privilege level: `user` or `admin`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Grievance tickets filed against a policy.
    complaints (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user; `ON DELETE RESTRICT`.
        owner_id -> Uuid,
        /// Free-text policy number (max 64 characters).
        policy_number -> Varchar,
        /// Complaint category; CHECK-constrained to the closed set.
        category -> Varchar,
        /// Short summary (max 200 characters).
        title -> Varchar,
        /// Full description.
        description -> Text,
        /// Lifecycle status; CHECK-constrained to the closed set.
        status -> Varchar,
        /// Department derived from the category at filing time.
        department -> Varchar,
        /// Priority derived from the category at filing time.
        priority -> Varchar,
        /// Optional admin resolution note.
        admin_response -> Nullable<Text>,
        /// Filing timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(complaints -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(complaints, users);
