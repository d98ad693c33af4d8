//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must stay in lockstep with the embedded migrations; Diesel uses these
//! definitions for compile-time query validation and SQL generation.
//! `diesel print-schema` against a migrated database regenerates them.

diesel::table! {
    /// Registered accounts with their login credentials.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (3 to 50 characters).
        username -> Varchar,
        /// bcrypt hash of the account password.
        password_hash -> Varchar,
        /// Whether the account may manage books and browse all collections.
        is_admin -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named book collections, each owned by exactly one user.
    collections (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user; collection names are unique per owner.
        user_id -> Uuid,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Creation timestamp; the owner's earliest collection is their
        /// default catalogue scope.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogued books with their reviews embedded as a JSONB array.
    books (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Collection the book belongs to.
        collection_id -> Uuid,
        /// Book title (max 200 characters).
        title -> Varchar,
        /// Book author (max 200 characters).
        author -> Varchar,
        /// ISBN as entered (3 to 30 characters).
        isbn -> Varchar,
        /// Category name from the fixed taxonomy.
        category -> Varchar,
        /// When the book entered the catalogue; newest-first sort key.
        added_at -> Timestamptz,
        /// Embedded reviews in append order, camelCase JSON objects.
        reviews -> Jsonb,
    }
}

diesel::joinable!(collections -> users (user_id));
diesel::joinable!(books -> collections (collection_id));

diesel::allow_tables_to_appear_in_same_query!(users, collections, books);
