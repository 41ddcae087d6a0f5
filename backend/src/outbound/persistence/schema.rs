//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Shipment records.
    ///
    /// `tracking_number` carries a unique constraint and `status` a check
    /// constraint limiting it to the lifecycle status names.
    shipments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// External lookup key (unique).
        #[max_length = 64]
        tracking_number -> Varchar,
        /// Owner of the shipment.
        user_id -> Uuid,
        sender_name -> Text,
        sender_address -> Text,
        receiver_name -> Text,
        receiver_address -> Text,
        item_description -> Text,
        /// Lifecycle status name.
        #[max_length = 32]
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}
