//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in step with `backend/migrations`; `diesel print-schema` against a
//! migrated database regenerates these.

diesel::table! {
    /// Registered accounts. `email` carries a `UNIQUE` constraint.
    user_models (id) {
        id -> Uuid,
        email -> Text,
        username -> Text,
        bio -> Text,
        image -> Nullable<Text>,
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published articles keyed by slug.
    article_models (slug) {
        slug -> Text,
        title -> Text,
        description -> Text,
        body -> Text,
        tag_list -> Array<Text>,
        author_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(article_models -> user_models (author_id));
diesel::allow_tables_to_appear_in_same_query!(article_models, user_models);
