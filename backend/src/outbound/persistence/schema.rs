//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    organizations (id) {
        id -> Uuid,
        name -> Varchar,
        /// Lower-cased, whitespace-collapsed name; unique.
        name_key -> Text,
        active -> Bool,
        created_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_at -> Timestamptz,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    hospitals (id) {
        id -> Uuid,
        org_id -> Uuid,
        name -> Varchar,
        /// Unique together with `org_id`.
        name_key -> Text,
        address -> Nullable<Text>,
        active -> Bool,
        created_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_at -> Timestamptz,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    departments (id) {
        id -> Uuid,
        org_id -> Uuid,
        name -> Varchar,
        name_key -> Text,
        description -> Nullable<Text>,
        active -> Bool,
        created_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_at -> Timestamptz,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    locations (id) {
        id -> Uuid,
        org_id -> Uuid,
        hospital_id -> Uuid,
        name -> Varchar,
        /// Unique together with `hospital_id`.
        name_key -> Text,
        kind -> Varchar,
        active -> Bool,
        created_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_at -> Timestamptz,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    teams (id) {
        id -> Uuid,
        org_id -> Uuid,
        department_id -> Uuid,
        name -> Varchar,
        /// Unique together with `department_id`.
        name_key -> Text,
        active -> Bool,
        created_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_at -> Timestamptz,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        org_id -> Uuid,
        /// Stored normalized; unique together with `org_id`.
        email -> Varchar,
        display_name -> Varchar,
        role -> Varchar,
        active -> Bool,
        created_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_at -> Timestamptz,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Join records. Exactly the two endpoint columns named by `kind` are set.
    assignments (id) {
        id -> Uuid,
        org_id -> Uuid,
        kind -> Varchar,
        department_id -> Nullable<Uuid>,
        location_id -> Nullable<Uuid>,
        team_id -> Nullable<Uuid>,
        user_id -> Nullable<Uuid>,
        start_date -> Date,
        end_date -> Nullable<Date>,
        active -> Bool,
        created_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_at -> Timestamptz,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::joinable!(hospitals -> organizations (org_id));
diesel::joinable!(departments -> organizations (org_id));
diesel::joinable!(locations -> hospitals (hospital_id));
diesel::joinable!(teams -> departments (department_id));
diesel::joinable!(users -> organizations (org_id));

diesel::allow_tables_to_appear_in_same_query!(
    organizations,
    hospitals,
    departments,
    locations,
    teams,
    users,
    assignments,
);
