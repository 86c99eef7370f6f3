//! Diesel table definitions for the scheduling schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Members mirrored from the membership subsystem.
    members (id) {
        id -> Uuid,
        full_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named work plans owning dated slots.
    schedules (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        /// `weekly`, `monthly`, `event`, or `permanent`.
        kind -> Varchar,
        category -> Varchar,
        start_date -> Date,
        end_date -> Nullable<Date>,
        is_recurring -> Bool,
        /// Serialised recurrence hint; never used for generation.
        recurring_pattern -> Nullable<Jsonb>,
        territory_scope -> Nullable<Varchar>,
        /// `draft`, `active`, `completed`, or `cancelled`.
        status -> Varchar,
        color -> Nullable<Varchar>,
        created_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Concrete dated shifts. Status is derived; only the cancel override is
    /// stored.
    slots (id) {
        id -> Uuid,
        schedule_id -> Uuid,
        name -> Varchar,
        date -> Date,
        start_time -> Time,
        end_time -> Time,
        location -> Nullable<Varchar>,
        location_details -> Nullable<Text>,
        max_participants -> Int4,
        min_participants -> Int4,
        notes -> Nullable<Text>,
        is_cancelled -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Member-to-slot bookings.
    assignments (id) {
        id -> Uuid,
        slot_id -> Uuid,
        member_id -> Uuid,
        assigned_by -> Nullable<Uuid>,
        role -> Varchar,
        status -> Varchar,
        confirmed_at -> Nullable<Timestamptz>,
        decline_reason -> Nullable<Text>,
        check_in_at -> Nullable<Timestamptz>,
        check_out_at -> Nullable<Timestamptz>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recurring weekly availability rules.
    member_availability (id) {
        id -> Uuid,
        member_id -> Uuid,
        /// 0 = Sunday through 6 = Saturday.
        day_of_week -> Int2,
        start_time -> Time,
        end_time -> Time,
        is_available -> Bool,
        valid_from -> Nullable<Date>,
        valid_until -> Nullable<Date>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Date-specific availability overrides.
    schedule_exceptions (id) {
        id -> Uuid,
        member_id -> Uuid,
        date -> Date,
        /// `available` or `unavailable`.
        kind -> Varchar,
        start_time -> Nullable<Time>,
        end_time -> Nullable<Time>,
        reason -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(slots -> schedules (schedule_id));
diesel::joinable!(assignments -> slots (slot_id));
diesel::joinable!(assignments -> members (member_id));
diesel::joinable!(member_availability -> members (member_id));
diesel::joinable!(schedule_exceptions -> members (member_id));

diesel::allow_tables_to_appear_in_same_query!(
    members,
    schedules,
    slots,
    assignments,
    member_availability,
    schedule_exceptions,
);
