// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    admin_sessions (id) {
        id -> BigInt,
        admin_user_id -> BigInt,
        token -> Text,
        expires_at -> Text,
    }
}

diesel::table! {
    admin_users (id) {
        id -> BigInt,
        email -> Text,
        password_hash -> Text,
        salt -> Text,
    }
}

diesel::table! {
    employees (id) {
        id -> BigInt,
        name -> Text,
    }
}

diesel::table! {
    locations (id) {
        id -> BigInt,
        name -> Text,
    }
}

diesel::table! {
    step_entries (id) {
        id -> BigInt,
        employee_id -> BigInt,
        location_id -> Nullable<BigInt>,
        entry_date -> Text,
        steps -> Integer,
    }
}

diesel::joinable!(admin_sessions -> admin_users (admin_user_id));
diesel::joinable!(step_entries -> employees (employee_id));

diesel::allow_tables_to_appear_in_same_query!(
    admin_sessions,
    admin_users,
    employees,
    locations,
    step_entries,
);

diesel::allow_columns_to_appear_in_same_group_by_clause!(step_entries::entry_date, locations::name,);
