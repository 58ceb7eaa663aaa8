diesel::table! {
    tickets (id) {
        id -> Int4,
        title -> Varchar,
        description -> Text,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Int4,
        ticket_id -> Nullable<Int4>,
        role -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(messages -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(tickets, messages);
