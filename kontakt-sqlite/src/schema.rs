table! {
    entries (key) {
        key -> Text,
        value -> Text,
        updated_at -> Timestamp,
    }
}
