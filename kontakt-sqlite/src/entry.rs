use crate::schema::*;
use chrono::naive::NaiveDateTime;

#[derive(Queryable, Debug)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "entries"]
pub struct NewEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}
