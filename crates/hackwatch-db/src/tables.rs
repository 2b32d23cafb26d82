pub use hackwatch_core::HackathonRecord;

#[macro_export]
macro_rules! def_table {
    ($(#[$outer:meta])*
        $name:ident : $k:ty => $v:ty) => {
        #[allow(unused)]
        $(#[$outer])*
        pub mod $name {
            use super::*;
            pub type Key = $k;
            pub type Value = $v;
            pub type Definition<'a> = redb_bincode::TableDefinition<'a, Key, Value>;
            pub trait ReadableTable: redb_bincode::ReadableTable<Key, Value> {}
            impl<RT> ReadableTable for RT where RT: redb_bincode::ReadableTable<Key, Value> {}
            pub type Table<'a> = redb_bincode::Table<'a, Key, Value>;
            pub const TABLE: Definition = redb_bincode::TableDefinition::new(stringify!($name));
        }
    };
}

def_table! {
    /// Tracks database/schema version
    db_version: () => u64
}

def_table! {
    /// Every hackathon ever seen, keyed by title
    ///
    /// Append-only: entries are never overwritten or removed.
    prev_hackathons: String => HackathonRecord
}

def_table! {
    /// Records already stored, but not yet delivered to the endpoint
    pending_notifications: String => HackathonRecord
}
