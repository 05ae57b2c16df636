use crate::api::{Dish, Order};

/// Anything that can live in a [`Store`]
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Dish {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Order {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Ordered in-memory collection of records of one type.
///
/// Records keep their insertion order, which is the order they are listed in. Lookups are linear
/// scans, which is fine for a menu and a handful of orders.
#[derive(Debug, Clone)]
pub struct Store<T> {
    records: Vec<T>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Store {
            records: Vec::new(),
        }
    }
}

impl<T: Record> Store<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from existing records. Records sharing an id with an earlier one are dropped.
    pub fn with_records(records: Vec<T>) -> Self {
        let mut store = Self::new();
        for record in records {
            if !store.contains(record.id()) {
                store.records.push(record);
            }
        }
        store
    }

    /// All the records, in insertion order
    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Append a record at the end of the store.
    ///
    /// The caller is in charge of giving it a fresh id, see [`IdGenerator`]
    pub fn insert(&mut self, record: T) -> &T {
        debug_assert!(!self.contains(record.id()), "duplicate id {}", record.id());
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Apply `merge` to the record with the given id, in place.
    ///
    /// Returns None if there is no such record.
    pub fn update<F>(&mut self, id: &str, merge: F) -> Option<&T>
    where
        F: FnOnce(&mut T),
    {
        let record = self.records.iter_mut().find(|record| record.id() == id)?;
        merge(record);
        Some(record)
    }

    /// Remove the record with the given id, keeping the order of the others
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        Some(self.records.remove(index))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Hands out identifiers for new records.
///
/// This is a monotonic counter rendered as a decimal string. Values already taken in the target
/// store (seed data typically) are skipped.
#[derive(Debug, Default)]
pub struct IdGenerator {
    current_id: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier that is not used in `store`
    pub fn next_id<T: Record>(&mut self, store: &Store<T>) -> String {
        loop {
            self.current_id += 1;
            let id = self.current_id.to_string();
            if !store.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        text: &'static str,
    }

    impl Record for Note {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, text: &'static str) -> Note {
        Note {
            id: id.to_string(),
            text,
        }
    }

    #[test]
    fn test_store() {
        let mut store = Store::new();
        store.insert(note("a", "first"));
        store.insert(note("b", "second"));
        store.insert(note("c", "third"));

        assert_eq!(store.len(), 3);
        assert_eq!(store.find("b").unwrap().text, "second");
        assert!(store.find("z").is_none());

        let updated = store.update("b", |n| n.text = "changed").unwrap();
        assert_eq!(updated.text, "changed");
        assert!(store.update("z", |n| n.text = "nope").is_none());

        assert_eq!(store.remove("a").unwrap().text, "first");
        assert!(store.remove("a").is_none());

        let ids: Vec<_> = store.all().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_with_records_drops_duplicates() {
        let store = Store::with_records(vec![note("1", "a"), note("1", "b"), note("2", "c")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find("1").unwrap().text, "a");
    }

    #[test]
    fn test_id_generator_skips_taken_ids() {
        let store = Store::with_records(vec![note("1", "seed"), note("2", "seed")]);
        let mut ids = IdGenerator::new();

        assert_eq!(ids.next_id(&store), "3");
        assert_eq!(ids.next_id(&store), "4");
    }

    #[test]
    fn test_id_generator_is_monotonic() {
        let mut store = Store::new();
        let mut ids = IdGenerator::new();

        let first = ids.next_id(&store);
        store.insert(note(&first, "x"));
        let second = ids.next_id(&store);
        store.insert(note(&second, "y"));

        assert_ne!(first, second);
        assert!(second.parse::<u64>().unwrap() > first.parse::<u64>().unwrap());
    }
}
