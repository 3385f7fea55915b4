use std::sync::RwLock;

use ledgerdesk_core::Entity;

use super::Repository;

/// In-memory repository: a `Vec` behind a lock, scanned linearly.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    inner: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Entity + Clone + Send + Sync + 'static,
{
    fn get(&self, id: &T::Id) -> Option<T> {
        let items = self.inner.read().ok()?;
        items.iter().find(|item| item.id() == id).cloned()
    }

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Option<T> {
        let items = self.inner.read().ok()?;
        items.iter().find(|item| predicate(item)).cloned()
    }

    fn list(&self) -> Vec<T> {
        match self.inner.read() {
            Ok(items) => items.clone(),
            Err(_) => vec![],
        }
    }

    fn insert(&self, value: T) -> bool {
        match self.inner.write() {
            Ok(mut items) => {
                items.push(value);
                true
            }
            Err(_) => false,
        }
    }

    fn replace(&self, value: T) -> Option<T> {
        let mut items = self.inner.write().ok()?;
        let slot = items.iter_mut().find(|item| item.id() == value.id())?;
        Some(std::mem::replace(slot, value))
    }

    fn replace_all(&self, values: Vec<T>) -> bool {
        let Ok(mut items) = self.inner.write() else {
            return false;
        };
        let mut slots = Vec::with_capacity(values.len());
        for value in &values {
            match items.iter().position(|item| item.id() == value.id()) {
                Some(idx) => slots.push(idx),
                None => return false,
            }
        }
        for (idx, value) in slots.into_iter().zip(values) {
            items[idx] = value;
        }
        true
    }

    fn len(&self) -> usize {
        self.inner.read().map(|items| items.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u32,
        text: &'static str,
    }

    impl Entity for Note {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    #[test]
    fn list_preserves_insertion_order() {
        let repo = InMemoryRepository::new();
        repo.insert(Note { id: 3, text: "c" });
        repo.insert(Note { id: 1, text: "a" });
        repo.insert(Note { id: 2, text: "b" });
        let ids: Vec<u32> = repo.list().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn replace_keeps_position_and_ignores_unknown_ids() {
        let repo = InMemoryRepository::new();
        repo.insert(Note { id: 1, text: "a" });
        repo.insert(Note { id: 2, text: "b" });

        let previous = repo.replace(Note { id: 1, text: "z" });
        assert_eq!(previous.map(|n| n.text), Some("a"));
        assert_eq!(repo.list()[0].text, "z");

        assert!(repo.replace(Note { id: 9, text: "?" }).is_none());
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn replace_all_is_all_or_nothing() {
        let repo = InMemoryRepository::new();
        repo.insert(Note { id: 1, text: "a" });
        repo.insert(Note { id: 2, text: "b" });

        let applied = repo.replace_all(vec![Note { id: 2, text: "y" }, Note { id: 9, text: "?" }]);
        assert!(!applied);
        assert_eq!(repo.list(), vec![Note { id: 1, text: "a" }, Note { id: 2, text: "b" }]);

        assert!(repo.replace_all(vec![Note { id: 2, text: "y" }, Note { id: 1, text: "x" }]));
        let texts: Vec<_> = repo.list().iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["x", "y"]);
    }

    #[test]
    fn insert_reports_a_poisoned_lock() {
        let repo = std::sync::Arc::new(InMemoryRepository::new());
        assert!(repo.insert(Note { id: 1, text: "a" }));

        let poisoner = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(!repo.insert(Note { id: 2, text: "b" }));
        assert!(!repo.replace_all(vec![Note { id: 1, text: "z" }]));
    }

    #[test]
    fn find_returns_first_match() {
        let repo = InMemoryRepository::new();
        repo.insert(Note { id: 1, text: "same" });
        repo.insert(Note { id: 2, text: "same" });
        assert_eq!(repo.find(&|n: &Note| n.text == "same").map(|n| n.id), Some(1));
        assert!(repo.get(&5).is_none());
    }

    fn count_via<R: Repository<Note>>(repo: &R) -> usize {
        repo.len()
    }

    #[test]
    fn shared_handles_see_the_same_records() {
        let repo = std::sync::Arc::new(InMemoryRepository::new());
        let other = repo.clone();
        other.insert(Note { id: 1, text: "a" });

        assert_eq!(count_via(&repo), 1);
        assert!(!repo.is_empty());
    }
}
