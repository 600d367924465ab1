//! The connections view: students the user has connected with.

use tracing::warn;

use crate::directory::{Directory, StudentId, StudentRecord};
use crate::notice::Notice;
use crate::store::Store;

/// Shown when there are no connections.
pub const EMPTY_MESSAGE: &str =
    "You have no connections yet. Connect with students from the Browse tab!";

/// Directory records joined with the stored request set.
#[derive(Debug)]
pub struct ConnectionsView<'a> {
    directory: &'a Directory,
    store: &'a mut Store,
}

impl<'a> ConnectionsView<'a> {
    /// Open the view.
    pub fn new(directory: &'a Directory, store: &'a mut Store) -> Self {
        Self { directory, store }
    }

    /// Connected students in directory order.
    ///
    /// Stored ids with no directory record are skipped.
    #[must_use]
    pub fn connections(&self) -> Vec<&'a StudentRecord> {
        connected_students(self.directory, self.store)
    }

    /// Number of connected students.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections().len()
    }

    /// Whether the empty-state message should be shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections().is_empty()
    }

    /// Remove a connection and persist the set.
    pub fn remove(&mut self, id: StudentId) -> Notice {
        match self.store.remove_request(id) {
            Ok(true) => Notice::success("Connection removed."),
            Ok(false) => Notice::info(format!("Not connected to student {id}.")),
            Err(e) => {
                warn!(%id, "connection not removed: {e}");
                Notice::error(format!("Could not remove the connection: {e}"))
            }
        }
    }
}

/// Directory records whose ids are in the store's request set.
#[must_use]
pub fn connected_students<'d>(directory: &'d Directory, store: &Store) -> Vec<&'d StudentRecord> {
    directory.join(store.requests().ids())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::store::REQUESTS_KEY;

    fn store_with_requests(json: &str) -> Store {
        let storage = Storage::open_in_memory().unwrap();
        storage.set_item(REQUESTS_KEY, json).unwrap();
        Store::load(storage).unwrap()
    }

    fn names(view: &ConnectionsView<'_>) -> Vec<String> {
        view.connections().iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_requests_two_and_four() {
        let directory = Directory::canonical();
        let mut store = store_with_requests("[2,4]");
        let view = ConnectionsView::new(&directory, &mut store);

        assert_eq!(names(&view), vec!["Bob Smith", "David Lee"]);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_join_follows_directory_order() {
        let directory = Directory::canonical();
        let mut store = store_with_requests("[4,1,3]");
        let view = ConnectionsView::new(&directory, &mut store);

        assert_eq!(names(&view), vec!["Alice Johnson", "Carol White", "David Lee"]);
    }

    #[test]
    fn test_unknown_ids_skipped() {
        let directory = Directory::canonical();
        let mut store = store_with_requests("[42,2]");
        let view = ConnectionsView::new(&directory, &mut store);

        assert_eq!(names(&view), vec!["Bob Smith"]);
    }

    #[test]
    fn test_empty_state() {
        let directory = Directory::canonical();
        let mut store = Store::load(Storage::open_in_memory().unwrap()).unwrap();
        let view = ConnectionsView::new(&directory, &mut store);

        assert!(view.is_empty());
    }

    #[test]
    fn test_remove_twice() {
        let directory = Directory::canonical();
        let mut store = store_with_requests("[2,4]");
        let mut view = ConnectionsView::new(&directory, &mut store);

        assert_eq!(view.remove(StudentId(2)), Notice::success("Connection removed."));
        assert!(!view.remove(StudentId(2)).is_error());
        assert_eq!(names(&view), vec!["David Lee"]);
        drop(view);

        store.reload().unwrap();
        assert_eq!(store.requests().ids(), &[StudentId(4)]);
    }

    #[test]
    fn test_remove_write_failure() {
        let directory = Directory::canonical();
        let mut store = store_with_requests("[2]");
        store.storage().make_read_only();
        let mut view = ConnectionsView::new(&directory, &mut store);

        assert!(view.remove(StudentId(2)).is_error());
        assert_eq!(view.len(), 1);
    }
}
