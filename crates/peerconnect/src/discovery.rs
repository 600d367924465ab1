//! The discovery view: search the directory and send connection requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::directory::{Directory, StudentId, StudentRecord};
use crate::notice::Notice;
use crate::store::Store;

/// Free-text search combined with a department filter.
///
/// An empty department matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive search text.
    pub search: String,
    /// Exact department name, or empty for all departments.
    pub department: String,
}

impl SearchFilter {
    /// Create a filter.
    #[must_use]
    pub fn new(search: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            department: department.into(),
        }
    }

    /// Whether the search text occurs in the name, the comma-joined skills
    /// or the comma-joined interests, ignoring case.
    #[must_use]
    pub fn matches_search(&self, student: &StudentRecord) -> bool {
        let needle = self.search.to_lowercase();
        student.name.to_lowercase().contains(&needle)
            || student.skills.join(",").to_lowercase().contains(&needle)
            || student.interests.join(",").to_lowercase().contains(&needle)
    }

    /// Whether the department filter admits the record.
    #[must_use]
    pub fn matches_department(&self, student: &StudentRecord) -> bool {
        self.department.is_empty() || student.department == self.department
    }

    /// Both conditions.
    #[must_use]
    pub fn matches(&self, student: &StudentRecord) -> bool {
        self.matches_search(student) && self.matches_department(student)
    }

    /// Matching records in directory order.
    #[must_use]
    pub fn apply<'d>(&self, directory: &'d Directory) -> Vec<&'d StudentRecord> {
        directory
            .records()
            .iter()
            .filter(|s| self.matches(s))
            .collect()
    }
}

/// Whether the artificial loading delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// The delay is still running.
    Loading,
    /// The list may be shown.
    Ready,
}

/// One-shot timer that flips from loading to ready.
///
/// The timer runs as a tokio task and is aborted when the gate is dropped.
#[derive(Debug)]
pub struct LoadingGate {
    ready: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl LoadingGate {
    /// Start the timer.
    ///
    /// A zero delay is ready immediately. Outside a tokio runtime the timer
    /// cannot run, so the gate is ready immediately as well.
    #[must_use]
    pub fn start(delay: Duration) -> Self {
        let ready = Arc::new(AtomicBool::new(delay.is_zero()));
        if delay.is_zero() {
            return Self { ready, task: None };
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; skipping loading delay");
            ready.store(true, Ordering::SeqCst);
            return Self { ready, task: None };
        };

        let flag = Arc::clone(&ready);
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::SeqCst);
        });
        Self {
            ready,
            task: Some(task),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        if self.is_ready() {
            LoadState::Ready
        } else {
            LoadState::Loading
        }
    }

    /// Whether the delay has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Wait for the delay to elapse.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("loading timer ended early: {e}");
            }
        }
        self.ready.store(true, Ordering::SeqCst);
    }
}

impl Drop for LoadingGate {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            if !self.is_ready() {
                debug!("cancelling loading timer");
            }
            task.abort();
        }
    }
}

/// A displayed student card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryCard<'d> {
    /// The student shown.
    #[serde(flatten)]
    pub student: &'d StudentRecord,
    /// Whether a request was already sent; the button reads "Requested".
    pub requested: bool,
}

/// What the discovery view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryPage<'d> {
    /// The loading indicator.
    Loading,
    /// The filtered list of cards.
    Ready(Vec<DiscoveryCard<'d>>),
}

/// Search the directory and send connection requests.
#[derive(Debug)]
pub struct DiscoveryView<'a> {
    directory: &'a Directory,
    store: &'a mut Store,
    filter: SearchFilter,
    gate: LoadingGate,
    notice: Option<Notice>,
}

impl<'a> DiscoveryView<'a> {
    /// Open the view and start its loading delay.
    pub fn new(directory: &'a Directory, store: &'a mut Store, loading_delay: Duration) -> Self {
        Self {
            directory,
            store,
            filter: SearchFilter::default(),
            gate: LoadingGate::start(loading_delay),
            notice: None,
        }
    }

    /// Loading state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.gate.state()
    }

    /// Wait until the list may be shown.
    pub async fn wait_until_ready(&mut self) {
        self.gate.wait().await;
    }

    /// The active filter.
    #[must_use]
    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    /// Replace the department filter; empty selects all departments.
    pub fn set_department(&mut self, department: impl Into<String>) {
        self.filter.department = department.into();
    }

    /// Department choices for the filter.
    #[must_use]
    pub fn departments(&self) -> Vec<&'a str> {
        self.directory.departments()
    }

    /// Cards for every matching record, regardless of loading state.
    #[must_use]
    pub fn results(&self) -> Vec<DiscoveryCard<'a>> {
        let requests = self.store.requests();
        self.filter
            .apply(self.directory)
            .into_iter()
            .map(|student| DiscoveryCard {
                student,
                requested: requests.contains(student.id),
            })
            .collect()
    }

    /// What to show right now.
    #[must_use]
    pub fn page(&self) -> DiscoveryPage<'a> {
        match self.state() {
            LoadState::Loading => DiscoveryPage::Loading,
            LoadState::Ready => DiscoveryPage::Ready(self.results()),
        }
    }

    /// Whether a request to `id` was already sent.
    #[must_use]
    pub fn is_requested(&self, id: StudentId) -> bool {
        self.store.requests().contains(id)
    }

    /// Send a connection request.
    ///
    /// Sending twice is harmless: the second call writes nothing and says so.
    pub fn connect(&mut self, id: StudentId) -> Notice {
        let notice = match self.directory.require(id) {
            Err(e) => Notice::error(format!("Cannot connect: {e}.")),
            Ok(_) => match self.store.add_request(id) {
                Ok(true) => Notice::success("Connection request sent."),
                Ok(false) => Notice::info("Request already sent."),
                Err(e) => {
                    warn!(%id, "connection request not saved: {e}");
                    Notice::error(format!("Could not send the request: {e}"))
                }
            },
        };
        self.notice = Some(notice.clone());
        notice
    }

    /// The last notice, until dismissed.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Close the notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
