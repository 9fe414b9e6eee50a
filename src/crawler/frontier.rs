use std::collections::{HashSet, VecDeque};

/// URLs discovered but not yet dispatched
///
/// The queue hands URLs out roughly in discovery order, but no caller may
/// rely on that: workers finish in arbitrary order and feed new links back
/// concurrently, so the overall visit order of a crawl is unspecified.
/// Membership is exact; removal is lazy (a removed URL stays queued until
/// `pop` skips over it).
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    pending: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL; returns false if it was already pending
    pub fn push(&mut self, url: String) -> bool {
        if self.pending.insert(url.clone()) {
            self.queue.push_back(url);
            true
        } else {
            false
        }
    }

    /// Takes the next pending URL
    pub fn pop(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            if self.pending.remove(&url) {
                return Some(url);
            }
        }
        None
    }

    /// Drops a URL from the pending set; returns true if it was pending
    pub fn remove(&mut self, url: &str) -> bool {
        self.pending.remove(url)
    }

    /// Returns true if the URL is pending
    pub fn contains(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    /// Number of pending URLs
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
