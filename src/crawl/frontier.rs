// src/crawl/frontier.rs

//! Crawl frontier with built-in duplicate suppression.

use std::collections::{HashSet, VecDeque};

use crate::models::PageUrl;

/// A URL waiting to be rendered, tagged with its discovery depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Normalized URL to render
    pub url: PageUrl,

    /// Link distance from the seed
    pub depth: u32,
}

/// FIFO queue of discovered-but-unvisited URLs.
///
/// The `seen` set covers every URL ever enqueued, queued and visited alike,
/// so the queued-or-visited membership test and the insertion are one
/// check-and-insert. A URL can never enter the queue twice, which keeps the
/// queue and the visited portion disjoint by construction.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    seen: HashSet<PageUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `url` unless it was ever enqueued before.
    ///
    /// Returns whether the URL was accepted.
    pub fn enqueue(&mut self, url: PageUrl, depth: u32) -> bool {
        if self.seen.insert(url.clone()) {
            self.queue.push_back(QueuedUrl { url, depth });
            true
        } else {
            false
        }
    }

    /// Pop the oldest queued URL.
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    /// Whether any URLs are still waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs currently waiting.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Number of distinct URLs ever enqueued.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
