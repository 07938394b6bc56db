//! Work queue for the traversal
//!
//! The frontier replaces call-stack recursion with an explicit queue so deep or wide
//! sites cannot exhaust the stack. Depth-first pops LIFO, breadth-first pops FIFO.

use crate::config::TraversalOrder;
use std::collections::VecDeque;
use url::Url;

/// A URL waiting to be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: Url,

    /// Number of link hops from the seed
    pub depth: u32,
}

/// Pending URLs, drained in the configured order
#[derive(Debug)]
pub struct Frontier {
    order: TraversalOrder,
    queue: VecDeque<QueuedUrl>,
}

impl Frontier {
    pub fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            queue: VecDeque::new(),
        }
    }

    /// Adds a single URL
    pub fn push(&mut self, item: QueuedUrl) {
        self.queue.push_back(item);
    }

    /// Adds the children of one page, preserving document order on the way out
    ///
    /// For depth-first the batch is pushed in reverse so the first link is the next
    /// one popped.
    pub fn push_children(&mut self, children: Vec<QueuedUrl>) {
        match self.order {
            TraversalOrder::DepthFirst => self.queue.extend(children.into_iter().rev()),
            TraversalOrder::BreadthFirst => self.queue.extend(children),
        }
    }

    /// Gets the next URL to process
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        match self.order {
            TraversalOrder::DepthFirst => self.queue.pop_back(),
            TraversalOrder::BreadthFirst => self.queue.pop_front(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
