//! Bounded top-k selection over scored candidates.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::index::exact::Neighbor;
use crate::vector::distance::Polarity;

/// A candidate in the heap. Greater means ranked worse, so the max-heap root
/// is always the worst retained candidate.
#[derive(Debug, Clone, Copy)]
struct RankedNeighbor {
    neighbor: Neighbor,
    polarity: Polarity,
}

impl RankedNeighbor {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.polarity
            .compare(self.neighbor.distance, other.neighbor.distance)
            .then_with(|| self.neighbor.id.cmp(&other.neighbor.id))
    }
}

impl PartialEq for RankedNeighbor {
    fn eq(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedNeighbor {}

impl PartialOrd for RankedNeighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedNeighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank_cmp(other)
    }
}

/// Keeps the `top_k` best candidates seen so far in O(log k) per candidate.
///
/// For a distance metric the heap behaves as a max-heap on distance, for a
/// similarity metric as a min-heap on score. Equal scores rank by ascending id.
#[derive(Debug)]
pub struct TopKCollector {
    top_k: usize,
    polarity: Polarity,
    heap: BinaryHeap<RankedNeighbor>,
}

impl TopKCollector {
    /// Create a collector retaining at most `top_k` candidates.
    pub fn new(top_k: usize, polarity: Polarity) -> Self {
        Self {
            top_k,
            polarity,
            heap: BinaryHeap::with_capacity(top_k.saturating_add(1)),
        }
    }

    /// Offer a candidate.
    pub fn collect(&mut self, id: usize, distance: f32) {
        if self.top_k == 0 {
            return;
        }

        let candidate = RankedNeighbor {
            neighbor: Neighbor { distance, id },
            polarity: self.polarity,
        };

        if self.heap.len() < self.top_k {
            self.heap.push(candidate);
        } else if let Some(worst) = self.heap.peek() {
            if candidate < *worst {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    /// Drain into relevance order, best first.
    pub fn into_sorted(self) -> Vec<Neighbor> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|r| r.neighbor)
            .collect()
    }
}
