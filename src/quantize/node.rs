//! Boxes awaiting a split decision

use std::cmp::Ordering;

use log::trace;

use crate::color::statistics::{dispersion, dispersion_about, extents, weighted_mean, Sample};

/// Immutable summary of a box of samples
///
/// Every derived field is computed once in [`Node::new`], so nodes built
/// from equal boxes are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    samples: Vec<Sample>,
    /// Weighted mean color
    pub mean: [f64; 3],
    /// Per-channel `(min, max)`
    pub extents: [(f64, f64); 3],
    /// Total weight
    pub weight: f64,
    /// Squared-weight variance around `mean`
    pub dispersion: f64,
}

/// Result of trying to split a node
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    /// Both sides of the best threshold are non-empty
    Pair { low: Node, high: Node },
    /// No useful threshold exists
    Leaf(Node),
}

impl Node {
    pub fn new(samples: Vec<Sample>) -> Self {
        let (mean, weight) = weighted_mean(&samples);
        let dispersion = dispersion_about(&samples, mean, weight);
        let extents = extents(&samples);
        Self {
            samples,
            mean,
            extents,
            weight,
            dispersion,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Channel with the widest extent, lowest index on ties
    pub fn split_axis(&self) -> usize {
        let mut axis = 0;
        let mut widest = self.extents[0].1 - self.extents[0].0;
        for (channel, (min, max)) in self.extents.iter().enumerate().skip(1) {
            if max - min > widest {
                widest = max - min;
                axis = channel;
            }
        }
        axis
    }

    /// Distinct values of `axis` in first-appearance order
    fn candidates(&self, axis: usize) -> Vec<f64> {
        let mut values: Vec<f64> = Vec::new();
        for sample in &self.samples {
            let v = sample.rgb[axis];
            if !values.contains(&v) {
                values.push(v);
            }
        }
        values
    }

    /// Threshold minimizing the cubic dispersion cost, first minimum on ties
    ///
    /// A side with zero dispersion forces the cost to `f64::MAX`.
    pub fn best_threshold(&self, axis: usize) -> Option<f64> {
        let mut low = Vec::with_capacity(self.samples.len());
        let mut high = Vec::with_capacity(self.samples.len());
        let mut best: Option<(f64, f64)> = None;

        for k in self.candidates(axis) {
            self.partition_into(axis, k, &mut low, &mut high);
            let (e_low, e_high) = (dispersion(&low), dispersion(&high));
            let cost = if e_low == 0.0 || e_high == 0.0 {
                f64::MAX
            } else {
                e_low.powi(3) + e_high.powi(3)
            };

            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((k, cost)),
            }
        }

        best.map(|(k, _)| k)
    }

    fn partition_into(&self, axis: usize, k: f64, low: &mut Vec<Sample>, high: &mut Vec<Sample>) {
        low.clear();
        high.clear();
        for sample in &self.samples {
            if sample.rgb[axis] < k {
                low.push(*sample);
            } else {
                high.push(*sample);
            }
        }
    }

    /// Split along the widest channel at the cheapest threshold
    pub fn split(self) -> Split {
        let axis = self.split_axis();
        let Some(k) = self.best_threshold(axis) else {
            return Split::Leaf(self);
        };

        let (low, high): (Vec<Sample>, Vec<Sample>) =
            self.samples.iter().partition(|s| s.rgb[axis] < k);
        if low.is_empty() || high.is_empty() {
            trace!(
                "Keeping box of {} samples (dispersion {:.6}): channel {} at {} leaves one side empty",
                self.samples.len(),
                self.dispersion,
                axis,
                k
            );
            return Split::Leaf(self);
        }

        trace!(
            "Splitting box of {} samples (dispersion {:.6}) on channel {} at {}: {} / {}",
            self.samples.len(),
            self.dispersion,
            axis,
            k,
            low.len(),
            high.len()
        );
        Split::Pair {
            low: Node::new(low),
            high: Node::new(high),
        }
    }
}

/// Queue entry: max dispersion first, then earliest insertion
#[derive(Debug)]
pub(crate) struct Queued {
    pub node: Node,
    pub seq: u64,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.node
            .dispersion
            .total_cmp(&other.node.dispersion)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn sample(r: f64, g: f64, b: f64, weight: f64) -> Sample {
        Sample::new([r, g, b], weight)
    }

    #[test]
    fn test_node_fields() {
        let node = Node::new(vec![sample(1.0, 0.0, 0.0, 1.0), sample(0.0, 0.0, 1.0, 1.0)]);
        assert_eq!(node.weight, 2.0);
        assert_eq!(node.mean, [0.5, 0.0, 0.5]);
        assert!((node.dispersion - 0.5).abs() < 1e-12);
        assert_eq!(node.extents, [(0.0, 1.0), (0.0, 0.0), (0.0, 1.0)]);
    }

    #[test]
    fn test_equal_boxes_give_equal_nodes() {
        let samples = vec![sample(0.2, 0.3, 0.4, 0.5), sample(0.9, 0.1, 0.0, 2.0)];
        assert_eq!(Node::new(samples.clone()), Node::new(samples));
    }

    #[test]
    fn test_split_axis_prefers_lowest_index_on_ties() {
        let node = Node::new(vec![sample(0.0, 0.2, 0.0, 1.0), sample(0.5, 0.7, 0.1, 1.0)]);
        assert_eq!(node.split_axis(), 0);

        let node = Node::new(vec![sample(0.0, 0.0, 0.0, 1.0), sample(0.1, 0.2, 0.9, 1.0)]);
        assert_eq!(node.split_axis(), 2);
    }

    #[test]
    fn test_two_colors_split_apart() {
        let node = Node::new(vec![sample(1.0, 0.0, 0.0, 1.0), sample(0.0, 0.0, 1.0, 1.0)]);
        // Every candidate costs f64::MAX, so the first one wins
        assert_eq!(node.best_threshold(0), Some(1.0));

        match node.split() {
            Split::Pair { low, high } => {
                assert_eq!(low.mean, [0.0, 0.0, 1.0]);
                assert_eq!(high.mean, [1.0, 0.0, 0.0]);
            }
            other => panic!("Expected Pair, got: {:?}", other),
        }
    }

    #[test]
    fn test_single_sample_is_leaf() {
        let node = Node::new(vec![sample(0.4, 0.4, 0.1, 3.0)]);
        assert!(matches!(node.split(), Split::Leaf(_)));
    }

    #[test]
    fn test_cubic_cost_picks_natural_gap() {
        // Two tight clusters on the red channel
        let samples = vec![
            sample(0.10, 0.0, 0.0, 1.0),
            sample(0.80, 0.0, 0.0, 1.0),
            sample(0.12, 0.0, 0.0, 1.0),
            sample(0.82, 0.0, 0.0, 1.0),
            sample(0.11, 0.0, 0.0, 1.0),
        ];
        let node = Node::new(samples);
        assert_eq!(node.best_threshold(0), Some(0.8));
    }

    #[test]
    fn test_split_conserves_weight() {
        let samples: Vec<Sample> = (0..20)
            .map(|i| {
                let t = i as f64 / 20.0;
                // Quarter weights keep every partial sum exact
                sample(t, 1.0 - t, (t * 3.0) % 1.0, 0.25 * (1 + i % 4) as f64)
            })
            .collect();
        let parent = Node::new(samples);
        let total = parent.weight;
        let count = parent.samples().len();

        match parent.split() {
            Split::Pair { low, high } => {
                assert_eq!(low.weight + high.weight, total);
                assert_eq!(low.samples().len() + high.samples().len(), count);
            }
            other => panic!("Expected Pair, got: {:?}", other),
        }
    }

    #[test]
    fn test_queue_order() {
        let wide = Node::new(vec![sample(1.0, 0.0, 0.0, 1.0), sample(0.0, 0.0, 1.0, 1.0)]);
        let flat = Node::new(vec![sample(0.5, 0.5, 0.0, 1.0)]);

        let mut heap = BinaryHeap::new();
        heap.push(Queued { node: flat.clone(), seq: 0 });
        heap.push(Queued { node: wide, seq: 1 });
        heap.push(Queued { node: flat, seq: 2 });

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop()).map(|q| q.seq).collect();
        assert_eq!(order, vec![1, 0, 2]);
    }
}
