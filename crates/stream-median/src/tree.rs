//! Order-statistics AVL tree
//!
//! Nodes live in an arena (`Vec<Node<T>>`) and refer to their children by
//! index, with freed slots recycled through a free list. Every node carries
//! its subtree height and size, so rank queries descend the tree once in
//! O(log n).
//!
//! Keys are `(value, id)` pairs: values are ordered totally through
//! [`OrderedFloat`] and ties are broken by the sample id, which makes every
//! sample instance addressable even when values repeat.

use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    id: u64,
    left: Option<NodeId>,
    right: Option<NodeId>,
    height: u32,
    size: usize,
}

/// Self-balancing binary search tree annotated with subtree sizes
#[derive(Debug, Clone)]
pub struct OrderStatTree<T> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
}

impl<T: FloatCore> Default for OrderStatTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatCore> OrderStatTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
        }
    }

    /// Number of samples in the tree
    pub fn len(&self) -> usize {
        self.size(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; zero when empty
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Remove every sample and release the arena
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
    }

    /// Insert the sample `id` with the given value
    pub fn insert(&mut self, value: T, id: u64) {
        let root = self.root;
        self.root = Some(self.insert_at(root, value, id));
    }

    /// Remove the sample `id`, returning whether it was present
    ///
    /// Only the node with this exact identity is removed; other samples
    /// holding the same value are left in place.
    pub fn remove(&mut self, value: T, id: u64) -> bool {
        let root = self.root;
        let (root, removed) = self.remove_at(root, value, id);
        self.root = root;
        if self.root.is_none() {
            self.clear();
        }
        removed
    }

    /// Value at the 1-based `rank` in ascending order
    pub fn select(&self, rank: usize) -> Option<T> {
        if rank == 0 || rank > self.len() {
            return None;
        }

        let mut rank = rank;
        let mut cursor = self.root;
        while let Some(n) = cursor {
            let node = &self.nodes[n];
            let left = self.size(node.left);
            match rank.cmp(&(left + 1)) {
                Ordering::Less => cursor = node.left,
                Ordering::Equal => return Some(node.value),
                Ordering::Greater => {
                    rank -= left + 1;
                    cursor = node.right;
                }
            }
        }
        None
    }

    /// Median of the stored samples
    ///
    /// For an odd count this is the value at rank ⌈n/2⌉; for an even count
    /// the mean of ranks n/2 and n/2+1. The upper rank is the in-order
    /// successor of the lower one, which is tracked on the way down so both
    /// come out of a single descent.
    pub fn median(&self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }

        let mut rank = (len + 1) / 2;
        let mut successor = None;
        let mut cursor = self.root;
        while let Some(n) = cursor {
            let node = &self.nodes[n];
            let left = self.size(node.left);
            match rank.cmp(&(left + 1)) {
                Ordering::Less => {
                    successor = Some(node.value);
                    cursor = node.left;
                }
                Ordering::Greater => {
                    rank -= left + 1;
                    cursor = node.right;
                }
                Ordering::Equal => {
                    if len % 2 == 1 {
                        return Some(node.value);
                    }
                    let upper = match node.right {
                        Some(r) => Some(self.leftmost(r)),
                        None => successor,
                    };
                    let two = T::one() + T::one();
                    return upper.map(|upper| (node.value + upper) / two);
                }
            }
        }
        None
    }

    /// Values in ascending order
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::with_capacity(self.height() as usize),
        };
        iter.push_left(self.root);
        iter
    }

    fn key_cmp(value: T, id: u64, node: &Node<T>) -> Ordering {
        OrderedFloat(value)
            .cmp(&OrderedFloat(node.value))
            .then(id.cmp(&node.id))
    }

    fn size(&self, n: Option<NodeId>) -> usize {
        n.map_or(0, |n| self.nodes[n].size)
    }

    fn height_of(&self, n: Option<NodeId>) -> u32 {
        n.map_or(0, |n| self.nodes[n].height)
    }

    fn balance_factor(&self, n: NodeId) -> i64 {
        let node = &self.nodes[n];
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    fn leftmost(&self, mut n: NodeId) -> T {
        while let Some(left) = self.nodes[n].left {
            n = left;
        }
        self.nodes[n].value
    }

    fn update(&mut self, n: NodeId) {
        let (left, right) = (self.nodes[n].left, self.nodes[n].right);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let size = 1 + self.size(left) + self.size(right);
        let node = &mut self.nodes[n];
        node.height = height;
        node.size = size;
    }

    fn alloc(&mut self, value: T, id: u64) -> NodeId {
        let node = Node {
            value,
            id,
            left: None,
            right: None,
            height: 1,
            size: 1,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn rotate_right(&mut self, n: NodeId) -> NodeId {
        let Some(pivot) = self.nodes[n].left else {
            return n;
        };
        self.nodes[n].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(n);
        self.update(n);
        self.update(pivot);
        pivot
    }

    fn rotate_left(&mut self, n: NodeId) -> NodeId {
        let Some(pivot) = self.nodes[n].right else {
            return n;
        };
        self.nodes[n].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(n);
        self.update(n);
        self.update(pivot);
        pivot
    }

    /// Refresh annotations of `n` and restore the AVL property there
    fn rebalance(&mut self, n: NodeId) -> NodeId {
        self.update(n);
        let balance = self.balance_factor(n);

        if balance > 1 {
            if let Some(left) = self.nodes[n].left {
                if self.balance_factor(left) < 0 {
                    let left = self.rotate_left(left);
                    self.nodes[n].left = Some(left);
                }
            }
            return self.rotate_right(n);
        }

        if balance < -1 {
            if let Some(right) = self.nodes[n].right {
                if self.balance_factor(right) > 0 {
                    let right = self.rotate_right(right);
                    self.nodes[n].right = Some(right);
                }
            }
            return self.rotate_left(n);
        }

        n
    }

    fn insert_at(&mut self, n: Option<NodeId>, value: T, id: u64) -> NodeId {
        let Some(n) = n else {
            return self.alloc(value, id);
        };

        if Self::key_cmp(value, id, &self.nodes[n]) == Ordering::Less {
            let child = self.insert_at(self.nodes[n].left, value, id);
            self.nodes[n].left = Some(child);
        } else {
            let child = self.insert_at(self.nodes[n].right, value, id);
            self.nodes[n].right = Some(child);
        }
        self.rebalance(n)
    }

    fn remove_at(&mut self, n: Option<NodeId>, value: T, id: u64) -> (Option<NodeId>, bool) {
        let Some(n) = n else {
            return (None, false);
        };

        match Self::key_cmp(value, id, &self.nodes[n]) {
            Ordering::Less => {
                let (child, removed) = self.remove_at(self.nodes[n].left, value, id);
                if !removed {
                    return (Some(n), false);
                }
                self.nodes[n].left = child;
                (Some(self.rebalance(n)), true)
            }
            Ordering::Greater => {
                let (child, removed) = self.remove_at(self.nodes[n].right, value, id);
                if !removed {
                    return (Some(n), false);
                }
                self.nodes[n].right = child;
                (Some(self.rebalance(n)), true)
            }
            Ordering::Equal => {
                let (left, right) = (self.nodes[n].left, self.nodes[n].right);
                self.free.push(n);
                match (left, right) {
                    (None, None) => (None, true),
                    (Some(child), None) | (None, Some(child)) => (Some(child), true),
                    (Some(left), Some(right)) => {
                        // Successor takes the removed node's place
                        let (rest, successor) = self.detach_min(right);
                        self.nodes[successor].left = Some(left);
                        self.nodes[successor].right = rest;
                        (Some(self.rebalance(successor)), true)
                    }
                }
            }
        }
    }

    /// Unlink the minimum of the subtree at `n`; returns (new subtree, min)
    fn detach_min(&mut self, n: NodeId) -> (Option<NodeId>, NodeId) {
        match self.nodes[n].left {
            None => (self.nodes[n].right, n),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.nodes[n].left = rest;
                (Some(self.rebalance(n)), min)
            }
        }
    }
}

/// In-order iterator over the values of an [`OrderStatTree`]
pub struct Iter<'a, T> {
    tree: &'a OrderStatTree<T>,
    stack: Vec<NodeId>,
}

impl<T> Iter<'_, T> {
    fn push_left(&mut self, mut cursor: Option<NodeId>) {
        while let Some(n) = cursor {
            self.stack.push(n);
            cursor = self.tree.nodes[n].left;
        }
    }
}

impl<T: Copy> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let n = self.stack.pop()?;
        let node = &self.tree.nodes[n];
        let right = node.right;
        let value = node.value;
        self.push_left(right);
        Some(value)
    }
}

impl<T: FloatCore + fmt::Display> OrderStatTree<T> {
    fn render(&self, f: &mut fmt::Formatter<'_>, n: NodeId, prefix: &str, is_tail: bool) -> fmt::Result {
        let node = &self.nodes[n];
        if let Some(right) = node.right {
            let branch = if is_tail { "│   " } else { "    " };
            self.render(f, right, &format!("{prefix}{branch}"), false)?;
        }

        let connector = if is_tail { "└── " } else { "┌── " };
        writeln!(f, "{prefix}{connector}{:.6}", node.value)?;

        if let Some(left) = node.left {
            let branch = if is_tail { "    " } else { "│   " };
            self.render(f, left, &format!("{prefix}{branch}"), true)?;
        }
        Ok(())
    }
}

/// Sideways rendering for diagnostics: right subtree above, left below
impl<T: FloatCore + fmt::Display> fmt::Display for OrderStatTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.render(f, root, "", true),
            None => Ok(()),
        }
    }
}
