//! Ordered entity container with stable handles
//!
//! Every entity collection in the game (snake body, food, element food) lives in an
//! [`EntityList`]. Nodes are stored in a [`SlotMap`] and linked in both directions,
//! so insertion at either end and removal by handle are O(1) while traversal keeps
//! the order in which nodes were linked.
//!
//! Handles are versioned keys: once a node is removed its [`NodeId`] stops
//! resolving, even after the slot is recycled for a new node.

use std::iter::FusedIterator;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable handle to a node of an [`EntityList`]
    pub struct NodeId;
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Doubly linked list over a slot map
#[derive(Debug, Clone)]
pub struct EntityList<T> {
    nodes: SlotMap<NodeId, Node<T>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> EntityList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Link `value` in front of the current first node
    pub fn push_front(&mut self, value: T) -> NodeId {
        let old_head = self.head;
        let id = self.nodes.insert(Node {
            value,
            prev: None,
            next: old_head,
        });

        match old_head.and_then(|h| self.nodes.get_mut(h)) {
            Some(node) => node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    /// Link `value` after the current last node
    pub fn push_back(&mut self, value: T) -> NodeId {
        let old_tail = self.tail;
        let id = self.nodes.insert(Node {
            value,
            prev: old_tail,
            next: None,
        });

        match old_tail.and_then(|t| self.nodes.get_mut(t)) {
            Some(node) => node.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Unlink the node behind `id` and hand back its value.
    ///
    /// A stale or foreign handle returns `None` and leaves the list untouched.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let node = self.nodes.remove(id)?;

        match node.prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|n| self.nodes.get_mut(n)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }

        Some(node.value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// True if `id` still refers to a linked node of this list
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|n| &mut n.value)
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|h| self.get(h))
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|t| self.get(t))
    }

    pub fn front_id(&self) -> Option<NodeId> {
        self.head
    }

    pub fn back_id(&self) -> Option<NodeId> {
        self.tail
    }

    /// True if `id` is the first node in traversal order
    pub fn is_first(&self, id: NodeId) -> bool {
        self.contains(id) && self.head == Some(id)
    }

    /// True if `id` is the last node in traversal order
    pub fn is_last(&self, id: NodeId) -> bool {
        self.contains(id) && self.tail == Some(id)
    }

    /// Front-to-back traversal; call `.rev()` for back-to-front
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.iter_with_ids().map(|(_, value)| value)
    }

    pub fn iter_with_ids(&self) -> IterWithIds<'_, T> {
        IterWithIds {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len(),
        }
    }

    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.iter_with_ids().map(|(id, _)| id)
    }

    /// First node (front-to-back) whose value satisfies `pred`
    pub fn find<P>(&self, mut pred: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter_with_ids()
            .find(|(_, value)| pred(value))
            .map(|(id, _)| id)
    }

    /// Visit every node front to back, unlinking those for which `keep` returns
    /// false. The successor is read before `keep` runs, so dropping the node under
    /// the cursor never disturbs the walk.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(NodeId, &mut T) -> bool,
    {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get_mut(id) else {
                break;
            };
            cursor = node.next;
            if !keep(id, &mut node.value) {
                self.remove(id);
            }
        }
    }

    /// Unlink every node front to back, yielding the values
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { list: self }
    }

    /// Unlink every node. Handles issued before the call stop resolving.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for EntityList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = EntityList::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

/// Traversal yielding each node's handle alongside its value
pub struct IterWithIds<'a, T> {
    list: &'a EntityList<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for IterWithIds<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = self.list.nodes.get(id)?;
        self.front = node.next;
        self.remaining -= 1;
        Some((id, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterWithIds<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = self.list.nodes.get(id)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((id, &node.value))
    }
}

impl<T> ExactSizeIterator for IterWithIds<'_, T> {}

impl<T> FusedIterator for IterWithIds<'_, T> {}

pub struct Drain<'a, T> {
    list: &'a mut EntityList<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<T: Clone>(list: &EntityList<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_new_list_is_empty() {
        let list: EntityList<u32> = EntityList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.front().is_none());
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_push_front_and_back_order() {
        let mut list = EntityList::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        list.push_front(0);

        assert_eq!(collect(&list), vec![0, 1, 2, 3]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert_eq!(list.front(), Some(&0));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_remove_middle_relinks_neighbours() {
        let mut list = EntityList::new();
        let _a = list.push_back('a');
        let b = list.push_back('b');
        let _c = list.push_back('c');

        assert_eq!(list.remove(b), Some('b'));
        assert_eq!(collect(&list), vec!['a', 'c']);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec!['c', 'a']);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_ends_updates_first_and_last() {
        let mut list = EntityList::new();
        let a = list.push_back(1);
        let b = list.push_back(2);
        let c = list.push_back(3);

        assert!(list.is_first(a));
        assert!(list.is_last(c));

        list.remove(a);
        assert!(list.is_first(b));
        list.remove(c);
        assert!(list.is_first(b));
        assert!(list.is_last(b));

        list.remove(b);
        assert!(list.is_empty());
        assert!(list.front_id().is_none());
        assert!(list.back_id().is_none());
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut list = EntityList::new();
        let old = list.push_back(10);
        assert_eq!(list.remove(old), Some(10));

        // The slot gets recycled but the old handle must not alias it
        let new = list.push_back(20);
        assert_ne!(old, new);
        assert!(!list.contains(old));
        assert_eq!(list.get(old), None);
        assert_eq!(list.remove(old), None);
        assert_eq!(list.get(new), Some(&20));
        assert_eq!(list.len(), 1);

        // The null key never resolves
        assert!(!list.contains(NodeId::default()));
        assert_eq!(list.remove(NodeId::default()), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_retain_removes_current_node_safely() {
        let mut list: EntityList<u32> = (0..10).collect();
        list.retain(|_, v| *v % 3 != 0);
        assert_eq!(collect(&list), vec![1, 2, 4, 5, 7, 8]);
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_retain_can_mutate_kept_values() {
        let mut list: EntityList<u32> = (1..=4).collect();
        list.retain(|_, v| {
            *v *= 10;
            true
        });
        assert_eq!(collect(&list), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_drain_empties_in_order() {
        let mut list: EntityList<u32> = (0..5).collect();
        let drained: Vec<_> = list.drain().collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(list.is_empty());
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut list = EntityList::new();
        let ids: Vec<_> = (0..3).map(|v| list.push_back(v)).collect();
        list.clear();
        assert!(list.is_empty());
        for id in ids {
            assert!(!list.contains(id));
        }
        let fresh = list.push_front(99);
        assert_eq!(list.get(fresh), Some(&99));
    }

    #[test]
    fn test_find_and_get_mut() {
        let mut list: EntityList<u32> = (0..5).collect();
        let id = list.find(|v| *v == 3).unwrap();
        *list.get_mut(id).unwrap() = 30;
        assert_eq!(collect(&list), vec![0, 1, 2, 30, 4]);
        assert!(list.find(|v| *v == 99).is_none());
    }

    #[test]
    fn test_pop_both_ends() {
        let mut list: EntityList<u32> = (0..3).collect();
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_front(), Some(0));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn test_double_ended_iteration_meets_in_middle() {
        let list: EntityList<u32> = (0..4).collect();
        let mut iter = list.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_len_matches_traversal_after_churn() {
        let mut list = EntityList::new();
        let mut ids = Vec::new();
        for i in 0..20 {
            if i % 2 == 0 {
                ids.push(list.push_back(i));
            } else {
                ids.push(list.push_front(i));
            }
        }
        for id in ids.iter().step_by(3) {
            list.remove(*id);
        }
        assert_eq!(list.len(), list.iter().count());
        assert_eq!(list.len(), list.iter().rev().count());
    }
}
