use crate::arena::{Arena, NodeId};
use crate::node::{Color, Node};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// An ordered multiset implemented as a red black tree.
///
/// A red black tree is a self-balancing binary search tree that uses a color
/// bit per node to keep the tree approximately balanced: no path from the root
/// to a leaf is more than twice as long as any other, so every operation runs
/// in O(log n) time. Nodes live in an index-addressed arena and link to each
/// other by id, with freed slots recycled on later insertions.
///
/// Duplicate values are allowed. A value that compares equal to an existing
/// node is inserted into that node's right subtree.
///
/// # Examples
///
/// ```
/// use rubytree::RubyTree;
///
/// let mut tree = RubyTree::new();
/// tree.insert(0);
/// tree.insert(3);
/// tree.insert(3);
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.get(&3), Some(&3));
///
/// assert_eq!(tree.remove(&3), Some(3));
/// assert!(tree.contains(&3));
///
/// assert_eq!(tree.remove(&7), None);
/// ```
pub struct RubyTree<T> {
    arena: Arena<Node<T>>,
    root: Option<NodeId>,
}

impl<T> RubyTree<T> {
    /// Constructs a new, empty `RubyTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let tree: RubyTree<u32> = RubyTree::new();
    /// ```
    pub fn new() -> Self {
        RubyTree {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a value into the tree. Duplicates are kept; a value comparing
    /// equal to an existing node goes into that node's right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let mut tree = RubyTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        let mut parent = None;
        let mut current = self.root;
        while let Some(id) = current {
            parent = Some(id);
            let node = &self.arena[id];
            current = if value < node.value {
                node.left
            } else {
                node.right
            };
        }

        let mut node = Node::new(value);
        node.parent = parent;
        let id = self.arena.allocate(node);

        match parent {
            None => self.root = Some(id),
            Some(parent_id) => {
                if self.arena[id].value < self.arena[parent_id].value {
                    self.arena[parent_id].left = Some(id);
                } else {
                    self.arena[parent_id].right = Some(id);
                }
            }
        }

        self.insert_fixup(id);
    }

    /// Removes one node with a matching value from the tree, returning its
    /// value. Returns `None` if no value in the tree compares equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let mut tree = RubyTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, value: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find_node(value).map(|id| self.remove_node(id))
    }

    /// Returns a reference to a value in the tree that compares equal to a
    /// particular value. Returns `None` if such a value does not exist. When
    /// the tree holds several equal values, any one of them may be returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let mut tree = RubyTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.get(&1), Some(&1));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    pub fn get<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find_node(value).map(|id| &self.arena[id].value)
    }

    /// Checks if a value exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let mut tree = RubyTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains<V>(&self, value: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find_node(value).is_some()
    }

    /// Returns the number of values in the tree in O(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let mut tree = RubyTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let tree: RubyTree<u32> = RubyTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Clears the tree, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::RubyTree;
    ///
    /// let mut tree = RubyTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// tree.clear();
    /// assert_eq!(tree.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    fn find_node<V>(&self, value: &V) -> Option<NodeId>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            match value.cmp(node.value.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Some(id),
            }
        }
        None
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        match id {
            Some(id) => self.arena[id].color == Color::Red,
            None => false,
        }
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.arena[x].right.expect("Expected right child node during rotation.");
        let y_left = self.arena[y].left;
        self.arena[x].right = y_left;
        if let Some(child) = y_left {
            self.arena[child].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(parent) => {
                if self.arena[parent].left == Some(x) {
                    self.arena[parent].left = Some(y);
                } else {
                    self.arena[parent].right = Some(y);
                }
            }
        }

        self.arena[y].left = Some(x);
        self.arena[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.arena[x].left.expect("Expected left child node during rotation.");
        let y_right = self.arena[y].right;
        self.arena[x].left = y_right;
        if let Some(child) = y_right {
            self.arena[child].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(parent) => {
                if self.arena[parent].right == Some(x) {
                    self.arena[parent].right = Some(y);
                } else {
                    self.arena[parent].left = Some(y);
                }
            }
        }

        self.arena[y].right = Some(x);
        self.arena[x].parent = Some(y);
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.arena[node].parent {
            if self.arena[parent].color == Color::Black {
                break;
            }
            // a red parent is never the root, so a grandparent exists
            let grandparent = self.arena[parent].parent.expect("Expected red node to have a parent.");

            if Some(parent) == self.arena[grandparent].left {
                match self.arena[grandparent].right {
                    Some(uncle) if self.arena[uncle].color == Color::Red => {
                        self.arena[parent].color = Color::Black;
                        self.arena[uncle].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        node = grandparent;
                    }
                    _ => {
                        let mut parent = parent;
                        if Some(node) == self.arena[parent].right {
                            node = parent;
                            self.rotate_left(node);
                            parent = self.arena[node].parent.expect("Expected rotated node to have a parent.");
                        }
                        self.arena[parent].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        self.rotate_right(grandparent);
                    }
                }
            } else {
                match self.arena[grandparent].left {
                    Some(uncle) if self.arena[uncle].color == Color::Red => {
                        self.arena[parent].color = Color::Black;
                        self.arena[uncle].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        node = grandparent;
                    }
                    _ => {
                        let mut parent = parent;
                        if Some(node) == self.arena[parent].left {
                            node = parent;
                            self.rotate_right(node);
                            parent = self.arena[node].parent.expect("Expected rotated node to have a parent.");
                        }
                        self.arena[parent].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        self.rotate_left(grandparent);
                    }
                }
            }
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    // replaces the subtree rooted at `u` with the subtree rooted at `v`
    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let parent = self.arena[u].parent;
        match parent {
            None => self.root = v,
            Some(parent) => {
                if self.arena[parent].left == Some(u) {
                    self.arena[parent].left = v;
                } else {
                    self.arena[parent].right = v;
                }
            }
        }
        if let Some(v) = v {
            self.arena[v].parent = parent;
        }
    }

    fn remove_node(&mut self, z: NodeId) -> T {
        let mut removed_color = self.arena[z].color;
        let anchor;
        let anchor_parent;

        if self.arena[z].left.is_none() {
            anchor = self.arena[z].right;
            anchor_parent = self.arena[z].parent;
            self.transplant(z, anchor);
        } else if self.arena[z].right.is_none() {
            anchor = self.arena[z].left;
            anchor_parent = self.arena[z].parent;
            self.transplant(z, anchor);
        } else {
            let right = self.arena[z].right.expect("Expected right child of a node with two children.");
            let y = self.minimum(right);
            removed_color = self.arena[y].color;
            anchor = self.arena[y].right;

            if self.arena[y].parent == Some(z) {
                anchor_parent = Some(y);
            } else {
                anchor_parent = self.arena[y].parent;
                self.transplant(y, anchor);
                let z_right = self.arena[z].right;
                self.arena[y].right = z_right;
                if let Some(child) = z_right {
                    self.arena[child].parent = Some(y);
                }
            }

            // `y` takes over `z`'s position and color, so the black count
            // through this slot is unchanged
            self.transplant(z, Some(y));
            let z_left = self.arena[z].left;
            self.arena[y].left = z_left;
            if let Some(child) = z_left {
                self.arena[child].parent = Some(y);
            }
            self.arena[y].color = self.arena[z].color;
        }

        let node = self.arena.free(z);
        if removed_color == Color::Black {
            self.remove_fixup(anchor, anchor_parent);
        }
        node.value
    }

    // `x` carries the missing black after a black node was unlinked; since it
    // may be NIL, its parent is tracked alongside it
    fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && !self.is_red(x) {
            let p = match parent {
                Some(p) => p,
                None => break,
            };

            if x == self.arena[p].left {
                let mut w = self.arena[p].right.expect("Expected sibling of a double black node.");
                if self.arena[w].color == Color::Red {
                    self.arena[w].color = Color::Black;
                    self.arena[p].color = Color::Red;
                    self.rotate_left(p);
                    w = self.arena[p].right.expect("Expected sibling of a double black node.");
                }

                if !self.is_red(self.arena[w].left) && !self.is_red(self.arena[w].right) {
                    self.arena[w].color = Color::Red;
                    x = Some(p);
                    parent = self.arena[p].parent;
                } else {
                    if !self.is_red(self.arena[w].right) {
                        if let Some(near) = self.arena[w].left {
                            self.arena[near].color = Color::Black;
                        }
                        self.arena[w].color = Color::Red;
                        self.rotate_right(w);
                        w = self.arena[p].right.expect("Expected sibling of a double black node.");
                    }
                    self.arena[w].color = self.arena[p].color;
                    self.arena[p].color = Color::Black;
                    if let Some(far) = self.arena[w].right {
                        self.arena[far].color = Color::Black;
                    }
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut w = self.arena[p].left.expect("Expected sibling of a double black node.");
                if self.arena[w].color == Color::Red {
                    self.arena[w].color = Color::Black;
                    self.arena[p].color = Color::Red;
                    self.rotate_right(p);
                    w = self.arena[p].left.expect("Expected sibling of a double black node.");
                }

                if !self.is_red(self.arena[w].left) && !self.is_red(self.arena[w].right) {
                    self.arena[w].color = Color::Red;
                    x = Some(p);
                    parent = self.arena[p].parent;
                } else {
                    if !self.is_red(self.arena[w].left) {
                        if let Some(near) = self.arena[w].right {
                            self.arena[near].color = Color::Black;
                        }
                        self.arena[w].color = Color::Red;
                        self.rotate_left(w);
                        w = self.arena[p].left.expect("Expected sibling of a double black node.");
                    }
                    self.arena[w].color = self.arena[p].color;
                    self.arena[p].color = Color::Black;
                    if let Some(far) = self.arena[w].left {
                        self.arena[far].color = Color::Black;
                    }
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }

        if let Some(x) = x {
            self.arena[x].color = Color::Black;
        }
    }
}

impl<T> Default for RubyTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RubyTree;
    use crate::arena::NodeId;
    use crate::node::Color;
    use rand::{Rng, SeedableRng, XorShiftRng};
    use std::cmp;

    // returns (node count, black height) while checking the ordering, color,
    // and parent link invariants of the subtree
    fn check_subtree<T: Ord>(
        tree: &RubyTree<T>,
        id: NodeId,
        low: Option<&T>,
        high: Option<&T>,
    ) -> (usize, usize) {
        let node = &tree.arena[id];
        if let Some(low) = low {
            assert!(node.value >= *low);
        }
        if let Some(high) = high {
            assert!(node.value < *high);
        }

        let mut count = 1;
        let mut left_black_height = 1;
        if let Some(left) = node.left {
            assert_eq!(tree.arena[left].parent, Some(id));
            if node.color == Color::Red {
                assert_eq!(tree.arena[left].color, Color::Black);
            }
            let (left_count, black_height) = check_subtree(tree, left, low, Some(&node.value));
            count += left_count;
            left_black_height = black_height;
        }

        let mut right_black_height = 1;
        if let Some(right) = node.right {
            assert_eq!(tree.arena[right].parent, Some(id));
            if node.color == Color::Red {
                assert_eq!(tree.arena[right].color, Color::Black);
            }
            let (right_count, black_height) = check_subtree(tree, right, Some(&node.value), high);
            count += right_count;
            right_black_height = black_height;
        }

        assert_eq!(left_black_height, right_black_height);
        if node.color == Color::Black {
            left_black_height += 1;
        }
        (count, left_black_height)
    }

    fn check_invariants<T: Ord>(tree: &RubyTree<T>) {
        match tree.root {
            None => assert_eq!(tree.len(), 0),
            Some(root) => {
                assert_eq!(tree.arena[root].color, Color::Black);
                assert_eq!(tree.arena[root].parent, None);
                let (count, _) = check_subtree(tree, root, None, None);
                assert_eq!(count, tree.len());
            }
        }
    }

    fn height<T>(tree: &RubyTree<T>, id: Option<NodeId>) -> usize {
        match id {
            None => 0,
            Some(id) => {
                let left = height(tree, tree.arena[id].left);
                let right = height(tree, tree.arena[id].right);
                1 + cmp::max(left, right)
            }
        }
    }

    #[test]
    fn test_len_empty() {
        let tree: RubyTree<u32> = RubyTree::new();
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let tree: RubyTree<u32> = RubyTree::new();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_get_empty() {
        let tree: RubyTree<u32> = RubyTree::new();
        assert_eq!(tree.get(&0), None);
    }

    #[test]
    fn test_insert() {
        let mut tree = RubyTree::new();
        tree.insert(1);
        assert!(tree.contains(&1));
        assert_eq!(tree.get(&1), Some(&1));
        check_invariants(&tree);
    }

    #[test]
    fn test_insert_duplicates() {
        let mut tree = RubyTree::new();
        tree.insert(1);
        tree.insert(1);
        assert_eq!(tree.len(), 2);
        check_invariants(&tree);

        assert_eq!(tree.remove(&1), Some(1));
        assert!(tree.contains(&1));
        assert_eq!(tree.len(), 1);
        check_invariants(&tree);
    }

    #[test]
    fn test_remove() {
        let mut tree = RubyTree::new();
        tree.insert(1);
        assert_eq!(tree.remove(&1), Some(1));
        assert!(!tree.contains(&1));
        assert!(tree.is_empty());
        check_invariants(&tree);
    }

    #[test]
    fn test_remove_absent() {
        let mut tree = RubyTree::new();
        tree.insert(1);
        assert_eq!(tree.remove(&2), None);
        assert_eq!(tree.len(), 1);
        check_invariants(&tree);
    }

    #[test]
    fn test_clear() {
        let mut tree = RubyTree::new();
        tree.insert(1);
        tree.insert(2);
        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.contains(&1));
        check_invariants(&tree);
    }

    #[test]
    fn test_insert_and_remove_sequence() {
        let mut tree = RubyTree::new();
        for value in &[10, 20, 30, 15, 25, 5, 1] {
            tree.insert(*value);
            check_invariants(&tree);
        }

        assert_eq!(tree.get(&30), Some(&30));
        assert_eq!(tree.get(&1), Some(&1));
        assert_eq!(tree.len(), 7);

        assert_eq!(tree.remove(&20), Some(20));
        assert_eq!(tree.remove(&5), Some(5));
        assert_eq!(tree.get(&20), None);
        assert_eq!(tree.get(&5), None);
        assert_eq!(tree.len(), 5);
        check_invariants(&tree);
    }

    #[test]
    fn test_ascending_insert_height() {
        let mut tree = RubyTree::new();
        for value in 1..=31 {
            tree.insert(value);
        }
        check_invariants(&tree);
        assert_eq!(tree.len(), 31);

        // red black height bound: 2 * log2(n + 1)
        assert!(height(&tree, tree.root) <= 10);
    }

    #[test]
    fn test_descending_insert() {
        let mut tree = RubyTree::new();
        for value in (1..=31).rev() {
            tree.insert(value);
            check_invariants(&tree);
        }
        for value in 1..=31 {
            assert!(tree.contains(&value));
        }
    }

    #[test]
    fn test_remove_all_ascending() {
        let mut tree = RubyTree::new();
        for value in 1..=31 {
            tree.insert(value);
        }
        for value in 1..=31 {
            assert_eq!(tree.remove(&value), Some(value));
            check_invariants(&tree);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_random_operations() {
        let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
        let mut tree = RubyTree::new();
        let mut expected: Vec<u32> = Vec::new();

        for _ in 0..2000 {
            if expected.is_empty() || rng.gen_range(0, 3) != 0 {
                let value = rng.gen_range(0, 100);
                tree.insert(value);
                expected.push(value);
            } else {
                let index = rng.gen_range(0, expected.len());
                let value = expected.swap_remove(index);
                assert_eq!(tree.remove(&value), Some(value));
            }

            assert_eq!(tree.len(), expected.len());
            check_invariants(&tree);
        }

        for value in 0..100 {
            assert_eq!(tree.contains(&value), expected.contains(&value));
        }
    }
}
