//! Fast, but limited allocator for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};

/// An opaque handle to a slot in an [`Arena<T>`].
///
/// Handles are plain indices: `Copy`, cheap to compare, and usable as the
/// structural links of a tree. A handle is only meaningful for the arena that
/// produced it, and only until the slot is freed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeId(usize);

enum Slot<T> {
    Occupied(T),
    Vacant(Option<NodeId>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// All objects inside the arena are destroyed when the arena is destroyed. The
/// arena supports deallocation of individual objects and yields both mutable
/// and immutable references to them. The underlying container is simply a
/// `Vec` of slots, so no unsafe code is needed: freed slots form an intrusive
/// free list and are reused by later allocations before the `Vec` grows.
///
/// # Examples
///
/// ```
/// use rubytree::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// ```
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    head: Option<NodeId>,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// assert_eq!(arena.len(), 0);
    /// ```
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns its `NodeId`. The id can
    /// later be used to retrieve mutable and immutable references to the
    /// object, and to deallocate it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> NodeId {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                NodeId(self.slots.len() - 1)
            }
            Some(id) => {
                let vacant_slot = mem::replace(&mut self.slots[id.0], Slot::Occupied(value));
                match vacant_slot {
                    Slot::Vacant(next_id) => {
                        self.head = next_id;
                        id
                    }
                    Slot::Occupied(_) => panic!("Expected a vacant slot at the free list head."),
                }
            }
        }
    }

    /// Deallocates an object in the arena and returns it. The slot is pushed
    /// onto the free list and will be reused by a later allocation.
    ///
    /// # Panics
    ///
    /// Panics if `id` corresponds to an invalid or vacant slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, id: NodeId) -> T {
        match self.slots.get(id.0) {
            None => panic!("Error: attempting to free invalid slot."),
            Some(Slot::Vacant(_)) => panic!("Error: attempting to free vacant slot."),
            Some(Slot::Occupied(_)) => {}
        }
        let old_slot = mem::replace(&mut self.slots[id.0], Slot::Vacant(self.head.take()));
        match old_slot {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.head = Some(id);
                value
            }
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the arena. Returns
    /// `None` if the id does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena. Returns `None`
    /// if the id does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// *arena.get_mut(x).unwrap() = 1;
    /// assert_eq!(arena.get(x), Some(&1));
    /// ```
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// arena.allocate(0);
    /// assert_eq!(arena.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena contains no live objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// assert!(arena.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops all objects in the arena and resets the free list. All
    /// previously returned ids become invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rubytree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// arena.allocate(0);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: id out of bounds.")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: id out of bounds.")
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
