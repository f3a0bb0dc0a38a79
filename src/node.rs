use crate::arena::NodeId;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A struct representing an internal node of a red black tree.
///
/// All structural links are arena ids; `None` is the NIL sentinel and is
/// always treated as black. The parent link is a back-reference used for
/// upward traversal during fixups and never for ownership.
pub struct Node<T> {
    pub value: T,
    pub color: Color,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent: None,
        }
    }
}
