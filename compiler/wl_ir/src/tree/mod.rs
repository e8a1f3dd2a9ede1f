//! Syntax tree arena.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Child
//! lists are flattened into a second `Vec` and addressed by [`ChildRange`],
//! so a node is a fixed-size record regardless of fan-out and dropping a
//! tree never recurses.
//!
//! The parser builds bottom-up: children are pushed before their parent,
//! which is why [`TreeBuilder::push_node`] takes the finished child list.

use std::fmt::{self, Write as _};

use smallvec::SmallVec;

use crate::{Position, Span, Token, TokenId};

/// Index of a grammar rule (non-terminal).
///
/// Assigned by the grammar in declaration order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct RuleId(u16);

impl RuleId {
    #[inline]
    pub const fn new(index: u16) -> Self {
        RuleId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleId({})", self.0)
    }
}

/// Index into the node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Contiguous slice of the flattened child list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ChildRange {
    pub start: u32,
    pub len: u32,
}

impl ChildRange {
    pub const EMPTY: ChildRange = ChildRange { start: 0, len: 0 };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

/// What a node represents.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// The single root. Children are the start rule's output.
    Root,
    /// One token; `token` indexes [`SyntaxTree::tokens`].
    Leaf { token: u32 },
    /// An application of a named grammar rule.
    Rule(RuleId),
    /// `lhs op rhs`; children are `[lhs, op leaf, rhs]`.
    Binary { op: TokenId },
    /// `op operand`; children are `[op leaf, operand]`.
    Unary { op: TokenId },
    /// Error marker in place of an unparsable region. Children are the
    /// discarded tokens, possibly none.
    Error,
}

/// One arena record.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Position of the first character of the first token.
    pub start: Position,
    /// Position just past the last character of the last token.
    pub end: Position,
    pub children: ChildRange,
}

impl Node {
    /// Byte span covered by this node.
    #[inline]
    pub fn span(&self) -> Span {
        self.start.span_to(self.end)
    }
}

/// Display names for token ids and rule ids.
///
/// Implemented by whoever owns the language definition; the tree itself only
/// stores ids.
pub trait Names {
    fn token_name(&self, id: TokenId) -> &str;
    fn rule_name(&self, id: RuleId) -> &str;
}

/// Immutable parser output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxTree<'src> {
    nodes: Vec<Node>,
    children: Vec<NodeId>,
    tokens: Vec<Token<'src>>,
    root: NodeId,
}

impl<'src> SyntaxTree<'src> {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[self.nodes[id.index()].children.to_range()]
    }

    /// The token behind a leaf node; `None` for every other kind.
    pub fn token(&self, id: NodeId) -> Option<&Token<'src>> {
        match self.kind(id) {
            NodeKind::Leaf { token } => self.tokens.get(token as usize),
            _ => None,
        }
    }

    /// Every token that made it into the tree, in source order.
    #[inline]
    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the root has no children (empty input).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node(self.root).children.is_empty()
    }

    /// Depth-first, parent-before-children walk starting at `from`.
    pub fn preorder(&self, from: NodeId) -> Preorder<'_, 'src> {
        let mut stack = SmallVec::new();
        stack.push(from);
        Preorder { tree: self, stack }
    }

    /// Ids of every `Error` node.
    pub fn error_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.preorder(self.root)
            .filter(|&id| self.kind(id) == NodeKind::Error)
    }

    /// `true` if the parser had to insert any error marker.
    pub fn has_errors(&self) -> bool {
        self.error_nodes().next().is_some()
    }

    /// Compact S-expression rendering, one node per parenthesized group.
    ///
    /// Leaves render as their text; rules render as `(name ...)`; operators
    /// as `(op lhs rhs)`; error markers as `(error ...)`.
    pub fn to_sexpr(&self, names: &dyn Names) -> String {
        let mut out = String::new();
        self.write_sexpr(self.root, names, true, &mut out);
        out
    }

    /// Like [`to_sexpr`](Self::to_sexpr) but omits `Error` nodes entirely.
    ///
    /// Two trees that differ only inside error markers render identically,
    /// which is how recovery is checked to be local.
    pub fn to_sexpr_without_errors(&self, names: &dyn Names) -> String {
        let mut out = String::new();
        self.write_sexpr(self.root, names, false, &mut out);
        out
    }

    /// [`to_sexpr`](Self::to_sexpr) of the subtree under `id`.
    pub fn node_sexpr(&self, id: NodeId, names: &dyn Names) -> String {
        let mut out = String::new();
        self.write_sexpr(id, names, true, &mut out);
        out
    }

    /// Walks with an explicit stack so arbitrarily deep trees render
    /// without recursion.
    fn write_sexpr(&self, id: NodeId, names: &dyn Names, errors: bool, out: &mut String) {
        let mut stack: SmallVec<[SexprStep; 32]> = SmallVec::new();
        stack.push(SexprStep::Node { id, spaced: false });
        while let Some(step) = stack.pop() {
            let SexprStep::Node { id, spaced } = step else {
                out.push(')');
                continue;
            };
            let node = self.node(id);
            if !errors && node.kind == NodeKind::Error {
                continue;
            }
            if spaced {
                out.push(' ');
            }
            let head = match node.kind {
                NodeKind::Leaf { token } => {
                    if let Some(tok) = self.tokens.get(token as usize) {
                        out.push_str(tok.text);
                    }
                    continue;
                }
                NodeKind::Root => "root",
                NodeKind::Error => "error",
                NodeKind::Rule(rule) => names.rule_name(rule),
                NodeKind::Binary { op } => self.operator_text(id, 1, op, names),
                NodeKind::Unary { op } => self.operator_text(id, 0, op, names),
            };
            out.push('(');
            out.push_str(head);
            stack.push(SexprStep::Close);
            // The operator leaf is already the head.
            let skip = match node.kind {
                NodeKind::Binary { .. } => Some(1),
                NodeKind::Unary { .. } => Some(0),
                _ => None,
            };
            let operands = self
                .children(id)
                .iter()
                .enumerate()
                .rev()
                .filter(|&(i, _)| Some(i) != skip)
                .map(|(_, &child)| SexprStep::Node {
                    id: child,
                    spaced: true,
                });
            stack.extend(operands);
        }
    }

    /// Text of the operator leaf at `slot`, falling back to the token name.
    fn operator_text<'a>(&'a self, id: NodeId, slot: usize, op: TokenId, names: &'a dyn Names) -> &'a str {
        self.children(id)
            .get(slot)
            .and_then(|&leaf| self.token(leaf))
            .map_or_else(|| names.token_name(op), |tok| tok.text)
    }

    /// Indented multi-line dump with positions, for the driver's `parse`
    /// command.
    pub fn dump(&self, names: &dyn Names) -> String {
        let mut out = String::new();
        self.write_dump(self.root, names, &mut out);
        out
    }

    fn write_dump(&self, id: NodeId, names: &dyn Names, out: &mut String) {
        let mut stack: SmallVec<[(NodeId, usize); 32]> = SmallVec::new();
        stack.push((id, 0));
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            let _ = write!(out, "{:indent$}", "", indent = depth * 2);
            let _ = match node.kind {
                NodeKind::Root => write!(out, "Root"),
                NodeKind::Leaf { token } => match self.tokens.get(token as usize) {
                    Some(tok) => write!(out, "{} {:?}", names.token_name(tok.id), tok.text),
                    None => write!(out, "<missing token>"),
                },
                NodeKind::Rule(rule) => write!(out, "{}", names.rule_name(rule)),
                NodeKind::Binary { op } => write!(out, "Binary {}", names.token_name(op)),
                NodeKind::Unary { op } => write!(out, "Unary {}", names.token_name(op)),
                NodeKind::Error => write!(out, "Error"),
            };
            let _ = writeln!(out, " @ {}..{}", node.start, node.end);
            stack.extend(self.children(id).iter().rev().map(|&child| (child, depth + 1)));
        }
    }
}

/// Pending work for [`SyntaxTree::write_sexpr`].
#[derive(Copy, Clone)]
enum SexprStep {
    /// Render a node, preceded by a space when it is not the first item.
    Node { id: NodeId, spaced: bool },
    /// Close the group opened by a node's head.
    Close,
}

/// Iterator returned by [`SyntaxTree::preorder`].
pub struct Preorder<'t, 'src> {
    tree: &'t SyntaxTree<'src>,
    stack: SmallVec<[NodeId; 32]>,
}

impl Iterator for Preorder<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Reverse so the leftmost child is visited first.
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Bottom-up builder used by the parser.
///
/// Every pushed node except the root must be attached to exactly one
/// parent; [`finish`](Self::finish) checks this in debug builds.
#[derive(Debug)]
pub struct TreeBuilder<'src> {
    nodes: Vec<Node>,
    children: Vec<NodeId>,
    tokens: Vec<Token<'src>>,
    attached: Vec<bool>,
}

impl Default for TreeBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src> TreeBuilder<'src> {
    pub fn new() -> Self {
        TreeBuilder {
            nodes: Vec::new(),
            children: Vec::new(),
            tokens: Vec::new(),
            attached: Vec::new(),
        }
    }

    /// Pre-size for a token count estimate (roughly two nodes per token).
    pub fn with_capacity(tokens: usize) -> Self {
        TreeBuilder {
            nodes: Vec::with_capacity(tokens * 2),
            children: Vec::with_capacity(tokens * 2),
            tokens: Vec::with_capacity(tokens),
            attached: Vec::with_capacity(tokens * 2),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(node);
        self.attached.push(false);
        NodeId::new(index)
    }

    /// Add a leaf for `token`.
    pub fn push_leaf(&mut self, token: Token<'src>) -> NodeId {
        let index = u32::try_from(self.tokens.len()).unwrap_or(u32::MAX);
        self.tokens.push(token);
        self.alloc(Node {
            kind: NodeKind::Leaf { token: index },
            start: token.pos,
            end: token.end_position(),
            children: ChildRange::EMPTY,
        })
    }

    /// Add an interior node over already-built `children`.
    ///
    /// The node spans from its first child's start to its last child's end;
    /// a childless node is a zero-width node at `at`.
    pub fn push_node(&mut self, kind: NodeKind, children: &[NodeId], at: Position) -> NodeId {
        let (start, end) = match (children.first(), children.last()) {
            (Some(first), Some(last)) => (
                self.nodes[first.index()].start,
                self.nodes[last.index()].end,
            ),
            _ => (at, at),
        };
        let range = ChildRange {
            start: u32::try_from(self.children.len()).unwrap_or(u32::MAX),
            len: u32::try_from(children.len()).unwrap_or(u32::MAX),
        };
        for &child in children {
            debug_assert!(
                !self.attached[child.index()],
                "node {child:?} attached to two parents"
            );
            self.attached[child.index()] = true;
        }
        self.children.extend_from_slice(children);
        self.alloc(Node {
            kind,
            start,
            end,
            children: range,
        })
    }

    /// Start position of an already-built node.
    #[inline]
    pub fn start_of(&self, id: NodeId) -> Position {
        self.nodes[id.index()].start
    }

    /// Wrap `children` in the root and freeze the tree.
    pub fn finish(mut self, children: &[NodeId], at: Position) -> SyntaxTree<'src> {
        let root = self.push_node(NodeKind::Root, children, at);
        self.attached[root.index()] = true;
        debug_assert!(
            self.attached.iter().all(|&a| a),
            "unattached nodes left in the arena"
        );
        SyntaxTree {
            nodes: self.nodes,
            children: self.children,
            tokens: self.tokens,
            root,
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{NodeId, RuleId};
    crate::static_assert_size!(NodeId, 4);
    crate::static_assert_size!(RuleId, 2);
}
