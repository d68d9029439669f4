//! Constraint trees and their combinators.
//!
//! A [`ConstraintTree`] is the compiler's output: leaves of range/equality
//! tests joined by `And`/`Or`. The combinators keep trees shallow by appending
//! to an existing node of the same kind instead of nesting a new one, since
//! some engines cap the number of clauses per boolean query.
//!
//! All construction is by value. Merging consumes both operands, so a subtree
//! is never shared between two parents and never mutated behind a caller's
//! back.

use serde::Serialize;

use crate::constraint::Constraint;

/// A boolean expression over leaf [`Constraint`]s.
///
/// # Example
///
/// ```
/// use geobox_query::ConstraintTree;
///
/// let tree = ConstraintTree::equality("a", "1")
///     .and(ConstraintTree::equality("b", "2"))
///     .and(ConstraintTree::equality("c", "3"));
///
/// // appended, not nested
/// assert_eq!(tree.children().len(), 3);
/// assert_eq!(tree.to_string(), "+a:1 +b:2 +c:3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintTree {
    /// A single field test.
    Leaf(Constraint),
    /// Every child must match.
    And(Vec<ConstraintTree>),
    /// At least one child must match.
    Or(Vec<ConstraintTree>),
}

impl From<Constraint> for ConstraintTree {
    fn from(constraint: Constraint) -> Self {
        ConstraintTree::Leaf(constraint)
    }
}

impl ConstraintTree {
    /// Creates an inclusive range leaf.
    pub fn range(
        field: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        ConstraintTree::Leaf(Constraint::range(field, low, high))
    }

    /// Creates an equality leaf.
    pub fn equality(field: impl Into<String>, value: impl Into<String>) -> Self {
        ConstraintTree::Leaf(Constraint::equality(field, value))
    }

    // ========================================================================
    // Combinators
    // ========================================================================

    /// Conjoins two trees.
    ///
    /// If either side is already an `And`, the other side joins it as an
    /// extra child; two `And`s merge into one. Otherwise a new two-child
    /// `And` is created.
    pub fn and(self, other: ConstraintTree) -> ConstraintTree {
        match (self, other) {
            (ConstraintTree::And(mut lhs), ConstraintTree::And(rhs)) => {
                lhs.extend(rhs);
                ConstraintTree::And(lhs)
            }
            (ConstraintTree::And(mut lhs), rhs) => {
                lhs.push(rhs);
                ConstraintTree::And(lhs)
            }
            (lhs, ConstraintTree::And(mut rhs)) => {
                rhs.insert(0, lhs);
                ConstraintTree::And(rhs)
            }
            (lhs, rhs) => ConstraintTree::And(vec![lhs, rhs]),
        }
    }

    /// Disjoins two trees, with the same flattening rules as [`and`](Self::and).
    pub fn or(self, other: ConstraintTree) -> ConstraintTree {
        match (self, other) {
            (ConstraintTree::Or(mut lhs), ConstraintTree::Or(rhs)) => {
                lhs.extend(rhs);
                ConstraintTree::Or(lhs)
            }
            (ConstraintTree::Or(mut lhs), rhs) => {
                lhs.push(rhs);
                ConstraintTree::Or(lhs)
            }
            (lhs, ConstraintTree::Or(mut rhs)) => {
                rhs.insert(0, lhs);
                ConstraintTree::Or(rhs)
            }
            (lhs, rhs) => ConstraintTree::Or(vec![lhs, rhs]),
        }
    }

    /// Flattens nested nodes of the same kind and unwraps single-child nodes.
    ///
    /// Trees built only through the combinators are already flat; this pass is
    /// for trees assembled by hand. It is idempotent.
    pub fn normalize(self) -> ConstraintTree {
        match self {
            ConstraintTree::Leaf(_) => self,
            ConstraintTree::And(children) => {
                let mut flat = splice(children, true);
                if flat.len() == 1 {
                    flat.remove(0)
                } else {
                    ConstraintTree::And(flat)
                }
            }
            ConstraintTree::Or(children) => {
                let mut flat = splice(children, false);
                if flat.len() == 1 {
                    flat.remove(0)
                } else {
                    ConstraintTree::Or(flat)
                }
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns `true` if this is a single constraint.
    pub fn is_leaf(&self) -> bool {
        matches!(self, ConstraintTree::Leaf(_))
    }

    /// Returns the children of an `And`/`Or`, or an empty slice for a leaf.
    pub fn children(&self) -> &[ConstraintTree] {
        match self {
            ConstraintTree::Leaf(_) => &[],
            ConstraintTree::And(children) | ConstraintTree::Or(children) => children,
        }
    }

    /// Returns the number of levels, counting a leaf as one.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(ConstraintTree::depth)
            .max()
            .unwrap_or(0)
    }

    /// Returns the number of leaf constraints.
    pub fn leaf_count(&self) -> usize {
        match self {
            ConstraintTree::Leaf(_) => 1,
            _ => self.children().iter().map(ConstraintTree::leaf_count).sum(),
        }
    }

    /// Returns every leaf constraint, depth first.
    pub fn leaves(&self) -> Vec<&Constraint> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Constraint>) {
        match self {
            ConstraintTree::Leaf(constraint) => out.push(constraint),
            _ => {
                for child in self.children() {
                    child.collect_leaves(out);
                }
            }
        }
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests whether an item's stored coordinates satisfy this tree.
    ///
    /// The accessor returns the encoded value of a field, or `None` when the
    /// item has no such field. An empty `And` matches; an empty `Or` does not.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Option<&'a str>,
    {
        self.eval(item, &accessor)
    }

    fn eval<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Option<&'a str>,
    {
        match self {
            ConstraintTree::Leaf(constraint) => {
                constraint.matches(accessor(item, constraint.field()))
            }
            ConstraintTree::And(children) => {
                children.iter().all(|child| child.eval(item, accessor))
            }
            ConstraintTree::Or(children) => {
                children.iter().any(|child| child.eval(item, accessor))
            }
        }
    }

    /// Returns references to matching items, in input order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Option<&'b str>,
    {
        items
            .iter()
            .filter(|item| self.eval(*item, &accessor))
            .collect()
    }

    /// Counts matching items.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Option<&'a str>,
    {
        items
            .iter()
            .filter(|item| self.eval(*item, &accessor))
            .count()
    }

    /// Finds the first matching item.
    pub fn find<'a, T, F>(&self, items: &'a [T], accessor: F) -> Option<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Option<&'b str>,
    {
        items.iter().find(|item| self.eval(*item, &accessor))
    }
}

fn splice(children: Vec<ConstraintTree>, conjunction: bool) -> Vec<ConstraintTree> {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match (conjunction, child.normalize()) {
            (true, ConstraintTree::And(grand)) | (false, ConstraintTree::Or(grand)) => {
                flat.extend(grand)
            }
            (_, other) => flat.push(other),
        }
    }
    flat
}

/// Conjoins two optional trees; a missing side is the identity.
pub fn and(lhs: Option<ConstraintTree>, rhs: Option<ConstraintTree>) -> Option<ConstraintTree> {
    match (lhs, rhs) {
        (None, rhs) => rhs,
        (lhs, None) => lhs,
        (Some(lhs), Some(rhs)) => Some(lhs.and(rhs)),
    }
}

/// Disjoins two optional trees; a missing side is the identity.
pub fn or(lhs: Option<ConstraintTree>, rhs: Option<ConstraintTree>) -> Option<ConstraintTree> {
    match (lhs, rhs) {
        (None, rhs) => rhs,
        (lhs, None) => lhs,
        (Some(lhs), Some(rhs)) => Some(lhs.or(rhs)),
    }
}

impl std::fmt::Display for ConstraintTree {
    /// Renders a Lucene-like query string: `+` marks required clauses of an
    /// `And`, nested boolean nodes are parenthesized.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (children, marker) = match self {
            ConstraintTree::Leaf(constraint) => return write!(f, "{constraint}"),
            ConstraintTree::And(children) => (children, "+"),
            ConstraintTree::Or(children) => (children, ""),
        };
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if child.is_leaf() {
                write!(f, "{marker}{child}")?;
            } else {
                write!(f, "{marker}({child})")?;
            }
        }
        Ok(())
    }
}
