//! Id-addressed edits over an assertion root.
//!
//! Every edit takes the current root by reference and returns a new root;
//! the input is never modified.

use tracing::debug;

use crate::error::{AssertionError, Result};
use crate::ids::IdGenerator;
use crate::merge::refresh_ids;
use crate::types::{GroupOp, NotOp, Op};

/// Finds the node with `id` anywhere below `root`.
#[must_use]
pub fn find_op<'a>(root: &'a GroupOp, id: &str) -> Option<&'a Op> {
    root.children.iter().find_map(|child| find_in(child, id))
}

fn find_in<'a>(op: &'a Op, id: &str) -> Option<&'a Op> {
    if op.id() == Some(id) {
        return Some(op);
    }
    match op {
        Op::And(group) | Op::Or(group) => group.children.iter().find_map(|child| find_in(child, id)),
        Op::Not(not) => find_in(&not.operand, id),
        _ => None,
    }
}

/// Rebuilds `children`, letting `edit` rewrite the matching node.
///
/// `edit` returns the nodes that take the place of the match: none to remove
/// it, one to replace it, two to insert after it. Returns whether a match was
/// found.
fn rewrite_children<F>(children: &[Op], id: &str, edit: &mut F) -> Result<(Vec<Op>, bool)>
where
    F: FnMut(&Op) -> Result<Vec<Op>>,
{
    let mut out = Vec::with_capacity(children.len() + 1);
    let mut found = false;
    for child in children {
        if !found && child.id() == Some(id) {
            out.extend(edit(child)?);
            found = true;
            continue;
        }
        if found {
            out.push(child.clone());
            continue;
        }
        let (rewritten, hit) = rewrite_op(child, id, edit)?;
        found = hit;
        out.push(rewritten);
    }
    Ok((out, found))
}

fn rewrite_op<F>(op: &Op, id: &str, edit: &mut F) -> Result<(Op, bool)>
where
    F: FnMut(&Op) -> Result<Vec<Op>>,
{
    match op {
        Op::And(group) => {
            let (children, hit) = rewrite_children(&group.children, id, edit)?;
            Ok((Op::and(group.id.clone(), children), hit))
        }
        Op::Or(group) => {
            let (children, hit) = rewrite_children(&group.children, id, edit)?;
            Ok((Op::or(group.id.clone(), children), hit))
        }
        Op::Not(not) if not.operand.id() == Some(id) => {
            // A `not` always holds exactly one operand, so only replacement fits.
            let mut replaced = edit(&not.operand)?;
            if replaced.len() != 1 {
                return Err(AssertionError::NotAGroup { id: not.id.clone() });
            }
            let operand = replaced.remove(0);
            Ok((
                Op::Not(NotOp {
                    id: not.id.clone(),
                    operand: Box::new(operand),
                }),
                true,
            ))
        }
        Op::Not(not) => {
            let (operand, hit) = rewrite_op(&not.operand, id, edit)?;
            Ok((
                Op::Not(NotOp {
                    id: not.id.clone(),
                    operand: Box::new(operand),
                }),
                hit,
            ))
        }
        leaf => Ok((leaf.clone(), false)),
    }
}

fn rewrite_root<F>(root: &GroupOp, id: &str, mut edit: F) -> Result<GroupOp>
where
    F: FnMut(&Op) -> Result<Vec<Op>>,
{
    let (children, found) = rewrite_children(&root.children, id, &mut edit)?;
    if !found {
        return Err(AssertionError::NodeNotFound { id: id.to_string() });
    }
    Ok(GroupOp {
        id: root.id.clone(),
        children,
    })
}

/// Replaces the node with `id` by `replacement`.
///
/// # Errors
///
/// Returns `AssertionError::NodeNotFound` if no node has `id`.
pub fn replace_op(root: &GroupOp, id: &str, replacement: Op) -> Result<GroupOp> {
    if root.id == id {
        return match replacement {
            Op::And(group) => Ok(group),
            _ => Err(AssertionError::NotAGroup { id: id.to_string() }),
        };
    }
    let mut replacement = Some(replacement);
    rewrite_root(root, id, |_| Ok(replacement.take().into_iter().collect()))
}

/// Removes the node with `id` together with its subtree.
///
/// # Errors
///
/// Returns `AssertionError::CannotRemoveRoot` for the root id,
/// `AssertionError::NotAGroup` when the node is the operand of a `not`, and
/// `AssertionError::NodeNotFound` if no node has `id`.
pub fn remove_op(root: &GroupOp, id: &str) -> Result<GroupOp> {
    if root.id == id {
        return Err(AssertionError::CannotRemoveRoot);
    }
    let edited = rewrite_root(root, id, |_| Ok(Vec::new()))?;
    debug!(id, "removed assertion node");
    Ok(edited)
}

/// Appends `child` to the group with `group_id`, which may be the root.
///
/// # Errors
///
/// Returns `AssertionError::NotAGroup` if the target is not `and`/`or` and
/// `AssertionError::NodeNotFound` if no node has `group_id`.
pub fn append_child(root: &GroupOp, group_id: &str, child: Op) -> Result<GroupOp> {
    if root.id == group_id {
        let mut children = root.children.clone();
        children.push(child);
        return Ok(GroupOp {
            id: root.id.clone(),
            children,
        });
    }

    let mut child = Some(child);
    rewrite_root(root, group_id, |target| {
        let (Op::And(group) | Op::Or(group)) = target else {
            return Err(AssertionError::NotAGroup {
                id: group_id.to_string(),
            });
        };
        let mut children = group.children.clone();
        children.extend(child.take());
        let group = GroupOp {
            id: group.id.clone(),
            children,
        };
        Ok(vec![if target.is_or_op() { Op::Or(group) } else { Op::And(group) }])
    })
}

/// Inserts a deep copy of the node with `id`, with fresh ids, right after it.
///
/// # Errors
///
/// Returns `AssertionError::CannotDuplicateRoot` for the root id,
/// `AssertionError::NodeNotFound` if no node has `id`, and
/// `AssertionError::NotAGroup` when the node is the operand of a `not`.
pub fn duplicate_op(root: &GroupOp, id: &str, ids: &dyn IdGenerator) -> Result<GroupOp> {
    if root.id == id {
        return Err(AssertionError::CannotDuplicateRoot);
    }
    rewrite_root(root, id, |original| {
        Ok(vec![original.clone(), refresh_ids(original, ids)])
    })
}
