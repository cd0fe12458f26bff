//! Splicing suggested conditions into an existing assertion.
//!
//! A suggestion source produces a single node without any knowledge of the
//! ids already present in the user's tree. [`merge_suggestion`] re-issues ids
//! for the whole suggested subtree and appends it to the root group, keeping
//! every existing condition. No normalization happens here.

use tracing::debug;

use crate::ids::IdGenerator;
use crate::types::{Assertion, GroupOp, NotOp, Op};

/// Deep-copies `op`, giving it and every descendant a fresh id.
#[must_use]
pub fn refresh_ids(op: &Op, ids: &dyn IdGenerator) -> Op {
    match op {
        Op::And(group) => Op::And(refresh_group(group, ids)),
        Op::Or(group) => Op::Or(refresh_group(group, ids)),
        Op::Not(not) => Op::Not(NotOp {
            id: ids.next_id(),
            operand: Box::new(refresh_ids(&not.operand, ids)),
        }),
        leaf => leaf.clone().with_id(ids.next_id()),
    }
}

fn refresh_group(group: &GroupOp, ids: &dyn IdGenerator) -> GroupOp {
    GroupOp {
        id: ids.next_id(),
        children: group.children.iter().map(|child| refresh_ids(child, ids)).collect(),
    }
}

/// Appends a suggested node to the current assertion.
///
/// With a current assertion, the result keeps the root's id and existing
/// children and gains the id-refreshed suggestion as its last child. Without
/// one, the result is a fresh `and` root holding only the suggestion.
#[must_use]
pub fn merge_suggestion(suggested: &Op, current: Option<&Assertion>, ids: &dyn IdGenerator) -> Assertion {
    let incoming = refresh_ids(suggested, ids);
    debug!(
        suggested_op = suggested.tag().unwrap_or("<missing>"),
        nodes = incoming.node_count(),
        "merging suggested assertion"
    );

    let root = match current {
        Some(assertion) => {
            let mut children = Vec::with_capacity(assertion.root.children.len() + 1);
            children.extend(assertion.root.children.iter().cloned());
            children.push(incoming);
            GroupOp {
                id: assertion.root.id.clone(),
                children,
            }
        }
        None => GroupOp {
            id: ids.next_id(),
            children: vec![incoming],
        },
    };

    Assertion::new(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdGenerator;
    use crate::types::Comparison;
    use serde_json::json;
    use std::collections::HashSet;

    fn collect_ids<'a>(op: &'a Op, out: &mut Vec<&'a str>) {
        if let Some(id) = op.id() {
            out.push(id);
        }
        match op {
            Op::And(group) | Op::Or(group) => {
                group.children.iter().for_each(|child| collect_ids(child, out));
            }
            Op::Not(not) => collect_ids(&not.operand, out),
            _ => {}
        }
    }

    fn current() -> Assertion {
        Assertion::new(GroupOp {
            id: "root".to_string(),
            children: vec![
                Op::status_code("A", Comparison::GreaterThan, 199.0),
                Op::status_code("B", Comparison::LessThan, 300.0),
            ],
        })
    }

    #[test]
    fn appends_to_existing_root() {
        let ids = SequentialIdGenerator::new("fresh");
        let suggested = Op::status_code("s", Comparison::Equals, 200.0);

        let merged = merge_suggestion(&suggested, Some(&current()), &ids);

        assert_eq!(merged.root.id, "root");
        let children: Vec<_> = merged.root.children.iter().filter_map(Op::id).collect();
        assert_eq!(children, ["A", "B", "fresh-1"]);
        assert_eq!(
            merged.root.children[2],
            Op::status_code("fresh-1", Comparison::Equals, 200.0)
        );
    }

    #[test]
    fn merges_into_missing_assertion() {
        let ids = SequentialIdGenerator::new("fresh");
        let suggested = Op::status_code("s", Comparison::Equals, 200.0);

        let merged = merge_suggestion(&suggested, None, &ids);

        assert_eq!(merged.root.children.len(), 1);
        assert_eq!(merged.root.children[0].id(), Some("fresh-1"));
        assert_eq!(merged.root.id, "fresh-2");
    }

    #[test]
    fn merges_into_empty_root() {
        let ids = SequentialIdGenerator::new("fresh");
        let empty = Assertion::new(GroupOp {
            id: "root".to_string(),
            children: vec![],
        });
        let merged = merge_suggestion(&Op::or("g", vec![]), Some(&empty), &ids);
        assert_eq!(merged.root.id, "root");
        assert!(merged.root.children[0].is_or_op());
    }

    #[test]
    fn every_suggested_node_gets_a_new_id() {
        let ids = SequentialIdGenerator::new("fresh");
        let suggested = Op::or(
            "A",
            vec![
                Op::not("B", Op::status_code("root", Comparison::Equals, 500.0)),
                Op::and("s", vec![Op::Unrecognized(json!({"op": "x", "id": "A"}))]),
            ],
        );

        let merged = merge_suggestion(&suggested, Some(&current()), &ids);

        let mut all = Vec::new();
        merged.root.children.iter().for_each(|child| collect_ids(child, &mut all));
        all.push(&merged.root.id);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len(), "ids collide: {all:?}");
        assert_eq!(ids.issued(), 5);
    }

    #[test]
    fn inputs_are_left_untouched() {
        let ids = SequentialIdGenerator::new("fresh");
        let suggested = Op::and("s", vec![Op::status_code("t", Comparison::Equals, 200.0)]);
        let existing = current();
        let (suggested_before, existing_before) = (suggested.clone(), existing.clone());

        let _ = merge_suggestion(&suggested, Some(&existing), &ids);

        assert_eq!(suggested, suggested_before);
        assert_eq!(existing, existing_before);
    }

    #[test]
    fn merge_does_not_normalize() {
        let ids = SequentialIdGenerator::new("fresh");
        let suggested = Op::status_code("s", Comparison::Equals, 42.0);
        let merged = merge_suggestion(&suggested, None, &ids);
        assert_eq!(
            merged.root.children[0],
            Op::status_code("fresh-1", Comparison::Equals, 42.0)
        );
    }
}
