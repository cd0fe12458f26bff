//! Property-based tests over generated assertion trees.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use crate::*;

fn comparison() -> impl Strategy<Value = Comparison> {
    prop::sample::select(Comparison::ALL.to_vec())
}

fn status_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(f64::NAN),
        (-1000i32..2000).prop_map(f64::from),
        (0u16..1000).prop_map(f64::from),
    ]
}

fn header_operand() -> impl Strategy<Value = HeaderOperand> {
    prop_oneof![
        "[a-z-]{0,12}".prop_map(HeaderOperand::literal),
        "[a-z*-]{0,12}".prop_map(HeaderOperand::glob),
        Just(HeaderOperand::None),
    ]
}

fn leaf() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[a-z0-9]{1,8}", comparison(), status_value())
            .prop_map(|(id, cmp, value)| Op::status_code(id, cmp, value)),
        ("[a-z0-9]{1,8}", "\\$\\.[a-z.]{0,10}", comparison(), "[a-z]{0,6}").prop_map(
            |(id, path, operator, literal)| Op::JsonPath(JsonPathOp {
                id,
                value: path,
                operator,
                operand: JsonPathOperand::literal(literal),
            })
        ),
        ("[a-z0-9]{1,8}", comparison(), header_operand(), comparison(), header_operand()).prop_map(
            |(id, key_op, key_operand, value_op, value_operand)| Op::HeaderCheck(HeaderCheckOp {
                id,
                key_op,
                key_operand,
                value_op,
                value_operand,
            })
        ),
    ]
}

fn tree() -> impl Strategy<Value = Op> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            ("[a-z0-9]{1,8}", prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(id, children)| Op::and(id, children)),
            ("[a-z0-9]{1,8}", prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(id, children)| Op::or(id, children)),
            ("[a-z0-9]{1,8}", inner).prop_map(|(id, operand)| Op::not(id, operand)),
        ]
    })
}

fn status_values(op: &Op, out: &mut Vec<f64>) {
    match op {
        Op::StatusCodeCheck(check) => out.push(check.value),
        Op::And(group) | Op::Or(group) => group.children.iter().for_each(|c| status_values(c, out)),
        Op::Not(not) => status_values(&not.operand, out),
        _ => {}
    }
}

fn ids(op: &Op, out: &mut Vec<String>) {
    if let Some(id) = op.id() {
        out.push(id.to_string());
    }
    match op {
        Op::And(group) | Op::Or(group) => group.children.iter().for_each(|c| ids(c, out)),
        Op::Not(not) => ids(&not.operand, out),
        _ => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_normalize_is_idempotent(op in tree()) {
        let once = normalize(&op);
        let twice = normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_normalized_status_codes_in_range(op in tree()) {
        let mut values = Vec::new();
        status_values(&normalize(&op), &mut values);
        for value in values {
            prop_assert!((100.0..=599.0).contains(&value), "value {} out of range", value);
        }
    }

    #[test]
    fn prop_normalize_preserves_shape_and_ids(op in tree()) {
        let normalized = normalize(&op);
        prop_assert_eq!(op.node_count(), normalized.node_count());
        prop_assert_eq!(op.depth(), normalized.depth());

        let (mut before, mut after) = (Vec::new(), Vec::new());
        ids(&op, &mut before);
        ids(&normalized, &mut after);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_clamp_matches_bounds(value in status_value()) {
        let normalized = normalize(&Op::status_code("s", Comparison::Equals, value));
        let mut values = Vec::new();
        status_values(&normalized, &mut values);
        let expected = if value.is_nan() { 200.0 } else { value.clamp(100.0, 599.0) };
        prop_assert!((values[0] - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn prop_merge_refreshes_every_id(suggested in tree()) {
        let generator = SequentialIdGenerator::new("fresh");
        let current = Assertion::new(GroupOp {
            id: "root".to_string(),
            children: vec![Op::status_code("a", Comparison::Equals, 200.0)],
        });

        let merged = merge_suggestion(&suggested, Some(&current), &generator);
        prop_assert_eq!(merged.root.children.len(), 2);

        let mut merged_ids = Vec::new();
        ids(&merged.root.children[1], &mut merged_ids);
        prop_assert!(merged_ids.iter().all(|id| id.starts_with("fresh-")));
        let unique: HashSet<_> = merged_ids.iter().collect();
        prop_assert_eq!(unique.len(), merged_ids.len());
        prop_assert_eq!(merged_ids.len(), suggested.node_count());
    }

    #[test]
    fn prop_wire_roundtrip_after_normalize(op in tree()) {
        let normalized = normalize(&op);
        let json = serde_json::to_string(&normalized).expect("serialize");
        let restored: Op = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(normalized, restored);
    }
}

#[test]
fn factory_ids_unique_across_constructors() {
    let factory = OpFactory::with_ids(Arc::new(UuidIdGenerator));
    let mut seen = HashSet::new();
    for _ in 0..250 {
        let root = factory.default_root();
        assert!(seen.insert(root.id.clone()));
        for child in &root.children {
            assert!(seen.insert(child.id().map(str::to_string).unwrap_or_default()));
        }
        assert!(seen.insert(factory.empty_root().id));
    }
    assert_eq!(seen.len(), 1000);
}

#[test]
fn edit_then_submit_flow() {
    let factory = OpFactory::with_ids(Arc::new(SequentialIdGenerator::new("n")));
    let assertion = factory.initial_assertion(None, false);

    let group = factory.create(AddOpKind::LogicalGroup);
    let group_id = group.id().map(str::to_string).unwrap_or_default();
    let root = append_child(&assertion.root, &assertion.root.id, group).expect("append group");
    let root = append_child(&root, &group_id, Op::status_code("blank", Comparison::Equals, f64::NAN))
        .expect("append status");

    let submitted = prepare_submission(Some(&Assertion::new(root))).expect("non-empty");
    let blank = find_op(&submitted.root, "blank").expect("kept");
    assert_eq!(blank, &Op::status_code("blank", Comparison::Equals, 200.0));
}
