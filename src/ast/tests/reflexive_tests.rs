use super::*;

#[test]
fn test_distinct_operands_resolve_false() {
    let a = var("a");
    let b = var("b");
    assert_eq!(resolve_boolean(&a.equal(&b).unwrap()), Some(false));
    assert_eq!(resolve_boolean(&a.not_equal(&b).unwrap()), Some(false));
}

#[test]
fn test_identical_operands_resolve_by_operator() {
    let a = var("a");
    assert_eq!(resolve_boolean(&a.equal(&a).unwrap()), Some(true));
    assert_eq!(resolve_boolean(&a.not_equal(&a).unwrap()), Some(false));
}

#[test]
fn test_comparison_of_comparison() {
    let a = var("a");
    let b = var("b");
    let c = a.equal(&b).unwrap();
    assert!(!c.truth_value().unwrap());

    let d = c.not_equal(&c).unwrap();
    assert!(!d.truth_value().unwrap());

    let e = c.equal(&c).unwrap();
    assert!(e.truth_value().unwrap());
}

#[test]
fn test_structurally_equal_but_distinct_is_false() {
    let a = var("a");
    let lhs = (&a + 1).unwrap();
    let rhs = (&a + 1).unwrap();
    assert_eq!(lhs, rhs);
    assert_eq!(resolve_boolean(&lhs.equal(&rhs).unwrap()), Some(false));
}

#[test]
fn test_literals_resolve_to_value() {
    assert_eq!(resolve_boolean(&constant(true)), Some(true));
    assert_eq!(resolve_boolean(&constant(0)), Some(false));
    assert_eq!(resolve_boolean(&isnan(var("z")).unwrap()), Some(false));
    assert_eq!(resolve_boolean(&var("z")), None);
}
