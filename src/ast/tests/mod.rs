use super::helper::*;
use super::*;
use crate::error::ErrorKind;

mod reflexive_tests;

#[test]
fn test_var_identity_is_by_reference() {
    let a = var("x");
    let b = var("x");
    assert!(!a.same_as(&b));
    assert_ne!(a, b);

    let a2 = a.clone();
    assert!(a.same_as(&a2));
    assert_eq!(a, a2);
}

#[test]
fn test_structural_equality_of_literals() {
    assert_eq!(constant(1), constant(1));
    assert_ne!(constant(1), constant(1i64));
    assert_ne!(constant(1), constant(2));
}

#[test]
fn test_operands_in_order() {
    let x = var("x");
    let y = var("y");
    let node = (&x - &y).unwrap();
    let operands = node.operands();
    assert_eq!(operands.len(), 2);
    assert!(operands[0].same_as(&x));
    assert!(operands[1].same_as(&y));
    assert!(x.operands().is_empty());
}

#[test]
fn test_short_circuit_is_rejected() {
    let x = var("x");
    let cond = x.lt(1).unwrap();
    for result in [
        x.short_circuit_and(&x),
        x.short_circuit_or(&x),
        cond.short_circuit_and(&cond),
    ] {
        assert_eq!(
            result.unwrap_err().kind(),
            ErrorKind::AmbiguousLogicalCombination
        );
    }
}

#[test]
fn test_truth_value_of_symbolic_node_is_ambiguous() {
    let x = var("x");
    let y = var("y");
    let err = x.lt(&y).unwrap().truth_value().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousLogicalCombination);
    assert!(x.truth_value().is_err());
}
