use rstest::rstest;
use tir::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_const() {
    let x = constant_of(1, "int32").unwrap();
    assert_eq!(x.dtype().to_string(), "int32");
    assert!(matches!(x.kind(), ExprKind::IntImm(1)));
}

#[rstest]
#[case(ScalarValue::from(true), "bool")]
#[case(ScalarValue::from(1u8), "uint8")]
#[case(ScalarValue::from(1u16), "uint16")]
#[case(ScalarValue::from(1u32), "uint32")]
#[case(ScalarValue::from(1u64), "uint64")]
#[case(ScalarValue::from(1i8), "int8")]
#[case(ScalarValue::from(1i16), "int16")]
#[case(ScalarValue::from(1i32), "int32")]
#[case(ScalarValue::from(1i64), "int64")]
#[case(ScalarValue::from(1.0f32), "float32")]
#[case(ScalarValue::from(1.0f64), "float64")]
#[case(ScalarValue::UntypedInt(1), "int32")]
#[case(ScalarValue::UntypedFloat(1.0), "float32")]
fn test_scalar_dtype_inference(#[case] value: ScalarValue, #[case] expected: &str) {
    assert_eq!(constant(value).dtype().to_string(), expected);
    assert_eq!(Expr::from(value).dtype().to_string(), expected);
}

#[test]
fn test_make() {
    let x = constant_of(1, "int32").unwrap();
    let y = var("x");
    let z = (&x + &y).unwrap();
    assert_eq!(z.dtype().to_string(), "int32");
    assert!(matches!(
        max(&x, &y).unwrap().kind(),
        ExprKind::Binary {
            op: BinaryOpKind::Max,
            ..
        }
    ));
    assert!(matches!(
        min(&x, &y).unwrap().kind(),
        ExprKind::Binary {
            op: BinaryOpKind::Min,
            ..
        }
    ));
}

#[test]
fn test_ir() {
    let x = constant_of(1, "int32").unwrap();
    let y = constant_of(1, "int32").unwrap();
    let z = (x + y).unwrap();
    let stmt = Stmt::evaluate(z);
    assert!(matches!(stmt.kind(), StmtKind::Evaluate(_)));
}

#[test]
fn test_ir2() {
    let x = var("n");
    let a = var_of("array", "handle").unwrap();
    let st = Stmt::store(&a, (&x + 1).unwrap(), 1).unwrap();
    assert!(matches!(st.kind(), StmtKind::Store { .. }));
    let buffer_var = st.attr("buffer_var").unwrap();
    assert!(buffer_var.as_expr().unwrap().same_as(&a));
    assert_eq!(st.to_string(), "array[1] = (n + 1)\n");
}

#[test]
fn test_let() {
    let x = var("x");
    let stmt = Stmt::let_stmt(&x, 10, Stmt::evaluate((&x + 1).unwrap())).unwrap();
    assert_eq!(stmt.type_key(), "LetStmt");
}

#[test]
fn test_cast() {
    let x = var_of("x", "float32").unwrap();
    let y = x.astype("int32").unwrap();
    let z = x.astype("float32x4").unwrap();
    assert!(matches!(y.kind(), ExprKind::Cast(_)));
    assert!(matches!(z.kind(), ExprKind::Broadcast(_)));
    assert_eq!(z.lanes(), 4);
    assert_eq!(z.attr("lanes").unwrap().as_int(), Some(4));
}

#[test]
fn test_attr() {
    let x = var("x");
    let y = var("y");
    let stmt = Stmt::attr_stmt(&y, "stride", 10, Stmt::evaluate((&x + 1).unwrap()));
    assert_eq!(stmt.attr("node").unwrap(), AttrValue::Expr(y.clone()));

    let a = Expr::from(1);
    assert_eq!(a.attr("value").unwrap().as_int(), Some(1));
    let err = a.attr("no_field").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
}

#[test]
fn test_basic() {
    let a = var("a");
    let b = var("b");
    let c = (&a + &b).unwrap();
    assert_eq!(c.to_string(), format!("({} + {})", a.name().unwrap(), b.name().unwrap()));
}

#[test]
fn test_stmt() {
    let x = Stmt::evaluate(0);
    let stmt = Stmt::for_loop(&var("i"), 0, 1, ForKind::Serial, 0, x).unwrap();
    assert_eq!(stmt.to_string(), "for (i, 0, 1) {\n  0\n}\n");
}

#[test]
fn test_dir() {
    let x = var("x");
    assert_eq!(x.fields(), &["dtype", "name"]);
}

#[test]
fn test_dtype() {
    let x = var("x");
    assert_eq!(x.dtype().to_string(), "int32");
    let y = var("y");
    assert_eq!(x.gt(&y).unwrap().dtype().to_string(), "bool");
}

#[rstest]
#[case("any", "||")]
#[case("all", "&&")]
fn test_logical_combinators(#[case] name: &str, #[case] symbol: &str) {
    init_logger();
    let combine = |conds: Vec<Expr>| match name {
        "any" => any(conds),
        _ => all(conds),
    };
    let x = var("x");
    let y = var("y");
    let z = var("z");

    let err = x.short_circuit_or(&x).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousLogicalCombination);
    let err = x.short_circuit_and(&x).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousLogicalCombination);

    let err = combine(vec![]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCombinator);

    assert_eq!(combine(vec![x.lt(&y).unwrap()]).unwrap().to_string(), "(x < y)");
    assert_eq!(
        combine(vec![x.lt(&y).unwrap(), x.gt(&z).unwrap()])
            .unwrap()
            .to_string(),
        format!("((x < y) {} (x > z))", symbol)
    );
    assert_eq!(
        combine(vec![
            x.lt(&y).unwrap(),
            y.gt((&z + 1).unwrap()).unwrap(),
            x.lt((&z * 2).unwrap()).unwrap(),
        ])
        .unwrap()
        .to_string(),
        format!("(((x < y) {s} (y > (z + 1))) {s} (x < (z*2)))", s = symbol)
    );
}

#[test]
fn test_bitwise() {
    let x = var("x");
    let y = var("y");
    assert_eq!((&x << &y).unwrap().to_string(), "shift_left(x, y)");
    assert_eq!((&x >> &y).unwrap().to_string(), "shift_right(x, y)");
    assert_eq!((&x & &y).unwrap().to_string(), "bitwise_and(x, y)");
    assert_eq!((&x | &y).unwrap().to_string(), "bitwise_or(x, y)");
    assert_eq!((&x ^ &y).unwrap().to_string(), "bitwise_xor(x, y)");
    assert_eq!((10 & &x).unwrap().to_string(), "bitwise_and(10, x)");
    assert_eq!((10 | &x).unwrap().to_string(), "bitwise_or(10, x)");
    assert_eq!((10 ^ &x).unwrap().to_string(), "bitwise_xor(10, x)");
    assert_eq!((10 >> &x).unwrap().to_string(), "shift_right(10, x)");
    assert_eq!((10 << &x).unwrap().to_string(), "shift_left(10, x)");
    assert_eq!((10 % &x).unwrap().to_string(), "floormod(10, x)");
    assert_eq!((!&x).unwrap().to_string(), "bitwise_not(x)");

    let node = (constant_of(1, "int8x2").unwrap() >> 1).unwrap();
    assert_eq!(node.dtype().to_string(), "int8x2");
    let node = (&x >> constant_of(1, "int32x2").unwrap()).unwrap();
    assert_eq!(node.dtype().to_string(), "int32x2");
    let z = var_of("z", "int8x2").unwrap();
    let node = (&z << constant_of(1, "int8x2").unwrap()).unwrap();
    assert_eq!(node.dtype().to_string(), "int8x2");
}

#[test]
fn test_float_bitwise() {
    let t = constant_of(1.5, "float32").unwrap();
    let results = [&t << 10.0, &t >> 10.0, &t | 10.0, &t ^ 10.0, &t & 10.0];
    for result in results {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidBitwiseOperand);
    }
    let err = (!&t).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUnaryBitwiseOperand);
}

#[test]
fn test_isnan() {
    init_logger();
    let x = var_of("x", "float32").unwrap();
    assert_eq!(isnan(&x).unwrap().to_string(), "isnan(x)");
    assert_eq!(isnan(&x).unwrap().dtype().to_string(), "bool");
    let y = var_of("y", "float16").unwrap();
    assert_eq!(isnan(&y).unwrap().to_string(), "isnan(float32(y))");
    let z = var_of("z", "int32").unwrap();
    assert_eq!(isnan(&z).unwrap().to_string(), "(bool)0");
    let k = var_of("k", "int8x2").unwrap();
    assert_eq!(isnan(&k).unwrap().dtype().to_string(), "uint1x2");
}

#[test]
fn test_equality() {
    let a = var("a");
    let b = var("b");
    let c = a.equal(&b).unwrap();
    assert!(!c.truth_value().unwrap());
    let d = c.not_equal(&c).unwrap();
    assert!(!d.truth_value().unwrap());
}

#[test]
fn test_equality_string_imm() {
    let x = "a";
    let y = string_imm(x);
    assert_eq!(y.string_value(), Some(x));
    assert_eq!(y.attr("value").unwrap().as_str(), Some(x));
}

#[test]
fn test_nodes_are_shareable_across_threads() {
    let x = var("x");
    let node = (&x + 1).unwrap();
    let handle = std::thread::spawn(move || node.to_string());
    assert_eq!(handle.join().unwrap(), "(x + 1)");
}

#[test]
fn test_folded_casts_keep_cast_semantics() {
    assert_eq!(constant(300).astype("int8").unwrap().to_string(), "(int8)44");
    assert_eq!(constant(-1).astype("uint8").unwrap().to_string(), "(uint8)255");
    assert_eq!(constant(5).astype("bool").unwrap().to_string(), "(bool)1");
    assert_eq!(constant_of(300, "uint8").unwrap().int_value(), Some(44));
}

#[test]
fn test_dtypes_are_validated() {
    let err = DType::new(TypeCode::Int, 7, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDType);
    let err = DType::new(TypeCode::Float, 32, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDType);
    let f32x1: DType = "float32".parse().unwrap();
    assert_eq!(f32x1.to_lanes(0).unwrap_err().kind(), ErrorKind::InvalidDType);
    assert_eq!(f32x1.to_lanes(4).unwrap().to_string(), "float32x4");

    let buf = var_of("buf", "handle").unwrap();
    assert_eq!(broadcast(&buf, 4).unwrap_err().kind(), ErrorKind::DTypeMismatch);
}

#[test]
fn test_native_float_literal_is_float64() {
    let x = var("x");
    assert_eq!((&x * 0.5).unwrap().to_string(), "(float64(x)*0.5)");
    assert_eq!(
        (&x * ScalarValue::UntypedFloat(0.5)).unwrap().to_string(),
        "(float32(x)*0.5f)"
    );
    let y = var_of("y", "float32").unwrap();
    assert_eq!((&y * 0.5).unwrap().to_string(), "(y*0.5f)");
}
