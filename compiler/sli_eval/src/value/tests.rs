use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sli_ir::SharedInterner;

use super::*;

fn render(value: &Value, interner: &SharedInterner, mode: Render) -> String {
    value.display(interner, mode).to_string()
}

// Type tags

#[test]
fn type_tags_follow_variants() {
    let interner = SharedInterner::new();
    let name = interner.intern("x");
    assert_eq!(Value::Integer(1).type_tag(), TypeTag::Integer);
    assert_eq!(Value::Name(name).type_tag(), TypeTag::Name);
    assert_eq!(Value::LiteralName(name).type_tag(), TypeTag::Literal);
    assert_eq!(Value::procedure(vec![]).type_tag(), TypeTag::Procedure);
    assert_eq!(Value::array(vec![]).type_tag(), TypeTag::Array);
    assert_eq!(Value::Mark.type_tag(), TypeTag::Mark);
}

#[test]
fn type_names_round_trip() {
    for tag in TypeTag::ALL {
        assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
    }
    assert_eq!(TypeTag::from_name("floattype"), None);
}

// Executable flag

#[test]
fn cvx_and_cvlit_switch_pairs() {
    let interner = SharedInterner::new();
    let name = interner.intern("x");
    let lit = Value::LiteralName(name);
    assert!(!lit.is_executable());
    assert!(lit.to_executable().is_executable());
    assert_eq!(lit.to_executable().to_literal(), lit);

    let array = Value::array(vec![Value::Integer(1)]);
    assert_eq!(array.to_executable().type_tag(), TypeTag::Procedure);
    assert_eq!(Value::Integer(3).to_executable(), Value::Integer(3));
}

#[test]
fn converted_arrays_share_their_payload() {
    let array = Value::array(vec![Value::Integer(1)]);
    let (Value::Array(a), Value::Procedure(b)) = (&array, &array.to_executable()) else {
        panic!("unexpected variants");
    };
    assert!(Heap::ptr_eq(a, b));
}

// Equality

#[test]
fn numbers_compare_within_their_type() {
    assert!(Value::Integer(1).equals(&Value::Integer(1)));
    assert!(!Value::Integer(1).equals(&Value::Double(1.0)));
    assert!(Value::Double(0.5).equals(&Value::Double(0.5)));
}

#[test]
fn strings_compare_by_content() {
    let a = Value::string("ab");
    let b = Value::string(String::from("a") + "b");
    assert!(a.equals(&b));
    assert!(!a.equals(&Value::string("abc")));
    assert!(!a.equals(&Value::LiteralName(sli_ir::Name::EMPTY)));
}

#[test]
fn arrays_compare_by_content() {
    let a = Value::array(vec![Value::Integer(1), Value::string("x")]);
    let b = Value::array(vec![Value::Integer(1), Value::string("x")]);
    assert_eq!(a, b);
    assert_ne!(a, Value::procedure(vec![Value::Integer(1), Value::string("x")]));
}

#[test]
fn dictionaries_compare_by_identity() {
    let a = Value::dict(Dictionary::new());
    let b = Value::dict(Dictionary::new());
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}

// Copy-on-write

#[test]
fn make_mut_leaves_other_holders_untouched() {
    let original = Value::array(vec![Value::Integer(1)]);
    let mut copy = original.clone();
    if let Value::Array(items) = &mut copy {
        items.make_mut().push(Value::Integer(2));
    }
    assert_eq!(original.as_slice().map(<[Value]>::len), Some(1));
    assert_eq!(copy.as_slice().map(<[Value]>::len), Some(2));
}

// Rendering

#[test]
fn plain_and_syntax_forms() {
    let interner = SharedInterner::new();
    let lit = Value::LiteralName(interner.intern("abc"));
    let text = Value::string("a(b)");
    assert_eq!(render(&lit, &interner, Render::Plain), "abc");
    assert_eq!(render(&lit, &interner, Render::Syntax), "/abc");
    assert_eq!(render(&text, &interner, Render::Plain), "a(b)");
    assert_eq!(render(&text, &interner, Render::Syntax), "(a\\(b\\))");
}

#[test]
fn nested_values_render_in_syntax_form() {
    let interner = SharedInterner::new();
    let value = Value::array(vec![
        Value::Integer(1),
        Value::Double(2.0),
        Value::string("s"),
        Value::procedure(vec![Value::Name(interner.intern("dup"))]),
    ]);
    assert_eq!(
        render(&value, &interner, Render::Plain),
        "[1 2.0 (s) {dup}]"
    );
}

#[test]
fn ranges_render_their_bounds() {
    let interner = SharedInterner::new();
    let range = RangeIter::new(1, 10, 3).map(Value::Iterator);
    assert_eq!(
        range.map(|r| render(&r, &interner, Render::Syntax)),
        Some("<iteratortype 1..10:3>".to_string())
    );
}

// Ranges

#[test]
fn zero_step_is_rejected() {
    assert_eq!(RangeIter::new(1, 5, 0), None);
}

#[test]
fn range_elements() {
    let Some(range) = RangeIter::new(1, 10, 3) else {
        panic!("valid range");
    };
    assert_eq!(range.iter().collect::<Vec<_>>(), vec![1, 4, 7, 10]);
    let Some(down) = RangeIter::new(5, 1, -2) else {
        panic!("valid range");
    };
    assert_eq!(down.iter().collect::<Vec<_>>(), vec![5, 3, 1]);
    let Some(empty) = RangeIter::new(5, 1, 1) else {
        panic!("valid range");
    };
    assert!(empty.is_empty());
}

proptest! {
    #[test]
    fn range_len_matches_iteration(start in -50i64..50, stop in -50i64..50, step in 1i64..7) {
        let range = RangeIter::new(start, stop, step).ok_or_else(|| TestCaseError::fail("zero step"))?;
        let expected = (start..=stop).step_by(usize::try_from(step).unwrap_or(1)).count();
        prop_assert_eq!(range.len(), expected);
        prop_assert_eq!(range.iter().count(), expected);
    }
}
