use pretty_assertions::assert_eq;

use super::*;
use crate::value::Heap;

fn body() -> Heap<Vec<Value>> {
    match Value::procedure(vec![Value::Integer(1)]) {
        Value::Procedure(items) => items,
        _ => unreachable!(),
    }
}

fn drain(mut counter: ForCounter) -> Vec<Value> {
    std::iter::from_fn(|| counter.advance()).collect()
}

// ForCounter

#[test]
fn integer_counter_is_inclusive() {
    assert_eq!(
        drain(ForCounter::integer(1, 2, 7)),
        vec![
            Value::Integer(1),
            Value::Integer(3),
            Value::Integer(5),
            Value::Integer(7)
        ]
    );
    assert_eq!(
        drain(ForCounter::integer(3, -1, 1)),
        vec![Value::Integer(3), Value::Integer(2), Value::Integer(1)]
    );
}

#[test]
fn counter_past_limit_yields_nothing() {
    assert!(drain(ForCounter::integer(5, 1, 1)).is_empty());
    assert!(drain(ForCounter::integer(1, 0, 5)).is_empty());
    assert!(drain(ForCounter::double(0.0, 0.0, 1.0)).is_empty());
}

#[test]
fn counter_stops_at_integer_overflow() {
    let values = drain(ForCounter::integer(i64::MAX - 1, 1, i64::MAX));
    assert_eq!(
        values,
        vec![Value::Integer(i64::MAX - 1), Value::Integer(i64::MAX)]
    );
}

#[test]
fn double_counter() {
    assert_eq!(
        drain(ForCounter::double(0.0, 0.5, 1.0)),
        vec![Value::Double(0.0), Value::Double(0.5), Value::Double(1.0)]
    );
}

// ForallSource

#[test]
fn entries_push_key_and_value() {
    let mut ostack = OperandStack::new();
    let interner = sli_ir::SharedInterner::new();
    let key = interner.intern("k");
    let source = ForallSource::Entries(vec![(key, Value::Integer(4))]);
    assert!(source.push_item(0, &mut ostack));
    assert_eq!(
        ostack.as_slice(),
        &[Value::LiteralName(key), Value::Integer(4)]
    );
    assert!(!source.push_item(1, &mut ostack));
    assert_eq!(ostack.len(), 2);
}

#[test]
fn strings_yield_bytes() {
    let mut ostack = OperandStack::new();
    let Value::String(text) = Value::string("AB") else {
        unreachable!()
    };
    let source = ForallSource::Bytes(text);
    assert!(source.push_item(1, &mut ostack));
    assert_eq!(ostack.as_slice(), &[Value::Integer(66)]);
}

// ExecStack

#[test]
fn call_depth_counts_iterate_frames() {
    let mut estack = ExecStack::new();
    estack.push_frame(Frame::Iterate { proc: body(), pos: 0 });
    estack.push_frame(Frame::Loop { proc: body(), pos: 0 });
    estack.push_frame(Frame::Iterate { proc: body(), pos: 0 });
    assert_eq!(estack.call_depth(), 2);

    estack.truncate(1);
    assert_eq!(estack.call_depth(), 1);
    estack.clear();
    assert_eq!(estack.call_depth(), 0);
}

#[test]
fn rfind_frame_returns_nearest() {
    let mut estack = ExecStack::new();
    estack.push_frame(Frame::Stopped);
    estack.push_value(Value::Integer(1));
    estack.push_frame(Frame::Stopped);
    estack.push_value(Value::Integer(2));
    assert_eq!(
        estack.rfind_frame(|f| matches!(f, Frame::Stopped)),
        Some(2)
    );
    assert_eq!(estack.rfind_frame(Frame::is_loop), None);
}

#[test]
fn peak_tracks_high_water() {
    let mut estack = ExecStack::new();
    for i in 0..5 {
        estack.push_value(Value::Integer(i));
    }
    estack.truncate(1);
    assert_eq!(estack.peak(), 5);
    estack.push_value(Value::Integer(9));
    assert_eq!(estack.peak(), 5);
}

#[test]
fn frame_labels() {
    let indexed = Frame::Forall {
        source: ForallSource::Elements(body()),
        index: 0,
        body: Value::procedure(vec![]),
        indexed: true,
    };
    assert_eq!(indexed.label(), "%forallindexed");
    assert!(indexed.is_loop());
    assert!(!Frame::Stopped.is_loop());
    assert_eq!(Frame::Stopped.label(), "%stopped");
}
