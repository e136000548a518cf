//! Overload resolution through type tries.

use pretty_assertions::assert_eq;
use sli_eval::{buffer_handler, Interpreter, SliResult, TypeTag, Value};

use crate::common::{builder, rendered, stack_of};

/// Replace both operands with a string naming the variant that ran.
fn mark_variant(interp: &mut Interpreter, variant: &str) -> SliResult {
    interp.operand_stack_mut().drop_n(2)?;
    interp.operand_stack_mut().push(Value::string(variant));
    Ok(())
}

fn combine_ii(interp: &mut Interpreter) -> SliResult {
    mark_variant(interp, "ii")
}

fn combine_dd(interp: &mut Interpreter) -> SliResult {
    mark_variant(interp, "dd")
}

fn with_combine() -> Interpreter {
    let out = buffer_handler();
    let mut interp = builder(&out).build();
    interp
        .register_variant("combine", &[TypeTag::Integer, TypeTag::Integer], "combine_ii", combine_ii)
        .expect("register");
    interp
        .register_variant("combine", &[TypeTag::Double, TypeTag::Double], "combine_dd", combine_dd)
        .expect("register");
    interp
}

#[test]
fn exact_signatures_are_selected() {
    let mut interp = with_combine();
    interp.execute_str("1 2 combine 1.0 2.0 combine");
    assert_eq!(rendered(&interp), "(ii) (dd)");
}

#[test]
fn mixed_operands_are_not_promoted() {
    let mut interp = with_combine();
    interp.execute_str("1 2.0 combine");
    let record = interp.error_record();
    assert_eq!(record.errorname.as_deref(), Some("ArgumentType"));
    assert_eq!(record.commandname.as_deref(), Some("combine"));
    assert_eq!(rendered(&interp), "1 2.0 /combine");
}

#[test]
fn too_few_operands_underflow() {
    let mut interp = with_combine();
    interp.execute_str("1 combine");
    assert_eq!(
        interp.error_record().errorname.as_deref(),
        Some("StackUnderflow")
    );
}

#[test]
fn script_and_host_variants_share_a_trie() {
    let mut interp = with_combine();
    interp.execute_str(
        "/combine load [/stringtype /stringtype] { pop pop (ss) } addtotrie pop \
         (a) (b) combine 3 4 combine",
    );
    assert_eq!(rendered(&interp), "(ss) (ii)");
}

#[test]
fn procedure_handlers_run_like_procedures() {
    assert_eq!(
        stack_of(
            "/twice trie [/anytype] { dup } addtotrie [/integertype] { 2 mul } addtotrie \
             /twice exch def 21 twice (s) twice"
        ),
        "42 (s) (s)"
    );
}

#[test]
fn variants_are_listed() {
    let mut interp = with_combine();
    interp.execute_str("/combine load cva length");
    assert_eq!(rendered(&interp), "4");
}
