//! Dictionary stack behaviour.

use pretty_assertions::assert_eq;
use sli_eval::Value;

use crate::common::{run, stack_of};

#[test]
fn bindings_in_a_scope_vanish_with_it() {
    let (interp, _) = run("<< >> begin /x 1 def x end /x lookup");
    assert_eq!(crate::common::rendered(&interp), "1 false");
    assert_eq!(interp.lookup("x"), None);
    assert_eq!(interp.dict_stack().depth(), 2);
}

#[test]
fn inner_scopes_shadow_outer_ones() {
    assert_eq!(
        stack_of("/x 1 def << /x 2 >> begin x end x"),
        "2 1"
    );
}

#[test]
fn scopes_are_aliased_dictionaries() {
    assert_eq!(
        stack_of("<< >> dup begin /x 7 def end /x get"),
        "7"
    );
}

#[test]
fn forget_only_looks_at_the_current_scope() {
    let (interp, _) = run("/x 1 def << >> begin /x forget");
    let record = interp.error_record();
    assert_eq!(record.errorname.as_deref(), Some("UndefinedName"));
    assert_eq!(record.commandname.as_deref(), Some("forget"));
    assert_eq!(interp.lookup("x"), Some(Value::Integer(1)));
}

#[test]
fn procedures_resolve_names_when_they_run() {
    assert_eq!(
        stack_of("/g { x } def /x 1 def g << /x 2 >> begin g end"),
        "1 2"
    );
}

#[test]
fn permanent_scopes_survive_cleardictstack() {
    let (interp, _) = run("<< >> begin << >> begin cleardictstack countdictstack");
    assert_eq!(crate::common::rendered(&interp), "2");
    assert!(!interp.has_active_error());
}
