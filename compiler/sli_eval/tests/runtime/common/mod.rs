//! Shared helpers for the runtime tests.

use sli_eval::{buffer_handler, Interpreter, InterpreterBuilder, Render, SharedPrintHandler};

/// A builder with captured output and an empty environment mirror.
pub fn builder(out: &SharedPrintHandler) -> InterpreterBuilder {
    Interpreter::builder()
        .print_handler(out.clone())
        .environment(Vec::new())
}

/// Run `source` in a fresh interpreter.
pub fn run(source: &str) -> (Interpreter, SharedPrintHandler) {
    let out = buffer_handler();
    let mut interp = builder(&out).build();
    interp.execute_str(source);
    (interp, out)
}

/// The operand stack in `==` form, bottom first.
pub fn rendered(interp: &Interpreter) -> String {
    interp
        .operand_stack()
        .iter()
        .map(|v| v.display(interp.interner(), Render::Syntax).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn stack_of(source: &str) -> String {
    rendered(&run(source).0)
}
