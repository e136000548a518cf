//! `InterpreterBuilder` and the configuration it carries.

use std::sync::atomic::AtomicI32;
use std::sync::Arc;

use sli_ir::SharedInterner;

use super::guard::CycleGuard;
use super::names::WellKnownNames;
use super::status;
use super::Interpreter;
use crate::builtins;
use crate::debugger::{DebugInput, Debugger, StdinDebugInput};
use crate::dict::{DictStack, Dictionary};
use crate::exec_stack::ExecStack;
use crate::message::{M_ALL, M_INFO};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::shared::LocalScope;
use crate::stack::OperandStack;
use crate::value::{NativeFunction, Value};

/// Startup configuration of an interpreter.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    /// Minimum level a message needs to be shown.
    pub verbosity: i32,
    /// Debug mode: forces `M_ALL` and disables tail-call elision.
    pub debug: bool,
    pub tail_call_elision: bool,
    /// Enter the debugger when an error is not caught by `stopped`.
    pub catch_errors: bool,
    /// Snapshot the three stacks into the error record on every raise.
    pub record_stacks: bool,
    /// Arm the cycle guard for this many cycles at startup.
    pub cycle_guard: Option<u64>,
    pub argv: Vec<String>,
    pub program_name: String,
    pub version: String,
    pub prefix: String,
    pub data_dir: String,
    pub doc_dir: String,
    /// Variables mirrored into `statusdict/environment`; `None` reads the
    /// process environment.
    pub environment: Option<Vec<(String, String)>>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        let prefix = "/usr/local".to_string();
        InterpreterConfig {
            verbosity: M_INFO,
            debug: false,
            tail_call_elision: true,
            catch_errors: false,
            record_stacks: false,
            cycle_guard: None,
            argv: Vec::new(),
            program_name: "sli".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: format!("{prefix}/share/sli"),
            doc_dir: format!("{prefix}/share/doc/sli"),
            prefix,
            environment: None,
        }
    }
}

/// Builder for creating `Interpreter` instances.
pub struct InterpreterBuilder {
    config: InterpreterConfig,
    interner: Option<SharedInterner>,
    print_handler: Option<SharedPrintHandler>,
    debug_input: Option<Box<dyn DebugInput>>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            config: InterpreterConfig::default(),
            interner: None,
            print_handler: None,
            debug_input: None,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn verbosity(mut self, level: i32) -> Self {
        self.config.verbosity = level;
        self
    }

    #[must_use]
    pub fn debug(mut self, on: bool) -> Self {
        self.config.debug = on;
        self
    }

    #[must_use]
    pub fn tail_call_elision(mut self, on: bool) -> Self {
        self.config.tail_call_elision = on;
        self
    }

    #[must_use]
    pub fn catch_errors(mut self, on: bool) -> Self {
        self.config.catch_errors = on;
        self
    }

    #[must_use]
    pub fn record_stacks(mut self, on: bool) -> Self {
        self.config.record_stacks = on;
        self
    }

    #[must_use]
    pub fn cycle_guard(mut self, cycles: u64) -> Self {
        self.config.cycle_guard = Some(cycles);
        self
    }

    #[must_use]
    pub fn argv(mut self, argv: Vec<String>) -> Self {
        self.config.argv = argv;
        self
    }

    #[must_use]
    pub fn environment(mut self, vars: Vec<(String, String)>) -> Self {
        self.config.environment = Some(vars);
        self
    }

    /// Share a name table with the host.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Set where user-visible output goes. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set where the debugger reads commands from. Default is stdin.
    #[must_use]
    pub fn debug_input(mut self, input: Box<dyn DebugInput>) -> Self {
        self.debug_input = Some(input);
        self
    }

    /// Build the interpreter and bind the primitive library.
    pub fn build(self) -> Interpreter {
        let interner = self.interner.unwrap_or_default();
        let names = WellKnownNames::new(&interner);

        let mut config = self.config;
        if config.debug {
            config.verbosity = M_ALL;
        }

        let systemdict = LocalScope::new(Dictionary::new());
        let userdict = LocalScope::new(Dictionary::new());
        let errordict = LocalScope::new(status::build_errordict(&names, config.record_stacks));
        let statusdict = LocalScope::new(status::build_statusdict(&config, &interner, &names));

        let mut dstack = DictStack::new(systemdict.clone());
        dstack.push_scope(userdict.clone());
        dstack.seal();

        let mut guard = CycleGuard::new();
        if let Some(limit) = config.cycle_guard {
            guard.arm(limit);
        }

        let mut debugger = Debugger::new(
            self.debug_input
                .unwrap_or_else(|| Box::new(StdinDebugInput)),
        );
        debugger.set_catch_errors(config.catch_errors);

        let stop_fn = Value::function(NativeFunction::new(names.stop, builtins::control::stop));

        let mut interp = Interpreter {
            interner,
            names,
            ostack: OperandStack::new(),
            estack: ExecStack::new(),
            dstack,
            systemdict,
            userdict,
            statusdict,
            errordict,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            config,
            guard,
            signal: Arc::new(AtomicI32::new(0)),
            current: names.execute,
            debugger,
            callback: None,
            stop_fn,
            exit_request: None,
            unguarded_errors: 0,
        };

        if let Err(err) = builtins::register_all(&mut interp) {
            tracing::error!(%err, "failed to bind the primitive library");
        }
        interp
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
