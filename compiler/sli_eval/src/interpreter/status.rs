//! `statusdict`, `errordict` and the error record.

use sli_ir::StringInterner;

use super::builder::InterpreterConfig;
use super::names::WellKnownNames;
use super::Interpreter;
use crate::dict::Dictionary;
use crate::errors::SliError;
use crate::exec_stack::ExecEntry;
use crate::message::M_ERROR;
use crate::value::{Name, Render, Value};

/// Symbolic outcomes in `statusdict/exitcodes`.
pub const EXIT_CODES: [(&str, i32); 9] = [
    ("success", 0),
    ("unknownerror", 10),
    ("userabort", 15),
    ("exception", 125),
    ("scripterror", 126),
    ("fatal", 127),
    ("abort", 134),
    ("segmentation_fault", 139),
    ("skipped", 200),
];

/// Host-side copy of `errordict`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorRecord {
    /// An error has been raised and not yet reported or cleared.
    pub newerror: bool,
    pub errorname: Option<String>,
    pub commandname: Option<String>,
    pub message: Option<String>,
    /// Stack snapshots, present when `recordstacks` was set at raise time.
    pub ostack: Option<Vec<Value>>,
    pub estack: Option<Vec<Value>>,
    pub dstack: Option<Vec<Value>>,
}

pub(super) fn build_errordict(names: &WellKnownNames, record_stacks: bool) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.force_insert(names.newerror, Value::Bool(false));
    dict.force_insert(names.recordstacks, Value::Bool(record_stacks));
    dict
}

pub(super) fn build_statusdict(
    config: &InterpreterConfig,
    interner: &StringInterner,
    names: &WellKnownNames,
) -> Dictionary {
    let mut dict = Dictionary::new();
    let mut set = |key: &str, value: Value| dict.force_insert(interner.intern(key), value);

    set(
        "argv",
        Value::array(config.argv.iter().map(Value::string).collect()),
    );
    set("prgname", Value::string(config.program_name.as_str()));
    set("version", Value::string(config.version.as_str()));
    set("prefix", Value::string(config.prefix.as_str()));
    set("prgdatadir", Value::string(config.data_dir.as_str()));
    set("prgdocdir", Value::string(config.doc_dir.as_str()));
    set(
        "host",
        Value::string(format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS)),
    );
    set("hostos", Value::string(std::env::consts::OS));
    set("hostcpu", Value::string(std::env::consts::ARCH));
    set("threading", Value::string("no"));
    set("have_threads", Value::Bool(false));

    let mut exitcodes = Dictionary::with_capacity(EXIT_CODES.len());
    for (key, code) in EXIT_CODES {
        exitcodes.force_insert(interner.intern(key), Value::Integer(i64::from(code)));
    }
    exitcodes.protect();

    let vars: Vec<(String, String)> = match &config.environment {
        Some(vars) => vars.clone(),
        None => std::env::vars().collect(),
    };
    let mut environment = Dictionary::with_capacity(vars.len());
    for (key, value) in vars {
        environment.force_insert(interner.intern(&key), Value::string(value));
    }
    environment.protect();
    set("environment", Value::dict(environment));

    dict.force_insert(names.exitcodes, Value::dict(exitcodes));
    dict.force_insert(names.exitcode, Value::Integer(0));
    dict
}

impl Interpreter {
    /// Code bound under `key` in `statusdict/exitcodes`.
    pub fn exit_code_for(&self, key: &str) -> Option<i32> {
        let status = self.statusdict.borrow();
        let Some(Value::Dict(codes)) = status.get(self.names.exitcodes) else {
            return None;
        };
        let code = codes.borrow().get(self.name(key))?.as_int()?;
        i32::try_from(code).ok()
    }

    /// Current `statusdict/exitcode`.
    pub fn exit_code(&self) -> i32 {
        self.statusdict
            .borrow()
            .get(self.names.exitcode)
            .and_then(Value::as_int)
            .and_then(|code| i32::try_from(code).ok())
            .unwrap_or(0)
    }

    /// Whether an error is active in `errordict`.
    pub fn has_active_error(&self) -> bool {
        self.errordict
            .borrow()
            .get(self.names.newerror)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub(crate) fn set_newerror(&self, active: bool) {
        self.errordict
            .borrow_mut()
            .force_insert(self.names.newerror, Value::Bool(active));
    }

    fn records_stacks(&self) -> bool {
        self.errordict
            .borrow()
            .get(self.names.recordstacks)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Fill `errordict` for an error raised by `command`.
    pub(crate) fn record_error(&mut self, command: Name, errorname: Name, message: Option<String>) {
        let names = self.names;
        let snapshot = self.records_stacks().then(|| self.stack_snapshot());
        let mut record = self.errordict.borrow_mut();
        record.force_insert(names.newerror, Value::Bool(true));
        record.force_insert(names.errorname, Value::LiteralName(errorname));
        record.force_insert(names.commandname, Value::LiteralName(command));
        match message {
            Some(text) => record.force_insert(names.message, Value::string(text)),
            None => {
                record.force_remove(names.message);
            }
        }
        if let Some((ostack, estack, dstack)) = snapshot {
            record.force_insert(names.ostack, Value::array(ostack));
            record.force_insert(names.estack, Value::array(estack));
            record.force_insert(names.dstack, Value::array(dstack));
        }
    }

    /// Operand, execution and dictionary stacks as arrays, bottom first.
    /// Continuation frames appear as literal names such as `/%loop`.
    fn stack_snapshot(&self) -> (Vec<Value>, Vec<Value>, Vec<Value>) {
        let ostack = self.ostack.as_slice().to_vec();
        let estack = self
            .estack
            .entries()
            .iter()
            .map(|entry| match entry {
                ExecEntry::Value(v) => v.clone(),
                ExecEntry::Frame(frame) => Value::LiteralName(self.name(frame.label())),
            })
            .collect();
        (ostack, estack, self.dstack.to_values())
    }

    /// Host-side copy of the error record.
    pub fn error_record(&self) -> ErrorRecord {
        let names = self.names;
        let record = self.errordict.borrow();
        let spelled = |key: Name| {
            record
                .get(key)
                .and_then(Value::as_name)
                .map(|n| self.spell(n).to_string())
        };
        let array = |key: Name| record.get(key).and_then(Value::as_slice).map(<[Value]>::to_vec);
        ErrorRecord {
            newerror: record
                .get(names.newerror)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            errorname: spelled(names.errorname),
            commandname: spelled(names.commandname),
            message: record
                .get(names.message)
                .and_then(Value::as_str)
                .map(str::to_string),
            ostack: array(names.ostack),
            estack: array(names.estack),
            dstack: array(names.dstack),
        }
    }

    /// Print the active error as `Error: /Name in command` and mark it handled.
    pub fn report_error(&mut self) {
        let record = self.error_record();
        if !record.newerror {
            return;
        }
        if self.config.verbosity <= M_ERROR {
            let mut text = format!(
                "Error: /{} in {}",
                record.errorname.as_deref().unwrap_or("UnknownError"),
                record.commandname.as_deref().unwrap_or("unknown")
            );
            if let Some(message) = &record.message {
                for line in message.lines() {
                    text.push_str("\n    ");
                    text.push_str(line);
                }
            }
            if let Some(ostack) = &record.ostack {
                text.push_str("\n    operand stack:");
                for value in ostack.iter().rev() {
                    text.push_str("\n      ");
                    text.push_str(&value.display(&*self.interner, Render::Syntax).to_string());
                }
            }
            self.print_handler.eprintln(&text);
        }
        self.set_newerror(false);
    }

    /// Convert a host error into the record and start unwinding.
    pub(crate) fn raise_error(&mut self, command: Name, err: SliError) {
        let errorname = self.name(err.kind.name());
        self.raise_named(command, errorname, err.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::InterpreterBuilder;
    use crate::print_handler::silent_handler;
    use pretty_assertions::assert_eq;

    fn interp() -> Interpreter {
        InterpreterBuilder::new()
            .print_handler(silent_handler())
            .environment(vec![("HOME".to_string(), "/home/sli".to_string())])
            .build()
    }

    #[test]
    fn exit_codes_are_published() {
        let interp = interp();
        for (key, code) in EXIT_CODES {
            assert_eq!(interp.exit_code_for(key), Some(code), "{key}");
        }
        assert_eq!(interp.exit_code_for("nonsense"), None);
        assert_eq!(interp.exit_code(), 0);
    }

    #[test]
    fn fresh_record_is_inactive() {
        let interp = interp();
        assert_eq!(interp.error_record(), ErrorRecord::default());
        assert!(!interp.has_active_error());
    }

    #[test]
    fn environment_mirror_is_protected() {
        let interp = interp();
        let status = interp.statusdict().borrow();
        let Some(Value::Dict(env)) = status.get(interp.name("environment")) else {
            panic!("environment missing");
        };
        let env = env.borrow();
        assert!(env.is_protected());
        assert_eq!(
            env.get(interp.name("HOME")).and_then(Value::as_str),
            Some("/home/sli")
        );
    }
}
