//! `flagtree` is a command line flag parser and sub-command dispatcher for Rust.
//!
//! A program declares typed flags bound to its own variables, arranges them on a tree of commands, and hands the
//! process arguments to [`run`].
//! `flagtree` routes the arguments to the addressed command, parses its flags into their destinations, and calls that
//! command's handler with whatever is left over.
//! Specifically, `flagtree` attempts to prioritize the following design concerns:
//! * *Type safe flags*:
//! The user should not call any `&str -> T` conversion functions directly.
//! Every flag is bound to a destination of its own type (ex: `bool`, `i64`, [`std::time::Duration`]).
//! * *Declarative constraints*:
//! Cardinality, choices and validation are declared on the flag, and rejected inputs never reach the handler.
//! * *Sub-command paradigm*:
//! Commands nest to any depth, and a flag may be inherited by every command below the one declaring it.
//! * *Predictable exits*:
//! Every outcome of a run, including help and errors, becomes an exit code.
//! `flagtree` never terminates the process itself.
//!
//! # Usage
//! A single command:
//! ```no_run
#![doc = include_str!("../demos/ping.rs")]
//! ```
//!
//! ```console
//! $ ping -h
//! usage: ping [-h] [-c COUNT] [--ip IP]
//!
//! Send echo requests to a host.
//!
//! options:
//!  -h, --help                Show this help message and exit.
//!  -c COUNT, --count COUNT   Requests to send. (default: 4)
//!  --ip IP                   IP Address to ping. (default: 127.0.0.1)
//!
//! $ ping --ip=10.0.0.1 -c 1
//! ping: 10.0.0.1 seq=0
//!
//! $ ping --ip=256.0.0.1
//! Argument error: --ip: invalid IP: 256.0.0.1
//! ```
//!
//! A tree of commands:
//! ```no_run
#![doc = include_str!("../demos/widgets.rs")]
//! ```
//!
//! ```console
//! $ widgets create --name=foo --name=bar
//! Created new widgets: foo, bar
//!
//! $ widgets create
//! Parse error: --name: too few occurrences (provided=0, expected at least 1).
//!
//! $ widgets delete -v -f foo
//! Forcing delete.
//! Deleted widgets: foo
//!
//! $ widgets
//! usage: widgets [-h] [-v] COMMAND
//! Dispatch error: 'widgets' has no handler.
//! ```
//!
//! # Flags
//! Declare flags with the typed constructors on [`Flag`] (ex: [`Flag::string`], [`Flag::duration`]).
//! Each constructor writes its initial value into the destination immediately, and returns a [`FlagBuilder`] on
//! which further constraints are declared.
//! Destinations are either `&mut T`, or `&RefCell<T>` when the handler also needs to read them.
//!
//! * [`FlagBuilder::short`]: a single character alias, given as `-c`.
//! * [`FlagBuilder::nargs`]: how many times the flag may occur; a `min` of 1 makes it required, a `max` of 0 leaves it
//! unbounded.
//! * [`FlagBuilder::choices`]: the only literals accepted.
//! * [`FlagBuilder::validate`]: a predicate over the literal, run before it is converted.
//! * [`FlagBuilder::inherited`]: the flag is also accepted by every sub-command.
//! * [`FlagBuilder::hidden`]: the flag is parsed, but left out of help.
//!
//! Any type implementing [`prelude::Value`] may be used via [`Flag::var`], while [`Flag::func`] hands each literal to
//! a closure.
//!
//! On the command line, a flag's value is given as `--name value`, `--name=value`, `-c value`, `-cvalue` or `-c=value`.
//! Boolean flags may be given bare (ex: `--verbose`), in which case they are set to `true`.
//! The `--` token ends flag parsing; everything after it is handed to the handler as is.
//!
//! # Commands
//! A [`CommandBuilder`] collects flags, sub-commands and a handler.
//! The handler receives the arguments left after routing and flag parsing, and returns the exit code of the run.
//! A command without a handler only routes; reaching it prints the usage and fails.
//!
//! Use [`CommandBuilder::output`] to redirect the normal and diagnostic output (ex: to capture it in tests).
//!
//! # Errors
//! Every error is reported on the diagnostic output and turned into an exit code of 1:
//! * [`ConfigError`]: the declared flags or commands are inconsistent (ex: two flags named `verbose`).
//! * [`ParseError`]: the arguments do not fit the declared flags or commands.
//!
//! Help (`-h` or `--help`) is printed to the normal output and exits with 0.
//!
//! # Features
//! * `tracing_debug`: emit `tracing` events while matching tokens.
pub use flagtree_builder::*;
