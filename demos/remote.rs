use std::cell::RefCell;
use std::process;
use std::time::Duration;

use flagtree::prelude::*;
use flagtree::{run_env, CommandBuilder, Flag, InvalidValue, Nargs};

/// Collects `KEY=VALUE` pairs.
struct Environment<'e>(&'e RefCell<Vec<(String, String)>>);

impl<'e> Value for Environment<'e> {
    fn set(&mut self, literal: &str) -> Result<(), InvalidValue> {
        match literal.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                self.0
                    .borrow_mut()
                    .push((key.to_string(), value.to_string()));
                Ok(())
            }
            _ => Err(InvalidValue::Custom(format!("expected KEY=VALUE, got '{literal}'"))),
        }
    }

    fn nargs(&self) -> Nargs {
        Nargs::AtLeast(0)
    }

    fn rewind(&mut self) {
        self.0.borrow_mut().clear();
    }
}

fn main() {
    let host = RefCell::new(String::default());
    let timeout = RefCell::new(Duration::ZERO);
    let transport = RefCell::new(String::default());
    let retries = RefCell::new(0u64);
    let environment = RefCell::new(Vec::default());

    let command = CommandBuilder::new("remote")
        .about("Operate on a remote host.")
        .flags([
            Flag::string(&host, "host", "localhost", "Remote host name.").inherited(),
            Flag::duration(&timeout, "timeout", Duration::from_secs(30), "Connection timeout.")
                .inherited(),
        ])
        .flag(
            Flag::func("trace", "Trace level.", |literal: &str| -> Result<(), String> {
                let level: u8 = literal.parse().map_err(|_| format!("not a level: {literal}"))?;
                eprintln!("trace level {level}");
                Ok(())
            })
            .hidden(),
        )
        .subcommand(
            CommandBuilder::new("exec")
                .about("Execute a program on the host.")
                .flag(
                    Flag::string(&transport, "transport", "ssh", "How to connect.")
                        .short('t')
                        .choices(["ssh", "mosh"]),
                )
                .flag(Flag::var(
                    Environment(&environment),
                    "env",
                    "Environment variable, as KEY=VALUE.",
                ))
                .handler(|arguments| {
                    let Some((program, rest)) = arguments.split_first() else {
                        eprintln!("exec: missing PROGRAM");
                        return 2;
                    };

                    println!(
                        "{} {} (timeout {:?}): {program} {}",
                        transport.borrow(),
                        host.borrow(),
                        timeout.borrow(),
                        rest.join(" ")
                    );
                    for (key, value) in environment.borrow().iter() {
                        println!("  {key}={value}");
                    }
                    0
                }),
        )
        .subcommand(
            CommandBuilder::new("probe")
                .about("Check that the host answers.")
                .flag(Flag::uint64(&retries, "retries", 3, "Attempts before giving up."))
                .handler(|_| {
                    println!(
                        "probing {} up to {} time(s) within {:?}",
                        host.borrow(),
                        retries.borrow(),
                        timeout.borrow()
                    );
                    0
                }),
        );

    process::exit(run_env(command));
}
