use std::cell::RefCell;
use std::process;

use flagtree::{run_env, CommandBuilder, Flag};

fn main() {
    let verbose = RefCell::new(false);
    let names = RefCell::new(Vec::default());
    let force = RefCell::new(false);

    let command = CommandBuilder::new("widgets")
        .about("Manage the widget inventory.")
        .flag(
            Flag::bool(&verbose, "verbose", false, "Describe each step.")
                .short('v')
                .inherited(),
        )
        .subcommand(
            CommandBuilder::new("create")
                .about("Create new widgets.")
                .flag(Flag::strings(&names, "name", Vec::default(), "Widget name.").nargs(1, 0))
                .handler(|_| {
                    if *verbose.borrow() {
                        println!("Creating {} widget(s).", names.borrow().len());
                    }
                    println!("Created new widgets: {}", names.borrow().join(", "));
                    0
                }),
        )
        .subcommand(
            CommandBuilder::new("delete")
                .about("Delete widgets by name.")
                .flag(Flag::bool(&force, "f", false, "Delete even when in use."))
                .handler(|arguments| {
                    if arguments.is_empty() {
                        eprintln!("delete: no widgets named");
                        return 2;
                    }

                    if *verbose.borrow() && *force.borrow() {
                        println!("Forcing delete.");
                    }
                    println!("Deleted widgets: {}", arguments.join(", "));
                    0
                }),
        );

    process::exit(run_env(command));
}
