use std::env;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::Flag;
use crate::constant::*;
use crate::parser::base::*;
use crate::parser::interface::UserInterface;
use crate::parser::printer::{CommandParameter, OptionParameter, Printer};

pub(crate) type Handler<'a> = Box<dyn FnMut(&[String]) -> i32 + 'a>;

/// One level of the command tree.
pub(crate) struct CommandNode<'a> {
    name: String,
    about: Option<String>,
    flags: Vec<Flag<'a>>,
    children: Vec<CommandNode<'a>>,
    handler: Option<Handler<'a>>,
}

impl<'a> CommandNode<'a> {
    pub(crate) fn new(
        name: String,
        about: Option<String>,
        flags: Vec<Flag<'a>>,
        children: Vec<CommandNode<'a>>,
        handler: Option<Handler<'a>>,
    ) -> Self {
        Self {
            name,
            about,
            flags,
            children,
            handler,
        }
    }

    fn child(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name == name)
    }

    /// Restore every flag in this subtree to its declared initial value.
    fn rewind(&mut self) {
        for flag in self.flags.iter_mut() {
            flag.rewind();
        }

        for child in self.children.iter_mut() {
            child.rewind();
        }
    }
}

/// Where the leading tokens of a command line lead.
#[derive(Debug, PartialEq, Eq)]
struct Route {
    /// Child indices from the root to the resolved node.
    path: Vec<usize>,
    /// The root name followed by each routed command name.
    program: String,
    /// How many tokens the routing consumed.
    offset: usize,
}

/// The built command tree, ready to run against command lines.
///
/// Built via [`CommandBuilder::build`](crate::CommandBuilder::build).
pub struct Command<'a> {
    root: CommandNode<'a>,
    user_interface: Box<dyn UserInterface + 'a>,
    terminal_width: Option<usize>,
}

impl<'a> std::fmt::Debug for Command<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Command[{}]", self.root.name)
    }
}

impl<'a> Command<'a> {
    pub(crate) fn new(
        root: CommandNode<'a>,
        user_interface: Box<dyn UserInterface + 'a>,
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            root,
            user_interface,
            terminal_width,
        }
    }

    /// The name of the root command.
    pub fn name(&self) -> &str {
        &self.root.name
    }

    /// Run the command tree against the input tokens, returning the exit code.
    ///
    /// Dispatch happens in three steps:
    /// 1. Leading positional tokens which name a sub-command route into it.
    /// Routing stops at the first flag token, or the first positional which names no sub-command.
    /// 2. The remaining tokens are matched against the flags reachable from the resolved command.
    /// Each literal is written into its flag's destination as soon as it is seen.
    /// 3. The resolved command's handler is called with the positional arguments.
    ///
    /// If at any point an error is encountered (ex: unknown flag, rejected literal, etc), it is reported on the diagnostic output and the exit code is `1`.
    ///
    /// If the help switch (`-h` or `--help`) is encountered, help for the resolved command is printed and the exit code is `0`.
    /// The handler is not called.
    ///
    /// If the resolved command has no handler, its usage is printed on the diagnostic output and the exit code is `1`.
    pub fn run(&mut self, tokens: &[&str]) -> i32 {
        let Command {
            root,
            user_interface,
            terminal_width,
        } = self;

        // Every run starts from the declared initial values, across the whole tree.
        root.rewind();

        let route = match route(root, tokens) {
            Ok(route) => route,
            Err(error) => {
                user_interface.print_error(error);
                return 1;
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Routed {tokens:?} to {route:?}.");
        }

        let action = match Parser::new(reachable_flags(root, &route.path)) {
            Ok(parser) => parser.consume(&tokens[route.offset..]),
            Err(error) => unreachable!(
                "internal error - reachable flags are checked when the command is built: {error}"
            ),
        };
        let printer = printer(root, &route, *terminal_width);

        match action {
            Ok(Action::PrintHelp) => {
                printer.print_help(&**user_interface);
                0
            }
            Err(error) => {
                user_interface.print_error(error);
                1
            }
            Ok(Action::Continue { positionals }) => {
                let Route { path, program, .. } = route;

                match resolve_mut(root, &path).handler.as_mut() {
                    Some(handler) => {
                        #[cfg(feature = "tracing_debug")]
                        {
                            debug!("Invoking '{program}' with {positionals:?}.");
                        }

                        handler(positionals.as_slice())
                    }
                    None => {
                        printer.print_usage(&**user_interface);
                        user_interface.print_error(ParseError::NoHandler(program));
                        1
                    }
                }
            }
        }
    }

    /// Run the command tree against the process arguments ([`env::args`], less the program name).
    pub fn run_env(&mut self) -> i32 {
        let arguments: Vec<String> = env::args().skip(1).collect();
        self.run(
            arguments
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        )
    }
}

fn is_flag_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

fn route(root: &CommandNode<'_>, tokens: &[&str]) -> Result<Route, ParseError> {
    let mut node = root;
    let mut path = Vec::default();
    let mut program = root.name.clone();
    let mut offset = 0;

    for token in tokens {
        if is_flag_token(token) || *token == TERMINATOR {
            break;
        }

        match node.child(token) {
            Some(index) => {
                path.push(index);
                node = &node.children[index];
                program.push(' ');
                program.push_str(token);
            }
            None if node.handler.is_none() && !node.children.is_empty() => {
                return Err(ParseError::UnknownCommand {
                    program,
                    command: token.to_string(),
                });
            }
            // The rest belongs to the resolved command.
            None => break,
        }

        offset += 1;
    }

    Ok(Route {
        path,
        program,
        offset,
    })
}

/// The flags visible at the node under `path`: the inherited flags of its ancestors, then its own.
fn reachable_flags<'n, 'a>(root: &'n mut CommandNode<'a>, path: &[usize]) -> Vec<&'n mut Flag<'a>> {
    let mut flags = Vec::default();
    let mut node = root;

    for index in path {
        let CommandNode {
            flags: own,
            children,
            ..
        } = node;
        flags.extend(own.iter_mut().filter(|flag| flag.is_inherited()));
        node = &mut children[*index];
    }

    flags.extend(node.flags.iter_mut());
    flags
}

fn resolve_mut<'n, 'a>(root: &'n mut CommandNode<'a>, path: &[usize]) -> &'n mut CommandNode<'a> {
    path.iter()
        .fold(root, |node, index| &mut node.children[*index])
}

fn printer(root: &CommandNode<'_>, route: &Route, terminal_width: Option<usize>) -> Printer {
    let mut options = Vec::default();
    let mut node = root;

    for index in &route.path {
        options.extend(
            node.flags
                .iter()
                .filter(|flag| flag.is_inherited() && !flag.is_hidden())
                .map(OptionParameter::from),
        );
        node = &node.children[*index];
    }

    options.extend(
        node.flags
            .iter()
            .filter(|flag| !flag.is_hidden())
            .map(OptionParameter::from),
    );
    let commands = node
        .children
        .iter()
        .map(|child| CommandParameter::new(child.name.clone(), child.about.clone()))
        .collect();

    Printer::new(
        route.program.clone(),
        node.about.clone(),
        commands,
        node.handler.is_none(),
        options,
        terminal_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::InMemoryInterface;
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::cell::RefCell;

    fn node<'a>(
        name: &str,
        flags: Vec<Flag<'a>>,
        children: Vec<CommandNode<'a>>,
        handler: Option<Handler<'a>>,
    ) -> CommandNode<'a> {
        CommandNode::new(name.to_string(), None, flags, children, handler)
    }

    fn recorder(received: &RefCell<Option<Vec<String>>>, code: i32) -> Handler<'_> {
        Box::new(move |arguments: &[String]| {
            received.replace(Some(arguments.to_vec()));
            code
        })
    }

    #[rstest]
    #[case(vec![], vec![], 0)]
    #[case(vec!["create"], vec![0], 1)]
    #[case(vec!["create", "x"], vec![0], 1)]
    #[case(vec!["create", "--name", "delete"], vec![0], 1)]
    #[case(vec!["delete", "all"], vec![1, 0], 2)]
    #[case(vec!["delete", "--", "all"], vec![1], 1)]
    #[case(vec!["delete", "x", "all"], vec![1], 1)]
    #[case(vec!["x", "delete", "y"], vec![], 0)]
    fn route_tokens(#[case] tokens: Vec<&str>, #[case] path: Vec<usize>, #[case] offset: usize) {
        // Setup
        let received = RefCell::new(None);
        let root = node(
            "widgets",
            vec![],
            vec![
                node("create", vec![], vec![], Some(recorder(&received, 0))),
                node(
                    "delete",
                    vec![],
                    vec![node("all", vec![], vec![], Some(recorder(&received, 0)))],
                    Some(recorder(&received, 0)),
                ),
            ],
            Some(recorder(&received, 0)),
        );

        // Execute
        let result = route(&root, tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(result.path, path);
        assert_eq!(result.offset, offset);
    }

    #[test]
    fn route_unknown_command() {
        let root = node("widgets", vec![], vec![node("create", vec![], vec![], None)], None);

        assert_eq!(
            route(&root, &["bogus"]).unwrap_err(),
            ParseError::UnknownCommand {
                program: "widgets".to_string(),
                command: "bogus".to_string(),
            }
        );
    }

    #[test]
    fn run_widgets() {
        // Setup
        let names = RefCell::new(Vec::default());
        let received = RefCell::new(None);
        let create = node(
            "create",
            vec![Flag::strings(&names, "name", Vec::default(), "Widget name.")
                .nargs(1, 0)
                .must()],
            vec![],
            Some(recorder(&received, 0)),
        );
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node("widgets", vec![], vec![create], None),
            Box::new(interface.clone()),
            None,
        );

        // Execute
        let code = command.run(&["create", "--name=foo", "--name=bar"]);

        // Verify
        assert_eq!(code, 0);
        assert_eq!(*names.borrow(), vec!["foo".to_string(), "bar".to_string()]);
        assert_eq!(*received.borrow(), Some(vec![]));
        assert_eq!(interface.consume(), (None, None));
    }

    #[test]
    fn run_handler_code() {
        let received = RefCell::new(None);
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node("program", vec![], vec![], Some(recorder(&received, 7))),
            Box::new(interface.clone()),
            None,
        );

        assert_eq!(command.run(&["a", "--", "-b"]), 7);
        assert_eq!(
            *received.borrow(),
            Some(vec!["a".to_string(), "-b".to_string()])
        );
    }

    #[rstest]
    #[case(vec!["--help"], "usage: widgets [-h] [-v] COMMAND")]
    #[case(vec!["-h", "--moot"], "usage: widgets [-h] [-v] COMMAND")]
    #[case(vec!["create", "-h"], "usage: widgets create [-h] --name NAME ... [-v]")]
    #[case(vec!["create", "--name=x", "--help", "--name"], "usage: widgets create [-h] --name NAME ... [-v]")]
    fn run_help(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        // Setup
        let verbose = RefCell::new(false);
        let names = RefCell::new(Vec::default());
        let received = RefCell::new(None);
        let create = node(
            "create",
            vec![Flag::strings(&names, "name", Vec::default(), "")
                .nargs(1, 0)
                .must()],
            vec![],
            Some(recorder(&received, 0)),
        );
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node(
                "widgets",
                vec![Flag::bool(&verbose, "v", false, "").inherited().must()],
                vec![create],
                None,
            ),
            Box::new(interface.clone()),
            None,
        );

        // Execute
        let code = command.run(tokens.as_slice());

        // Verify
        assert_eq!(code, 0);
        assert_eq!(*received.borrow(), None);
        let message = interface.consume_message();
        assert_contains!(message, expected);
        assert_contains!(message, "-h, --help");
    }

    #[test]
    fn run_help_hidden() {
        let mut secret = String::default();
        let mut shown = String::default();
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node(
                "program",
                vec![
                    Flag::string(&mut secret, "secret", "", "").hidden().must(),
                    Flag::string(&mut shown, "shown", "", "").must(),
                ],
                vec![],
                None,
            ),
            Box::new(interface.clone()),
            None,
        );

        assert_eq!(command.run(&["--help"]), 0);
        let message = interface.consume_message();
        assert_contains!(message, "--shown");
        assert!(!message.contains("secret"), "{message}");
    }

    #[test]
    fn run_no_handler() {
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node("widgets", vec![], vec![node("create", vec![], vec![], None)], None),
            Box::new(interface.clone()),
            None,
        );

        assert_eq!(command.run(&[]), 1);
        assert_eq!(
            interface.consume_diagnostic(),
            "usage: widgets [-h] COMMAND\nDispatch error: 'widgets' has no handler."
        );

        assert_eq!(command.run(&["create"]), 1);
        assert_eq!(
            interface.consume_diagnostic(),
            "usage: widgets create [-h]\nDispatch error: 'widgets create' has no handler."
        );
    }

    #[test]
    fn run_unknown_command() {
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node("widgets", vec![], vec![node("create", vec![], vec![], None)], None),
            Box::new(interface.clone()),
            None,
        );

        assert_eq!(command.run(&["bogus"]), 1);
        assert_eq!(
            interface.consume_diagnostic(),
            "Parse error: unknown command 'bogus' for 'widgets'."
        );
    }

    #[test]
    fn run_inherited() {
        // Setup
        let verbose = RefCell::new(false);
        let local = RefCell::new(String::default());
        let received = RefCell::new(None);
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node(
                "widgets",
                vec![
                    Flag::bool(&verbose, "verbose", false, "").inherited().must(),
                    Flag::string(&local, "local", "", "").must(),
                ],
                vec![node("create", vec![], vec![], Some(recorder(&received, 0)))],
                None,
            ),
            Box::new(interface.clone()),
            None,
        );

        // Execute & Verify
        assert_eq!(command.run(&["create", "--verbose"]), 0);
        assert!(*verbose.borrow());

        assert_eq!(command.run(&["create", "--local=x"]), 1);
        assert_eq!(
            interface.consume_diagnostic(),
            "Parse error: --local: flag provided but not defined."
        );
        assert_eq!(*local.borrow(), "");
    }

    #[test]
    fn run_argument_error() {
        let mut ip = String::default();
        let received = RefCell::new(None);
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node(
                "ping",
                vec![Flag::string(&mut ip, "ip", "127.0.0.1", "")
                    .validate(|literal| {
                        if literal.split('.').all(|part| part.parse::<u8>().is_ok()) {
                            Ok(())
                        } else {
                            Err(format!("invalid IP: {literal}"))
                        }
                    })
                    .must()],
                vec![],
                Some(recorder(&received, 0)),
            ),
            Box::new(interface.clone()),
            None,
        );

        assert_eq!(command.run(&["--ip", "256.0.0.1"]), 1);
        assert_eq!(*received.borrow(), None);
        assert_eq!(
            interface.consume_diagnostic(),
            "Argument error: --ip: invalid IP: 256.0.0.1"
        );
    }

    #[test]
    fn run_cardinality() {
        let mut name = String::default();
        let received = RefCell::new(None);
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node(
                "program",
                vec![Flag::string(&mut name, "name", "", "").nargs(1, 1).must()],
                vec![],
                Some(recorder(&received, 0)),
            ),
            Box::new(interface.clone()),
            None,
        );

        assert_eq!(command.run(&[]), 1);
        assert_matches!(interface.consume(), (None, Some(diagnostic)) => {
            assert_contains!(diagnostic, "--name: too few occurrences");
        });
        assert_eq!(*received.borrow(), None);
    }

    #[test]
    fn run_rerun() {
        let names = RefCell::new(Vec::default());
        let received = RefCell::new(None);
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node(
                "program",
                vec![Flag::strings(&names, "name", Vec::default(), "").must()],
                vec![],
                Some(recorder(&received, 0)),
            ),
            Box::new(interface.clone()),
            None,
        );

        assert_eq!(command.run(&["--name=a", "--name=b"]), 0);
        assert_eq!(*names.borrow(), vec!["a".to_string(), "b".to_string()]);

        assert_eq!(command.run(&["--name=c"]), 0);
        assert_eq!(*names.borrow(), vec!["c".to_string()]);

        assert_eq!(command.run(&[]), 0);
        assert!(names.borrow().is_empty());
    }

    #[test]
    fn run_rerun_sibling() {
        // Setup
        let names = RefCell::new(Vec::default());
        let seen = RefCell::new(None);
        let received = RefCell::new(None);
        let create = node(
            "create",
            vec![Flag::strings(&names, "name", vec!["default".to_string()], "").must()],
            vec![],
            Some(recorder(&received, 0)),
        );
        let list = node(
            "list",
            vec![],
            vec![],
            Some(Box::new(|_: &[String]| {
                seen.replace(Some(names.borrow().clone()));
                0
            })),
        );
        let interface = InMemoryInterface::default();
        let mut command = Command::new(
            node("widgets", vec![], vec![create, list], None),
            Box::new(interface.clone()),
            None,
        );

        // Execute
        assert_eq!(command.run(&["create", "--name=a"]), 0);
        assert_eq!(command.run(&["list"]), 0);

        // Verify
        assert_eq!(*seen.borrow(), Some(vec!["default".to_string()]));
    }

    #[test]
    fn run_positional_before_command() {
        // Setup
        let root_received = RefCell::new(None);
        let sub_received = RefCell::new(None);
        let mut command = Command::new(
            node(
                "program",
                vec![],
                vec![node("sub", vec![], vec![], Some(recorder(&sub_received, 2)))],
                Some(recorder(&root_received, 0)),
            ),
            Box::new(InMemoryInterface::default()),
            None,
        );

        // Execute
        let code = command.run(&["file", "sub"]);

        // Verify
        assert_eq!(code, 0);
        assert_eq!(
            *root_received.borrow(),
            Some(vec!["file".to_string(), "sub".to_string()])
        );
        assert_eq!(*sub_received.borrow(), None);
    }
}
