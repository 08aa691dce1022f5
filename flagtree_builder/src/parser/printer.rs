use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::model::Nargs;
use crate::parser::interface::{chunk, ColumnRenderer, UserInterface};

/// What help shows for one flag.
#[derive(Debug, Clone)]
pub(crate) struct OptionParameter {
    name: Option<String>,
    short: Option<char>,
    nargs: Nargs,
    boolean: bool,
    usage: String,
    choices: Option<Vec<String>>,
    default: Option<String>,
}

impl OptionParameter {
    #[cfg(test)]
    fn basic(name: &str, short: Option<char>, nargs: Nargs, usage: &str) -> Self {
        Self::new(
            Some(name.to_string()),
            short,
            nargs,
            false,
            usage.to_string(),
            None,
            None,
        )
    }

    pub(crate) fn new(
        name: Option<String>,
        short: Option<char>,
        nargs: Nargs,
        boolean: bool,
        usage: String,
        choices: Option<Vec<String>>,
        default: Option<String>,
    ) -> Self {
        Self {
            name,
            short,
            nargs,
            boolean,
            usage,
            choices,
            default,
        }
    }

    fn sort_key(&self) -> String {
        match (&self.name, self.short) {
            (Some(name), _) => name.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::default(),
        }
    }

    fn grammar(&self) -> String {
        if self.boolean {
            return "".to_string();
        }

        let name_example = match (&self.name, self.short) {
            (Some(name), _) => name.to_ascii_uppercase().replace('-', "_"),
            (None, Some(short)) => short.to_ascii_uppercase().to_string(),
            (None, None) => "VALUE".to_string(),
        };

        format!(" {name_example}")
    }

    fn summary(&self) -> String {
        let grammar = self.grammar();
        let token = match (&self.name, self.short) {
            (_, Some(short)) => format!("-{short}{grammar}"),
            (Some(name), None) => format!("--{name}{grammar}"),
            (None, None) => grammar,
        };
        let token = if self.nargs.is_repeatable() {
            format!("{token} ...")
        } else {
            token
        };

        if self.nargs.is_required() {
            token
        } else {
            format!("[{token}]")
        }
    }

    fn flags(&self) -> String {
        let grammar = self.grammar();

        match (&self.name, self.short) {
            (Some(name), Some(short)) => format!("-{short}{grammar}, --{name}{grammar}"),
            (Some(name), None) => format!("--{name}{grammar}"),
            (None, Some(short)) => format!("-{short}{grammar}"),
            (None, None) => grammar,
        }
    }

    fn description(&self) -> String {
        let mut parts = Vec::default();

        if let Some(choices) = &self.choices {
            parts.push(format!("{{{}}}", choices.join(", ")));
        }

        if !self.usage.is_empty() {
            parts.push(self.usage.clone());
        }

        if let Some(default) = &self.default {
            parts.push(format!("(default: {default})"));
        }

        parts.join(" ")
    }
}

/// What help shows for one sub-command.
#[derive(Debug, Clone)]
pub(crate) struct CommandParameter {
    name: String,
    about: Option<String>,
}

impl CommandParameter {
    pub(crate) fn new(name: String, about: Option<String>) -> Self {
        Self { name, about }
    }
}

/// The width of the attached terminal, if there is one.
pub(crate) fn terminal_width() -> Option<usize> {
    if let Some((Width(terminal_width), _)) = terminal_size() {
        Some(terminal_width as usize)
    } else {
        None
    }
}

pub(crate) struct Printer {
    program: String,
    about: Option<String>,
    commands: Vec<CommandParameter>,
    command_required: bool,
    options: Vec<OptionParameter>,
    terminal_width: Option<usize>,
}

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

impl Printer {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new("program", None, Vec::default(), false, Vec::default(), None)
    }

    pub(crate) fn new(
        program: impl Into<String>,
        about: Option<String>,
        commands: Vec<CommandParameter>,
        command_required: bool,
        mut options: Vec<OptionParameter>,
        terminal_width: Option<usize>,
    ) -> Self {
        options.sort_by_key(OptionParameter::sort_key);

        Self {
            program: program.into(),
            about,
            commands,
            command_required,
            options,
            terminal_width,
        }
    }

    fn usage(&self) -> String {
        let mut summary = vec![format!("[-{HELP_SHORT}]")];
        summary.extend(self.options.iter().map(OptionParameter::summary));

        if !self.commands.is_empty() {
            if self.command_required {
                summary.push("COMMAND".to_string());
            } else {
                summary.push("[COMMAND]".to_string());
            }
        }

        format!("usage: {p} {s}", p = self.program, s = summary.join(" "))
    }

    /// Print the one line usage, ex: after a failed dispatch.
    pub(crate) fn print_usage(&self, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print_diagnostic(self.usage());
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        let help_flags = format!("-{HELP_SHORT}, --{HELP_NAME}");
        let option_rows: Vec<(String, String)> = self
            .options
            .iter()
            .map(|option| (option.flags(), option.description()))
            .collect();
        let command_rows: Vec<(String, String)> = self
            .commands
            .iter()
            .map(|command| (command.name.clone(), command.about.clone().unwrap_or_default()))
            .collect();
        let mut left_column_width = help_flags.chars().count();
        let mut middle_column_width = HELP_MESSAGE.len() + MAIN_INDENT;

        for (left, middle) in option_rows.iter().chain(command_rows.iter()) {
            left_column_width = std::cmp::max(left_column_width, left.chars().count());
            middle_column_width =
                std::cmp::max(middle_column_width, middle.chars().count() + MAIN_INDENT);
        }

        let column_renderer = match self.terminal_width {
            Some(total_width) => ColumnRenderer::guided(
                PADDING_WIDTH,
                left_column_width,
                middle_column_width,
                total_width,
            ),
            None => ColumnRenderer::new(PADDING_WIDTH, left_column_width, None),
        };

        user_interface.print(self.usage());

        if let Some(about) = &self.about {
            user_interface.print("".to_string());

            match self.terminal_width {
                Some(total_width) => {
                    for line in chunk(about, total_width) {
                        user_interface.print(line);
                    }
                }
                None => user_interface.print(about.clone()),
            }
        }

        if !command_rows.is_empty() {
            user_interface.print("".to_string());
            user_interface.print("commands:".to_string());

            for (name, about) in &command_rows {
                for line in column_renderer.render(MAIN_INDENT, name, about) {
                    user_interface.print(line);
                }
            }
        }

        user_interface.print("".to_string());
        user_interface.print("options:".to_string());

        for line in column_renderer.render(MAIN_INDENT, &help_flags, HELP_MESSAGE) {
            user_interface.print(line);
        }

        for (flags, description) in &option_rows {
            for line in column_renderer.render(MAIN_INDENT, flags, description) {
                user_interface.print(line);
            }
        }
    }
}
