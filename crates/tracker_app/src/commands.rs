use tracker_core::{Company, UnknownCompany};

pub const HELP_TEXT: &str = "\
Commands:
  scrape <company>   scrape one of: microsoft brex jobber notion intercom zoominfo circleci
  cleanup            delete old postings
  refresh            reload the job list (alias: list)
  help               show this help
  quit               exit (alias: exit)";

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Scrape(Company),
    Cleanup,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("usage: scrape <company>")]
    MissingCompany,
    #[error(transparent)]
    UnknownCompany(#[from] UnknownCompany),
    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(String),
}

/// Parses one prompt line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Result<Command, CommandError>> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();

    let parsed = match verb.as_str() {
        "scrape" => match rest.as_slice() {
            [] => Err(CommandError::MissingCompany),
            [company] => company.parse().map(Command::Scrape).map_err(Into::into),
            _ => Err(CommandError::UnexpectedArgument(rest[1..].join(" "))),
        },
        "cleanup" => no_arguments(Command::Cleanup, &verb, &rest),
        "refresh" | "list" => no_arguments(Command::Refresh, &verb, &rest),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(verb)),
    };
    Some(parsed)
}

fn no_arguments(command: Command, verb: &str, rest: &[&str]) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::UnexpectedArgument(verb.to_string()))
    }
}
