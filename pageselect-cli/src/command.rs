//! Parsing of interactive commands.

use pageselect_lib::model::ItemId;
use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Goto(u32),
    Toggle(ItemId),
    /// Raw count text; validated by the controller.
    Select(String),
    Clear,
    Render,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("'{0}' is not a page number")]
    InvalidPage(String),
}

pub const HELP: &str = "\
commands:
  n, next          next page
  p, prev          previous page
  g, goto N        jump to page N
  t, toggle ID     select/deselect one row
  s, select N      select N rows in total, continuing on later pages
  c, clear         clear the selection
  r, render        show the table again
  h, help          this help
  q, quit          exit";

impl Command {
    /// Parses a line. Blank lines parse as `Render`.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Self::Render);
        };
        let rest: Vec<&str> = words.collect();
        let arg = rest.join(" ");

        match name.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "g" | "goto" => {
                let text = require(&arg, "goto", "a page number")?;
                text.parse::<u32>()
                    .ok()
                    .filter(|&page| page > 0)
                    .map(Self::Goto)
                    .ok_or_else(|| CommandError::InvalidPage(text.to_string()))
            }
            "t" | "toggle" => {
                let text = require(&arg, "toggle", "a row id")?;
                Ok(Self::Toggle(ItemId::parse(text)))
            }
            "s" | "select" => {
                let text = require(&arg, "select", "a row count")?;
                Ok(Self::Select(text.to_string()))
            }
            "c" | "clear" => Ok(Self::Clear),
            "r" | "render" => Ok(Self::Render),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn require<'a>(
    arg: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument { command, what })
    } else {
        Ok(arg)
    }
}
