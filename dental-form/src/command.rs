//! Line-oriented command language driving the document model
//!
//! Each line is one input event: a field edit, a toggle, an add or remove of
//! a row, a bullet text edit, a file name edit or an export request. Lines
//! come from a person (interactive session) or a script file, so unlike the
//! model itself this layer validates indices and reports problems as errors.

use crate::document_model::DocumentModel;
use crate::exporter::{self, Export, ExportError};
use crate::location::{FieldPath, LocationError, RepeatedGroup, Toggle};
use thiserror::Error;

/// Usage summary printed by the `help` command
pub const HELP: &str = "\
Commands:
  set <location> <value>       Set a text field (e.g. set sections[0].headingBold Implants)
  toggle <toggle> <true|false> Switch isLinkCards or isLinkBlocks
  add <group>                  Append an empty row to a group
  remove <group> <index>       Remove a row (the last row of a group is kept)
  bullets <section> <text>     Set the bullet points of a section, separated by ',' or '•'
  name <text>                  Set the export file name
  export                       Write the JSON file
  show                         Print the JSON that would be exported
  help                         Show this message
  quit                         End the session

Groups: callToActions, sections, linkCards, linkBlocks
Values may be wrapped in double quotes to use escapes such as \\n or keep surrounding spaces.";

/// Errors for a single command line
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help' for a list of commands)")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Unexpected input after '{command}': {extra}")]
    TrailingInput {
        command: &'static str,
        extra: String,
    },

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Invalid index '{0}'")]
    InvalidIndex(String),

    #[error("Invalid value '{0}' (expected true or false)")]
    InvalidBool(String),

    #[error("Invalid quoted value: {0}")]
    InvalidValue(#[source] serde_json::Error),

    #[error("Index {index} is out of range for {group} ({len} rows)")]
    IndexOutOfBounds {
        group: RepeatedGroup,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One parsed input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(FieldPath, String),
    Toggle(Toggle, bool),
    Add(RepeatedGroup),
    Remove(RepeatedGroup, usize),
    Bullets(usize, String),
    Name(String),
    Export,
    Show,
    Help,
    Quit,
}

/// What applying a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model changed
    Updated,
    /// The command was valid but left the model as it was
    Unchanged(String),
    /// File name and payload ready to be saved
    Exported(Export),
    /// Current snapshot as JSON
    Show(String),
    Help,
    Quit,
}

/// Parse one input line
///
/// # Parameters
/// * `line` - Raw input line, with or without trailing newline
///
/// # Returns
/// * `Ok(Some(Command))` - Parsed command
/// * `Ok(None)` - Blank line or `#` comment
/// * `Err(CommandError)` - Unknown command or bad arguments
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = split_word(line);

    let command = match keyword {
        "set" => {
            let (location, value) = split_word(rest);
            if location.is_empty() {
                return Err(missing("set", "a location and a value"));
            }
            Command::Set(location.parse()?, decode_value(value)?)
        }
        "toggle" => {
            let (toggle, value) = split_word(rest);
            if toggle.is_empty() || value.is_empty() {
                return Err(missing("toggle", "a toggle name and true or false"));
            }
            Command::Toggle(toggle.parse()?, parse_bool(value)?)
        }
        "add" => {
            let (group, extra) = split_word(rest);
            if group.is_empty() {
                return Err(missing("add", "a group name"));
            }
            no_trailing("add", extra)?;
            Command::Add(group.parse()?)
        }
        "remove" => {
            let (group, rest) = split_word(rest);
            let (index, extra) = split_word(rest);
            if group.is_empty() || index.is_empty() {
                return Err(missing("remove", "a group name and an index"));
            }
            no_trailing("remove", extra)?;
            Command::Remove(group.parse()?, parse_index(index)?)
        }
        "bullets" => {
            let (index, text) = split_word(rest);
            if index.is_empty() {
                return Err(missing("bullets", "a section index and bullet text"));
            }
            Command::Bullets(parse_index(index)?, decode_value(text)?)
        }
        "name" => Command::Name(decode_value(rest)?),
        "export" => bare("export", rest, Command::Export)?,
        "show" => bare("show", rest, Command::Show)?,
        "help" => bare("help", rest, Command::Help)?,
        "quit" | "exit" => bare("quit", rest, Command::Quit)?,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

/// Apply a command to the model
///
/// Indices are checked against the model before it is touched, so a bad
/// index from user input becomes an error rather than a panic.
///
/// # Returns
/// * `Ok(Outcome)` - What the command did
/// * `Err(CommandError)` - Index out of range or export failed; the model is unchanged
pub fn apply(model: &mut DocumentModel, command: Command) -> Result<Outcome, CommandError> {
    match command {
        Command::Set(path, value) => {
            if let Some((group, index)) = path.row() {
                check_index(model, group, index)?;
            }
            model.set_scalar_field(path, value);
            Ok(Outcome::Updated)
        }
        Command::Toggle(toggle, value) => {
            model.set_boolean_field(toggle, value);
            Ok(Outcome::Updated)
        }
        Command::Add(group) => {
            model.append_repeated_item(group);
            Ok(Outcome::Updated)
        }
        Command::Remove(group, index) => {
            check_index(model, group, index)?;
            if model.group_len(group) == 1 {
                return Ok(Outcome::Unchanged(format!(
                    "{} must keep at least one row",
                    group
                )));
            }
            model.remove_repeated_item(group, index);
            Ok(Outcome::Updated)
        }
        Command::Bullets(index, text) => {
            check_index(model, RepeatedGroup::Sections, index)?;
            model.set_raw_bullet_text(index, text);
            Ok(Outcome::Updated)
        }
        Command::Name(name) => {
            model.set_file_name(name);
            Ok(Outcome::Updated)
        }
        Command::Export => Ok(Outcome::Exported(model.export()?)),
        Command::Show => Ok(Outcome::Show(exporter::serialize(&model.snapshot())?)),
        Command::Help => Ok(Outcome::Help),
        Command::Quit => Ok(Outcome::Quit),
    }
}

/// Split off the first whitespace-delimited word
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

/// Decode a value argument, honoring JSON string quoting
fn decode_value(value: &str) -> Result<String, CommandError> {
    let value = value.trim();
    if value.starts_with('"') {
        serde_json::from_str(value).map_err(CommandError::InvalidValue)
    } else {
        Ok(value.to_string())
    }
}

fn parse_index(text: &str) -> Result<usize, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidIndex(text.to_string()))
}

fn parse_bool(text: &str) -> Result<bool, CommandError> {
    match text.trim() {
        "true" | "on" | "yes" => Ok(true),
        "false" | "off" | "no" => Ok(false),
        other => Err(CommandError::InvalidBool(other.to_string())),
    }
}

fn bare(command: &'static str, rest: &str, parsed: Command) -> Result<Command, CommandError> {
    no_trailing(command, rest)?;
    Ok(parsed)
}

fn no_trailing(command: &'static str, extra: &str) -> Result<(), CommandError> {
    if extra.trim().is_empty() {
        Ok(())
    } else {
        Err(CommandError::TrailingInput {
            command,
            extra: extra.trim().to_string(),
        })
    }
}

fn missing(command: &'static str, expected: &'static str) -> CommandError {
    CommandError::MissingArgument { command, expected }
}

fn check_index(
    model: &DocumentModel,
    group: RepeatedGroup,
    index: usize,
) -> Result<(), CommandError> {
    let len = model.group_len(group);
    if index < len {
        Ok(())
    } else {
        Err(CommandError::IndexOutOfBounds { group, index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{DescriptionField, LinkBlockField, RootField};

    fn parse(line: &str) -> Command {
        parse_line(line)
            .unwrap_or_else(|e| panic!("{line}: {e}"))
            .unwrap_or_else(|| panic!("{line}: no command"))
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   \n").unwrap().is_none());
        assert!(parse_line("# hero section").unwrap().is_none());
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse("set headingBold Smile Restoration"),
            Command::Set(
                FieldPath::Root(RootField::HeadingBold),
                "Smile Restoration".to_string()
            )
        );
        assert_eq!(
            parse("set linkBlocks[1].subTitle"),
            Command::Set(FieldPath::LinkBlock(1, LinkBlockField::SubTitle), String::new())
        );
    }

    #[test]
    fn test_parse_quoted_value() {
        assert_eq!(
            parse(r#"set sections[0].description.paragraph1 "  Line one\nSay \"cheese\"  ""#),
            Command::Set(
                FieldPath::SectionDescription(0, DescriptionField::Paragraph1),
                "  Line one\nSay \"cheese\"  ".to_string()
            )
        );
        assert!(matches!(
            parse_line(r#"name "unterminated"#),
            Err(CommandError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_toggle_add_remove() {
        assert_eq!(
            parse("toggle isLinkCards true"),
            Command::Toggle(Toggle::IsLinkCards, true)
        );
        assert_eq!(
            parse("toggle isLinkBlocks off"),
            Command::Toggle(Toggle::IsLinkBlocks, false)
        );
        assert_eq!(parse("add sections"), Command::Add(RepeatedGroup::Sections));
        assert_eq!(
            parse("remove callToActions 2"),
            Command::Remove(RepeatedGroup::CallToActions, 2)
        );
    }

    #[test]
    fn test_parse_bullets_name_and_bare_commands() {
        assert_eq!(
            parse("bullets 1 A,B,,C"),
            Command::Bullets(1, "A,B,,C".to_string())
        );
        assert_eq!(
            parse("name Missing Teeth Treatment"),
            Command::Name("Missing Teeth Treatment".to_string())
        );
        assert_eq!(parse("export"), Command::Export);
        assert_eq!(parse("show"), Command::Show);
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_line("delete sections 0"),
            Err(CommandError::UnknownCommand(c)) if c == "delete"
        ));
        assert!(matches!(
            parse_line("remove sections"),
            Err(CommandError::MissingArgument { command: "remove", .. })
        ));
        assert!(matches!(
            parse_line("remove sections one"),
            Err(CommandError::InvalidIndex(_))
        ));
        assert!(matches!(
            parse_line("toggle isLinkCards maybe"),
            Err(CommandError::InvalidBool(_))
        ));
        assert!(matches!(
            parse_line("add widgets"),
            Err(CommandError::Location(LocationError::UnknownGroup(_)))
        ));
        assert!(matches!(
            parse_line("set linkCards[0].subTitle x"),
            Err(CommandError::Location(LocationError::UnknownField { .. }))
        ));
        assert!(matches!(
            parse_line("export now"),
            Err(CommandError::TrailingInput { command: "export", .. })
        ));
    }

    #[test]
    fn test_apply_rejects_out_of_range_index() {
        let mut model = DocumentModel::new();
        let before = model.clone();

        let err = apply(&mut model, parse("set callToActions[1].name Book")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::IndexOutOfBounds {
                group: RepeatedGroup::CallToActions,
                index: 1,
                len: 1
            }
        ));
        assert!(apply(&mut model, parse("bullets 3 A")).is_err());
        assert!(apply(&mut model, parse("remove linkCards 4")).is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn test_apply_remove_last_row_is_unchanged() {
        let mut model = DocumentModel::new();

        let outcome = apply(&mut model, parse("remove sections 0")).unwrap();

        assert!(matches!(outcome, Outcome::Unchanged(_)));
        assert_eq!(model, DocumentModel::new());
    }

    #[test]
    fn test_apply_edits_model() {
        let mut model = DocumentModel::new();
        for line in [
            "set heroImage /images/hero.webp",
            "toggle isLinkCards true",
            "add linkCards",
            "set linkCards[1].title Whitening",
            "bullets 0 • Quick • Safe",
            "name Teeth Whitening",
        ] {
            assert_eq!(apply(&mut model, parse(line)).unwrap(), Outcome::Updated, "{line}");
        }

        assert_eq!(model.document().hero_image, "/images/hero.webp");
        assert!(model.document().is_link_cards);
        assert_eq!(model.document().link_cards[1].title, "Whitening");
        assert_eq!(model.raw_bullets()[0], "• Quick • Safe");
        assert_eq!(model.file_name(), "Teeth Whitening");
    }

    #[test]
    fn test_apply_export_and_show() {
        let mut model = DocumentModel::new();
        apply(&mut model, parse("bullets 0 A, B")).unwrap();

        let Outcome::Exported(export) = apply(&mut model, parse("export")).unwrap() else {
            panic!("expected an export");
        };
        assert_eq!(export.file_name, "dental-data.json");

        let Outcome::Show(json) = apply(&mut model, parse("show")).unwrap() else {
            panic!("expected a snapshot");
        };
        assert_eq!(json, export.payload);
    }
}
