//! The line-oriented command language read by the `cluesheet` tool.
//!
//! One command per line; `#` starts a comment and blank lines are skipped.
//! Cards are named by id or by name (case-insensitive, double-quoted when the
//! name contains spaces); players and keys by number.

use cluesheet_core::{CardId, Cell, CoreError, MarkKey, PlayerId, Primary, Theme};

/// One parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the primary of a cell.
    SetPrimary {
        /// The target cell.
        cell: Cell,
        /// The new primary.
        primary: Primary,
    },
    /// Toggle a number on a cell.
    Number {
        /// The target cell.
        cell: Cell,
        /// The number to toggle.
        key: MarkKey,
    },
    /// Toggle a bar color on a cell.
    Bar {
        /// The target cell.
        cell: Cell,
        /// The bar color to toggle.
        key: MarkKey,
    },
    /// Reset a cell to empty.
    Clear(Cell),
    /// Confirm the public cards.
    Public(Vec<CardId>),
    /// Confirm the owner's hand.
    Own(Vec<CardId>),
    /// Toggle whether an owned card was shown to an opponent.
    Shown {
        /// The owned card.
        card: CardId,
        /// The opponent.
        player: PlayerId,
    },
    /// Step back one snapshot.
    Undo,
    /// Step forward one snapshot.
    Redo,
    /// Start a new game.
    Reset,
    /// Print the sheet.
    Print,
}

/// A command together with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// One-based line number.
    pub number: usize,
    /// The parsed command.
    pub command: Command,
}

/// What went wrong on a script line.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParseErrorKind {
    /// The first word is not a command.
    #[display("unknown command {_0:?}")]
    UnknownCommand(#[error(not(source))] String),
    /// A required argument is missing.
    #[display("{command}: missing {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// The argument that is missing.
        argument: &'static str,
    },
    /// Extra words follow a complete command.
    #[display("{command}: unexpected argument {extra:?}")]
    UnexpectedArgument {
        /// The command being parsed.
        command: &'static str,
        /// The first extra word.
        extra: String,
    },
    /// A word that should be a number is not one.
    #[display("expected a number, found {_0:?}")]
    InvalidNumber(#[error(not(source))] String),
    /// A double quote is never closed.
    #[display("unterminated quote")]
    UnterminatedQuote,
    /// A value is out of range or names nothing in the theme.
    #[display("{_0}")]
    #[from]
    Core(CoreError),
}

/// A parse failure with its line number.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("line {line}: {kind}")]
pub struct ParseError {
    /// One-based line number.
    pub line: usize,
    /// What went wrong.
    #[error(source)]
    pub kind: ParseErrorKind,
}

/// Parses a whole script, resolving card names against `theme`.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_script(source: &str, theme: Theme) -> Result<Vec<Line>, ParseError> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        let command =
            parse_line(text, theme).map_err(|kind| ParseError { line: number, kind })?;
        if let Some(command) = command {
            lines.push(Line { number, command });
        }
    }
    Ok(lines)
}

/// Parses a single line. Blank and comment-only lines yield `None`.
///
/// # Errors
///
/// Returns a [`ParseErrorKind`] if the line is not a valid command.
pub fn parse_line(text: &str, theme: Theme) -> Result<Option<Command>, ParseErrorKind> {
    let words = tokenize(text)?;
    let mut words = words.into_iter();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let mut args = Args {
        command: "",
        words,
        theme,
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "has" => args.set_primary("has", Primary::Has)?,
        "not" => args.set_primary("not", Primary::Not)?,
        "bars" => args.set_primary("bars", Primary::Bars)?,
        "empty" => args.set_primary("empty", Primary::Empty)?,
        "number" => {
            args.command = "number";
            let cell = args.cell()?;
            Command::Number {
                cell,
                key: args.key()?,
            }
        }
        "bar" => {
            args.command = "bar";
            let cell = args.cell()?;
            Command::Bar {
                cell,
                key: args.key()?,
            }
        }
        "clear" => {
            args.command = "clear";
            Command::Clear(args.cell()?)
        }
        "public" => {
            args.command = "public";
            Command::Public(args.cards()?)
        }
        "own" => {
            args.command = "own";
            Command::Own(args.cards()?)
        }
        "shown" => {
            args.command = "shown";
            let card = args.card()?;
            Command::Shown {
                card,
                player: args.player()?,
            }
        }
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "reset" => Command::Reset,
        "print" => Command::Print,
        _ => return Err(ParseErrorKind::UnknownCommand(name)),
    };
    args.finish()?;
    Ok(Some(command))
}

fn tokenize(text: &str) -> Result<Vec<String>, ParseErrorKind> {
    let mut words = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '#' => break,
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut word = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => word.push(c),
                        None => return Err(ParseErrorKind::UnterminatedQuote),
                    }
                }
                words.push(word);
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '#' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                words.push(word);
            }
        }
    }
    Ok(words)
}

struct Args {
    command: &'static str,
    words: std::vec::IntoIter<String>,
    theme: Theme,
}

impl Args {
    fn next(&mut self, argument: &'static str) -> Result<String, ParseErrorKind> {
        self.words.next().ok_or(ParseErrorKind::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn number<T: std::str::FromStr>(word: &str) -> Result<T, ParseErrorKind> {
        word.parse()
            .map_err(|_| ParseErrorKind::InvalidNumber(word.to_owned()))
    }

    fn resolve_card(&self, word: &str) -> Result<CardId, ParseErrorKind> {
        let card = if word.bytes().all(|b| b.is_ascii_digit()) {
            self.theme.card(CardId::new(Self::number(word)?))?
        } else {
            self.theme.find_by_name(word)?
        };
        Ok(card.id)
    }

    fn card(&mut self) -> Result<CardId, ParseErrorKind> {
        let word = self.next("card")?;
        self.resolve_card(&word)
    }

    fn cards(&mut self) -> Result<Vec<CardId>, ParseErrorKind> {
        let words: Vec<String> = self.words.by_ref().collect();
        words.iter().map(|word| self.resolve_card(word)).collect()
    }

    fn player(&mut self) -> Result<PlayerId, ParseErrorKind> {
        let word = self.next("player")?;
        Ok(PlayerId::try_from(Self::number::<u8>(&word)?)?)
    }

    fn key(&mut self) -> Result<MarkKey, ParseErrorKind> {
        let word = self.next("key")?;
        Ok(MarkKey::try_from(Self::number::<u8>(&word)?)?)
    }

    fn cell(&mut self) -> Result<Cell, ParseErrorKind> {
        let card = self.card()?;
        Ok(Cell::new(card, self.player()?))
    }

    fn set_primary(
        &mut self,
        command: &'static str,
        primary: Primary,
    ) -> Result<Command, ParseErrorKind> {
        self.command = command;
        Ok(Command::SetPrimary {
            cell: self.cell()?,
            primary,
        })
    }

    fn finish(mut self) -> Result<(), ParseErrorKind> {
        match self.words.next() {
            Some(extra) => Err(ParseErrorKind::UnexpectedArgument {
                command: self.command,
                extra,
            }),
            None => Ok(()),
        }
    }
}
