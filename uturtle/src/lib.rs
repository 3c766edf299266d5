// uturtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The turtle call vocabulary.
//!
//! Resolves operation names, including every alias a turtle script may use,
//! into a closed set of [`ast::Call`]s, and reads call logs: one call per line,
//! `name arg arg ...`, with `#` comments, `"quoted strings"` and `(x, y)` pairs.

pub mod ast;

use crate::ast::{Align, Arg, Call, ColorSpec, Program};
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter, Result as FormatResult};

#[derive(Clone, Debug, PartialEq)]
pub enum CallError {
    UnknownOperation(String),
    Arity {
        operation: String,
        expected: &'static str,
        found: usize,
    },
    ArgumentType {
        operation: String,
        index: usize,
        expected: &'static str,
    },
    Syntax {
        line: usize,
        message: String,
    },
    /// A call-log line that tokenized but did not resolve.
    AtLine {
        line: usize,
        error: Box<CallError>,
    },
}

impl Display for CallError {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        match self {
            CallError::UnknownOperation(name) => write!(formatter, "unknown operation `{}`", name),
            CallError::Arity {
                operation,
                expected,
                found,
            } => write!(
                formatter,
                "`{}` takes {} argument(s), {} given",
                operation, expected, found
            ),
            CallError::ArgumentType {
                operation,
                index,
                expected,
            } => write!(
                formatter,
                "argument {} of `{}` must be {}",
                index + 1,
                operation,
                expected
            ),
            CallError::Syntax { line, message } => write!(formatter, "line {}: {}", line, message),
            CallError::AtLine { line, error } => write!(formatter, "line {}: {}", line, error),
        }
    }
}

impl Error for CallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CallError::AtLine { error, .. } => Some(&**error),
            _ => None,
        }
    }
}

impl Call {
    /// Resolves an operation name and its positional arguments.
    pub fn resolve(name: &str, args: &[Arg]) -> Result<Call, CallError> {
        let args = Args { operation: name, args };
        let call = match name {
            "forward" | "fd" => {
                args.arity(1, 1, "1")?;
                Call::Forward(args.number(0)?)
            }
            "backward" | "bk" | "back" => {
                args.arity(1, 1, "1")?;
                Call::Backward(args.number(0)?)
            }
            "right" | "rt" => {
                args.arity(1, 1, "1")?;
                Call::Right(args.number(0)?)
            }
            "left" | "lt" => {
                args.arity(1, 1, "1")?;
                Call::Left(args.number(0)?)
            }
            "goto" | "setpos" | "setposition" => {
                let (x, y) = args.point()?;
                Call::Goto(x, y)
            }
            "setx" => {
                args.arity(1, 1, "1")?;
                Call::SetX(args.number(0)?)
            }
            "sety" => {
                args.arity(1, 1, "1")?;
                Call::SetY(args.number(0)?)
            }
            "setheading" | "seth" => {
                args.arity(1, 1, "1")?;
                Call::SetHeading(args.number(0)?)
            }
            "home" => args.nullary(Call::Home)?,
            "penup" | "pu" | "up" => args.nullary(Call::PenUp)?,
            "pendown" | "pd" | "down" => args.nullary(Call::PenDown)?,
            "isdown" => args.nullary(Call::IsDown)?,
            "pencolor" => Call::PenColor(args.color(0)?),
            "fillcolor" => Call::FillColor(args.color(0)?),
            "color" => match args.args {
                [Arg::Text(pen), Arg::Text(fill)] => Call::Color(
                    ColorSpec::Named(pen.clone()),
                    Some(ColorSpec::Named(fill.clone())),
                ),
                _ => Call::Color(args.color(0)?, None),
            },
            "width" | "pensize" => {
                args.arity(0, 1, "0 or 1")?;
                Call::Width(args.optional_number(0)?)
            }
            "begin_fill" => args.nullary(Call::BeginFill)?,
            "end_fill" => args.nullary(Call::EndFill)?,
            "circle" => {
                args.arity(1, 3, "1 to 3")?;
                Call::Circle {
                    radius: args.number(0)?,
                    extent: args.optional_number(1)?.unwrap_or(360.0),
                    steps: args.optional_number(2)?,
                }
            }
            "dot" => {
                let size = args.optional_number(0)?;
                let color = if args.args.len() > 1 {
                    Some(args.color(1)?)
                } else {
                    None
                };
                Call::Dot { size, color }
            }
            "write" => args.write()?,
            "clear" => args.nullary(Call::Clear)?,
            "reset" => args.nullary(Call::Reset)?,
            "bgcolor" => Call::BgColor(args.color(0)?),
            "hideturtle" | "ht" => args.nullary(Call::HideTurtle)?,
            "showturtle" | "st" => args.nullary(Call::ShowTurtle)?,
            "isvisible" => args.nullary(Call::IsVisible)?,
            "position" | "pos" => args.nullary(Call::Position)?,
            "xcor" => args.nullary(Call::XCor)?,
            "ycor" => args.nullary(Call::YCor)?,
            "heading" => args.nullary(Call::Heading)?,
            "distance" => {
                let (x, y) = args.point()?;
                Call::Distance(x, y)
            }
            "stamp" => args.nullary(Call::Stamp)?,
            "speed" | "tracer" | "update" | "done" | "mainloop" | "title" | "setup" => Call::NoOp,
            _ => return Err(CallError::UnknownOperation(name.to_owned())),
        };
        Ok(call)
    }
}

struct Args<'a> {
    operation: &'a str,
    args: &'a [Arg],
}

impl<'a> Args<'a> {
    fn arity(&self, min: usize, max: usize, expected: &'static str) -> Result<(), CallError> {
        let found = self.args.len();
        if found < min || found > max {
            return Err(CallError::Arity {
                operation: self.operation.to_owned(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn nullary(&self, call: Call) -> Result<Call, CallError> {
        self.arity(0, 0, "no")?;
        Ok(call)
    }

    fn type_error(&self, index: usize, expected: &'static str) -> CallError {
        CallError::ArgumentType {
            operation: self.operation.to_owned(),
            index,
            expected,
        }
    }

    fn number(&self, index: usize) -> Result<f64, CallError> {
        match self.args.get(index) {
            Some(Arg::Number(value)) => Ok(*value),
            _ => Err(self.type_error(index, "a number")),
        }
    }

    fn optional_number(&self, index: usize) -> Result<Option<f64>, CallError> {
        match self.args.get(index) {
            None => Ok(None),
            Some(Arg::Number(value)) => Ok(Some(*value)),
            Some(_) => Err(self.type_error(index, "a number")),
        }
    }

    /// Either a single `(x, y)` pair or two scalars.
    fn point(&self) -> Result<(f64, f64), CallError> {
        match self.args {
            [Arg::Pair(x, y)] => Ok((*x, *y)),
            [Arg::Number(x), Arg::Number(y)] => Ok((*x, *y)),
            [_] | [_, _] => Err(self.type_error(0, "a coordinate pair or two numbers")),
            _ => Err(CallError::Arity {
                operation: self.operation.to_owned(),
                expected: "1 or 2",
                found: self.args.len(),
            }),
        }
    }

    /// A color name or three numeric channels starting at `index`.
    fn color(&self, index: usize) -> Result<ColorSpec, CallError> {
        match &self.args[index.min(self.args.len())..] {
            [Arg::Text(name)] => Ok(ColorSpec::Named(name.clone())),
            [Arg::Number(r), Arg::Number(g), Arg::Number(b)] => {
                Ok(ColorSpec::Channels(*r, *g, *b))
            }
            [] => Err(CallError::Arity {
                operation: self.operation.to_owned(),
                expected: "a color",
                found: self.args.len(),
            }),
            _ => Err(self.type_error(index, "a color name or three channels")),
        }
    }

    fn text(&self, index: usize) -> Result<String, CallError> {
        match self.args.get(index) {
            Some(Arg::Text(text)) => Ok(text.clone()),
            Some(Arg::Number(value)) => Ok(value.to_string()),
            _ => Err(self.type_error(index, "text")),
        }
    }

    /// `write text [align [family [size [style]]]]`
    fn write(&self) -> Result<Call, CallError> {
        self.arity(1, 5, "1 to 5")?;
        let text = self.text(0)?;
        let align = match self.args.get(1) {
            None => Align::Left,
            Some(Arg::Text(name)) => {
                Align::from_name(name).ok_or_else(|| self.type_error(1, "left, center or right"))?
            }
            Some(_) => return Err(self.type_error(1, "left, center or right")),
        };
        let font = match self.args.get(2) {
            None => None,
            Some(_) => {
                let family = self.text(2)?;
                let size = self.optional_number(3)?.unwrap_or(12.0);
                let style = match self.args.get(4) {
                    None => "normal".to_owned(),
                    Some(_) => self.text(4)?,
                };
                Some((family, size, style))
            }
        };
        Ok(Call::Write { text, align, font })
    }
}

/// Reads a call log into a program.
pub struct Parser {
    token: Regex,
}

impl Parser {
    pub fn new() -> Parser {
        let token = Regex::new(
            r#""((?:[^"\\]|\\.)*)"|\(\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*\)|([^\s"()]+)"#,
        )
        .expect("token pattern is valid");
        Parser { token }
    }

    pub fn parse(&self, source: &str) -> Result<Program, CallError> {
        let mut program = Program::new();
        for (index, line) in source.lines().enumerate() {
            if let Some(call) = self.parse_line(index + 1, line)? {
                program.push(call);
            }
        }
        Ok(program)
    }

    pub fn parse_line(&self, line_number: usize, line: &str) -> Result<Option<Call>, CallError> {
        let line = match comment_start(line) {
            Some(comment) => &line[..comment],
            None => line,
        };
        let mut tokens = self.tokens(line_number, line)?.into_iter();
        let name = match tokens.next() {
            None => return Ok(None),
            Some(Arg::Text(name)) => name,
            Some(_) => {
                return Err(CallError::Syntax {
                    line: line_number,
                    message: "expected an operation name".to_owned(),
                })
            }
        };
        let args: Vec<Arg> = tokens.collect();
        Call::resolve(&name, &args)
            .map(Some)
            .map_err(|error| CallError::AtLine {
                line: line_number,
                error: Box::new(error),
            })
    }

    fn tokens(&self, line_number: usize, line: &str) -> Result<Vec<Arg>, CallError> {
        let mut tokens = Vec::new();
        let mut consumed = 0;
        for captures in self.token.captures_iter(line) {
            let whole = match captures.get(0) {
                Some(whole) => whole,
                None => continue,
            };
            if !line[consumed..whole.start()].trim().is_empty() {
                return Err(CallError::Syntax {
                    line: line_number,
                    message: format!("unexpected `{}`", line[consumed..whole.start()].trim()),
                });
            }
            consumed = whole.end();

            if let Some(quoted) = captures.get(1) {
                tokens.push(Arg::Text(unescape(quoted.as_str())));
            } else if let (Some(x), Some(y)) = (captures.get(2), captures.get(3)) {
                let x = parse_number(line_number, x.as_str())?;
                let y = parse_number(line_number, y.as_str())?;
                tokens.push(Arg::Pair(x, y));
            } else if let Some(bare) = captures.get(4) {
                let bare = bare.as_str();
                match bare.parse::<f64>() {
                    Ok(value) => tokens.push(Arg::Number(value)),
                    Err(_) => tokens.push(Arg::Text(bare.to_owned())),
                }
            }
        }
        if !line[consumed..].trim().is_empty() {
            return Err(CallError::Syntax {
                line: line_number,
                message: format!("unexpected `{}`", line[consumed..].trim()),
            });
        }
        Ok(tokens)
    }
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

fn parse_number(line: usize, text: &str) -> Result<f64, CallError> {
    text.parse::<f64>().map_err(|_| CallError::Syntax {
        line,
        message: format!("`{}` is not a number", text),
    })
}

/// Byte offset of the first `#` outside a quoted string.
fn comment_start(line: &str) -> Option<usize> {
    let mut quoted = false;
    let mut escaped = false;
    for (offset, c) in line.char_indices() {
        match c {
            '\\' if quoted && !escaped => {
                escaped = true;
                continue;
            }
            '"' if !escaped => quoted = !quoted,
            '#' if !quoted => return Some(offset),
            _ => {}
        }
        escaped = false;
    }
    None
}

fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some(other) => result.push(other),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[test]
fn turtle_alias_resolution() {
    let forward = Call::Forward(10.0);
    assert_eq!(Call::resolve("fd", &[Arg::Number(10.0)]), Ok(forward.clone()));
    assert_eq!(Call::resolve("forward", &[Arg::Number(10.0)]), Ok(forward));

    for name in &["backward", "bk", "back"] {
        assert_eq!(Call::resolve(name, &[Arg::Number(3.0)]), Ok(Call::Backward(3.0)));
    }
    for name in &["goto", "setpos", "setposition"] {
        assert_eq!(
            Call::resolve(name, &[Arg::Number(1.0), Arg::Number(2.0)]),
            Ok(Call::Goto(1.0, 2.0))
        );
        assert_eq!(
            Call::resolve(name, &[Arg::Pair(1.0, 2.0)]),
            Ok(Call::Goto(1.0, 2.0))
        );
    }
    for name in &["penup", "pu", "up"] {
        assert_eq!(Call::resolve(name, &[]), Ok(Call::PenUp));
    }
    for name in &["pendown", "pd", "down"] {
        assert_eq!(Call::resolve(name, &[]), Ok(Call::PenDown));
    }
    assert_eq!(Call::resolve("rt", &[Arg::Number(90.0)]), Ok(Call::Right(90.0)));
    assert_eq!(Call::resolve("lt", &[Arg::Number(90.0)]), Ok(Call::Left(90.0)));
    assert_eq!(Call::resolve("seth", &[Arg::Number(45.0)]), Ok(Call::SetHeading(45.0)));
    assert_eq!(Call::resolve("ht", &[]), Ok(Call::HideTurtle));
    assert_eq!(Call::resolve("st", &[]), Ok(Call::ShowTurtle));
    assert_eq!(Call::resolve("pensize", &[Arg::Number(3.0)]), Ok(Call::Width(Some(3.0))));
    assert_eq!(Call::resolve("width", &[]), Ok(Call::Width(None)));
    assert_eq!(Call::resolve("speed", &[Arg::Number(3.0)]), Ok(Call::NoOp));
}

#[test]
fn turtle_argument_errors() {
    assert_eq!(
        Call::resolve("bleh", &[]),
        Err(CallError::UnknownOperation("bleh".to_owned()))
    );
    assert!(matches!(
        Call::resolve("forward", &[]),
        Err(CallError::Arity { found: 0, .. })
    ));
    assert!(matches!(
        Call::resolve("forward", &[Arg::Text("far".to_owned())]),
        Err(CallError::ArgumentType { index: 0, .. })
    ));
    assert!(matches!(
        Call::resolve("penup", &[Arg::Number(1.0)]),
        Err(CallError::Arity { found: 1, .. })
    ));
    assert!(matches!(
        Call::resolve("pencolor", &[Arg::Number(1.0), Arg::Number(0.0)]),
        Err(CallError::ArgumentType { .. })
    ));
}

#[test]
fn turtle_color_arguments() {
    assert_eq!(
        Call::resolve("color", &[Arg::Text("red".to_owned())]),
        Ok(Call::Color(ColorSpec::Named("red".to_owned()), None))
    );
    assert_eq!(
        Call::resolve(
            "color",
            &[Arg::Text("red".to_owned()), Arg::Text("blue".to_owned())]
        ),
        Ok(Call::Color(
            ColorSpec::Named("red".to_owned()),
            Some(ColorSpec::Named("blue".to_owned()))
        ))
    );
    assert_eq!(
        Call::resolve(
            "pencolor",
            &[Arg::Number(1.0), Arg::Number(0.5), Arg::Number(0.0)]
        ),
        Ok(Call::PenColor(ColorSpec::Channels(1.0, 0.5, 0.0)))
    );
    assert_eq!(
        Call::resolve(
            "dot",
            &[Arg::Number(20.0), Arg::Text("red".to_owned())]
        ),
        Ok(Call::Dot {
            size: Some(20.0),
            color: Some(ColorSpec::Named("red".to_owned())),
        })
    );
}

#[test]
fn turtle_call_log_parser() {
    let parser = Parser::new();
    assert_eq!(parser.parse_line(1, "fd 100"), Ok(Some(Call::Forward(100.0))));
    assert_eq!(parser.parse_line(1, "   # just a comment"), Ok(None));
    assert_eq!(parser.parse_line(1, ""), Ok(None));
    assert_eq!(
        parser.parse_line(1, "goto (10, -5.5)  # pair"),
        Ok(Some(Call::Goto(10.0, -5.5)))
    );
    assert_eq!(
        parser.parse_line(1, r#"write "a # \"b\"" center Courier 16 bold"#),
        Ok(Some(Call::Write {
            text: "a # \"b\"".to_owned(),
            align: Align::Center,
            font: Some(("Courier".to_owned(), 16.0, "bold".to_owned())),
        }))
    );
    assert_eq!(
        parser.parse_line(1, "circle 50 180"),
        Ok(Some(Call::Circle {
            radius: 50.0,
            extent: 180.0,
            steps: None,
        }))
    );
    assert!(matches!(
        parser.parse_line(4, "fd 10 )"),
        Err(CallError::Syntax { line: 4, .. })
    ));
}

#[test]
fn turtle_comment_after_quoted_hash() {
    let parser = Parser::new();
    assert_eq!(
        parser.parse_line(1, r#"write "a#b" # note"#),
        Ok(Some(Call::Write {
            text: "a#b".to_owned(),
            align: Align::Left,
            font: None,
        }))
    );
    assert_eq!(
        parser.parse_line(1, r##"write "x\"#y" right # a "quoted" note"##),
        Ok(Some(Call::Write {
            text: "x\"#y".to_owned(),
            align: Align::Right,
            font: None,
        }))
    );
    assert_eq!(parser.parse_line(1, "fd 5#note"), Ok(Some(Call::Forward(5.0))));
}

#[test]
fn turtle_resolve_errors_carry_line() {
    let parser = Parser::new();
    let err = parser.parse_line(7, "fly 20").unwrap_err();
    assert_eq!(
        err,
        CallError::AtLine {
            line: 7,
            error: Box::new(CallError::UnknownOperation("fly".to_owned())),
        }
    );
    assert_eq!(err.to_string(), "line 7: unknown operation `fly`");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn turtle_program_parser() {
    let program = Parser::new()
        .parse("pu\ngoto 0 -50\npd\n\ncircle 50\nrt 90 # turn\n")
        .unwrap();
    assert_eq!(
        program,
        vec![
            Call::PenUp,
            Call::Goto(0.0, -50.0),
            Call::PenDown,
            Call::Circle {
                radius: 50.0,
                extent: 360.0,
                steps: None,
            },
            Call::Right(90.0),
        ]
    );
}
