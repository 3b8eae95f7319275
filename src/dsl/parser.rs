//! Recursive-descent parser over the lexer's token stream (spec 4.1): turns
//! `meta { ... }`, `commands { ... }` and declaration lines into a [`crate::model::Model`].
//!
//! A hand-written descent parser is used in place of the POSIX ERE the original shell
//! relies on (spec 9, open question): the grammar is small and regular, and a descent
//! parser gives a precise `line` for `DslSyntax` without a regex dependency.

use crate::dsl::lexer::{Spanned, Token};
use crate::error::DslError;
use crate::model::{
    Configuration, Declaration, Kind, Literal, Model, Pattern, ScalarType, Scope, Subcommand,
    SwitchArm,
};

pub(crate) struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

type PResult<T> = Result<T, DslError>;

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|s| s.token.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, detail: impl Into<String>, last_matched: Option<String>) -> DslError {
        DslError::DslSyntax {
            line: self.line(),
            detail: detail.into(),
            last_matched,
        }
    }

    fn expect_ident(&mut self) -> PResult<String> {
        match self.bump() {
            Some(Token::Ident(s)) => Ok(s),
            other => Err(self.err(format!("expected identifier, found {other:?}"), None)),
        }
    }

    fn expect_str(&mut self) -> PResult<String> {
        match self.bump() {
            Some(Token::Str(s)) => Ok(s),
            other => Err(self.err(format!("expected string literal, found {other:?}"), None)),
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> PResult<()> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.err(format!("expected {token:?}, found {:?}", self.peek()), None))
        }
    }

    /// Entry point: consumes every top-level construct until the token stream is empty.
    pub(crate) fn parse_file(mut self) -> PResult<Model> {
        let mut configuration = Configuration::default();
        let mut subcommands = Vec::new();
        let mut declarations = Vec::new();
        let mut last_matched: Option<String> = None;

        while self.peek().is_some() {
            match self.peek() {
                Some(Token::Ident(kw)) if kw == "meta" => {
                    self.bump();
                    configuration = self.parse_meta_block()?;
                    last_matched = Some("meta".to_string());
                }
                Some(Token::Ident(kw)) if kw == "commands" => {
                    self.bump();
                    subcommands = self.parse_commands_block()?;
                    last_matched = Some("commands".to_string());
                }
                _ => {
                    let decl = self.parse_declaration()?;
                    last_matched = Some(decl.binding.clone());
                    declarations.push(decl);
                }
            }
        }

        let _ = last_matched;
        Ok(Model {
            always: false,
            configuration,
            subcommands,
            declarations,
        })
    }

    fn parse_meta_block(&mut self) -> PResult<Configuration> {
        self.expect(Token::LBrace)?;
        let mut configuration = Configuration::default();

        while !self.eat(&Token::RBrace) {
            let key = self.expect_ident()?;
            self.expect(Token::Colon)?;
            self.apply_meta_key(&mut configuration, &key)?;
        }

        Ok(configuration)
    }

    fn meta_string(&mut self) -> PResult<String> {
        match self.bump() {
            Some(Token::Str(s)) => Ok(s),
            Some(Token::Ident(s)) => Ok(s),
            other => Err(self.err(format!("expected a meta value, found {other:?}"), None)),
        }
    }

    fn meta_bool(&mut self) -> PResult<bool> {
        match self.bump() {
            Some(Token::Ident(s)) if s == "true" => Ok(true),
            Some(Token::Ident(s)) if s == "false" => Ok(false),
            other => Err(self.err(format!("expected true/false, found {other:?}"), None)),
        }
    }

    fn apply_meta_key(&mut self, configuration: &mut Configuration, key: &str) -> PResult<()> {
        match key {
            "program_name" => configuration.program_name = Some(self.meta_string()?),
            "summary" => configuration.summary = Some(self.meta_string()?),
            "color_palette" => configuration.color_palette = Some(self.meta_string()?),
            "on_error_hook" => configuration.on_error_hook = Some(self.meta_string()?),
            "epilog_source" => configuration.epilog_source = Some(self.meta_string()?),
            "spare_args_binding" => configuration.spare_args_binding = self.meta_string()?,
            "spare_args_required" => configuration.spare_args_required = self.meta_bool()?,
            "subcommand_required" => configuration.subcommand_required = self.meta_bool()?,
            "allow_empty_values" => configuration.allow_empty_values = self.meta_bool()?,
            "show_defaults" => configuration.show_defaults = self.meta_bool()?,
            "help_enabled" => configuration.help_enabled = self.meta_bool()?,
            "completion_enabled" => configuration.completion_enabled = self.meta_bool()?,
            "quiet_exit" => configuration.quiet_exit = self.meta_bool()?,
            "use_stderr" => configuration.use_stderr = self.meta_bool()?,
            other => return Err(DslError::InvalidOption { key: other.to_string() }),
        }
        Ok(())
    }

    fn parse_commands_block(&mut self) -> PResult<Vec<Subcommand>> {
        self.expect(Token::LBrace)?;
        let mut subcommands = Vec::new();

        while !self.eat(&Token::RBrace) {
            let needs_spare = self.eat(&Token::Star);
            let name = self.expect_ident()?;
            self.expect(Token::Colon)?;
            let description = self.expect_str()?;
            subcommands.push(Subcommand { name, description, needs_spare });
        }

        Ok(subcommands)
    }

    /// `scope? "!"? option type? default? "=>" binding description?`
    fn parse_declaration(&mut self) -> PResult<Declaration> {
        let scope = self.parse_scope()?;
        let required = self.eat(&Token::Bang);

        if self.peek() == Some(&Token::LBrace) || matches!(self.peek(), Some(Token::Str(_)) if self.peek_at(1) == Some(&Token::LBrace))
        {
            return self.parse_switch_declaration(scope, required);
        }

        let pattern = self.parse_pattern()?;

        if self.eat(&Token::LBracket) {
            return self.parse_enum_declaration(scope, required, pattern);
        }

        let (kind, default) = self.parse_type_and_default()?;
        self.expect(Token::FatArrow)?;
        let binding = self.expect_ident()?;
        let description = self.parse_optional_description()?;

        Ok(Declaration {
            scope,
            required,
            kind,
            pattern: Some(pattern),
            default,
            binding,
            description,
        })
    }

    fn parse_scope(&mut self) -> PResult<Scope> {
        if !self.eat(&Token::At) {
            return Ok(Scope::GlobalAlways);
        }
        match self.peek() {
            Some(Token::Ident(_)) => {
                let name = self.expect_ident()?;
                Ok(Scope::Subcommand(name))
            }
            _ => Ok(Scope::GlobalOnly),
        }
    }

    /// `(short "/")? long`. A leading single-character identifier followed by `/` is the
    /// short form; everything else is long-only.
    fn parse_pattern(&mut self) -> PResult<Pattern> {
        let first = self.expect_ident()?;
        if self.eat(&Token::Slash) {
            let short = single_char(&first)
                .ok_or_else(|| self.err(format!("`{first}` is not a single-character short flag"), None))?;
            let long = self.expect_ident()?;
            Ok(Pattern::Both(short, long))
        } else {
            Ok(Pattern::Long(first))
        }
    }

    /// `":" ("str"|"int"|"float"|"num") "s"? | ":" "flag"`. Absent type defaults to `:str`.
    fn parse_type_and_default(&mut self) -> PResult<(Kind, Option<Literal>)> {
        if !self.eat(&Token::Colon) {
            let default = self.parse_optional_value()?;
            return Ok((Kind::Scalar { ty: ScalarType::Str }, default));
        }

        let word = self.expect_ident()?;
        if word == "flag" {
            let default = match self.parse_optional_value()? {
                Some(Literal::Bool(b)) => Some(b),
                Some(_) => {
                    return Err(self.err("flag default must be true/false", None));
                }
                None => None,
            };
            return Ok((
                Kind::Flag { default: default.unwrap_or(false) },
                default.map(Literal::Bool),
            ));
        }

        let (base, plural) = strip_plural(&word)
            .ok_or_else(|| self.err(format!("unrecognized type `{word}`"), None))?;
        let ty = match base {
            "str" => ScalarType::Str,
            "int" => ScalarType::Int,
            "float" => ScalarType::Float,
            "num" => ScalarType::Num,
            _ => return Err(self.err(format!("unrecognized type `{word}`"), None)),
        };
        let default = self.parse_optional_value()?;
        let kind = if plural {
            Kind::Vector { ty }
        } else {
            Kind::Scalar { ty }
        };
        Ok((kind, default))
    }

    /// `long "[" value+ "]"`: the `[` has already been consumed by the caller.
    fn parse_enum_declaration(
        &mut self,
        scope: Scope,
        required: bool,
        pattern: Pattern,
    ) -> PResult<Declaration> {
        let mut choices = Vec::new();
        while !self.eat(&Token::RBracket) {
            choices.push(self.expect_str()?);
        }
        if choices.is_empty() {
            return Err(self.err("enum declaration has no choices", None));
        }

        let default = self.parse_optional_value()?;

        self.expect(Token::FatArrow)?;
        let binding = self.expect_ident()?;
        let description = self.parse_optional_description()?;

        Ok(Declaration {
            scope,
            required,
            kind: Kind::Enum { choices },
            pattern: Some(pattern),
            default,
            binding,
            description,
        })
    }

    /// `switch-block := string? "{" arm+ "}"`.
    fn parse_switch_declaration(&mut self, scope: Scope, required: bool) -> PResult<Declaration> {
        let name = match self.peek() {
            Some(Token::Str(_)) => Some(self.expect_str()?),
            _ => None,
        };
        self.expect(Token::LBrace)?;

        let mut arms = Vec::new();
        while !self.eat(&Token::RBrace) {
            arms.push(self.parse_switch_arm()?);
        }
        if arms.is_empty() {
            return Err(self.err("switch declaration has no arms", None));
        }

        let default = self.parse_optional_value()?;

        self.expect(Token::FatArrow)?;
        let binding = self.expect_ident()?;
        let description = self.parse_optional_description()?;

        Ok(Declaration {
            scope,
            required,
            kind: Kind::Switch { name, arms },
            pattern: None,
            default,
            binding,
            description,
        })
    }

    /// `(short "/")? long ":" string ("h" string)?`
    fn parse_switch_arm(&mut self) -> PResult<SwitchArm> {
        let first = self.expect_ident()?;
        let (short, long) = if self.eat(&Token::Slash) {
            let short = single_char(&first)
                .ok_or_else(|| self.err(format!("`{first}` is not a single-character short flag"), None))?;
            (Some(short), self.expect_ident()?)
        } else {
            (None, first)
        };
        self.expect(Token::Colon)?;
        let value = self.expect_str()?;

        let help = match self.peek() {
            Some(Token::Ident(s)) if s == "h" => {
                self.bump();
                Some(self.expect_str()?)
            }
            _ => None,
        };

        Ok(SwitchArm { short, long, value, help })
    }

    /// An optional literal default/description value (string, signed number or bool).
    fn parse_optional_value(&mut self) -> PResult<Option<Literal>> {
        match self.peek() {
            Some(Token::Str(_)) => {
                let s = self.expect_str()?;
                Ok(Some(Literal::Str(s)))
            }
            Some(Token::Number(_)) => {
                let raw = match self.bump() {
                    Some(Token::Number(raw)) => raw,
                    _ => unreachable!(),
                };
                if raw.contains('.') {
                    let f: f64 = raw
                        .parse()
                        .map_err(|_| self.err(format!("malformed float literal `{raw}`"), None))?;
                    Ok(Some(Literal::Float(f)))
                } else {
                    let i: i64 = raw
                        .parse()
                        .map_err(|_| self.err(format!("malformed int literal `{raw}`"), None))?;
                    Ok(Some(Literal::Int(i)))
                }
            }
            Some(Token::Ident(s)) if s == "true" => {
                self.bump();
                Ok(Some(Literal::Bool(true)))
            }
            Some(Token::Ident(s)) if s == "false" => {
                self.bump();
                Ok(Some(Literal::Bool(false)))
            }
            _ => Ok(None),
        }
    }

    /// A declaration's trailing description: any string literal left before the next
    /// scope/declaration starts.
    fn parse_optional_description(&mut self) -> PResult<Option<String>> {
        match self.peek() {
            Some(Token::Str(_)) => Ok(Some(self.expect_str()?)),
            _ => Ok(None),
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_none() {
        Some(c)
    } else {
        None
    }
}

/// Strips a trailing `s` plural suffix from a type word, e.g. `strs` -> (`str`, true).
/// `num`/`numbers`-style ambiguity doesn't arise: every base word is plural-distinct
/// once its final `s` is removed (`str`/`strs`, `int`/`ints`, `float`/`floats`, `num`/`nums`).
fn strip_plural(word: &str) -> Option<(&str, bool)> {
    const BASES: &[&str] = &["str", "int", "float", "num"];
    if BASES.contains(&word) {
        return Some((word, false));
    }
    if let Some(stripped) = word.strip_suffix('s') {
        if BASES.contains(&stripped) {
            return Some((stripped, true));
        }
    }
    None
}
