//! Parses a token stream into a template AST.

use crate::ast::{
    Cond, ElifBranch, Expr, ExprItem, ForLoop, IfElse, Node, Op, Operand, Scope, Template,
};
use crate::error::ParseError;
use crate::lex::{Token, TokenKind};

/// Parse a token stream into a template.
pub fn parse(tokens: Vec<Token>) -> Result<Template, ParseError> {
    Parser::new(tokens).parse_template()
}

/// A keyword in the template syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    If,
    Elif,
    Else,
    EndIf,
    For,
    In,
    EndFor,
}

impl Keyword {
    pub(crate) const fn all() -> &'static [&'static str] {
        &["if", "elif", "else", "endif", "for", "in", "endfor"]
    }

    const fn human(&self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::EndIf => "endif",
            Self::For => "for",
            Self::In => "in",
            Self::EndFor => "endfor",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "if" => Some(Self::If),
            "elif" => Some(Self::Elif),
            "else" => Some(Self::Else),
            "endif" => Some(Self::EndIf),
            "for" => Some(Self::For),
            "in" => Some(Self::In),
            "endfor" => Some(Self::EndFor),
            _ => None,
        }
    }
}

/// A hand-written recursive-descent parser over the token stream.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_template(mut self) -> Result<Template, ParseError> {
        let scope = self.parse_scope()?;
        // parse_scope stops at a block-end tag without consuming it; at the
        // top level there is no opener it could belong to.
        if let Some(keyword) = self.block_end() {
            return Err(ParseError::BareCloser(keyword.human().to_owned()));
        }
        Ok(Template { scope })
    }

    /// Parses nodes until the end of input or a block-end sentinel
    /// (`{{ elif|else|endif|endfor`), which is left for the caller.
    fn parse_scope(&mut self) -> Result<Scope, ParseError> {
        let mut scope = Scope::new();
        loop {
            if self.is_at_end() || self.block_end().is_some() {
                return Ok(scope);
            }
            let node = match self.peek_kind() {
                Some(TokenKind::Text) => Node::Text(self.advance().lexeme),
                Some(TokenKind::OpenTag) => {
                    self.advance();
                    self.parse_tag()?
                }
                _ => return Err(self.unexpected("text or '{{'")),
            };
            scope.nodes.push(node);
        }
    }

    /// Parses the contents of one tag, after its `{{` has been consumed.
    /// The leading token decides between an if block, a for block, and an
    /// expression.
    fn parse_tag(&mut self) -> Result<Node, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Keyword) => match self.peek_keyword() {
                Some(Keyword::If) => {
                    self.advance();
                    self.parse_if()
                }
                Some(Keyword::For) => {
                    self.advance();
                    self.parse_for()
                }
                _ => Err(self.unexpected("'if', 'for' or an expression")),
            },
            Some(TokenKind::Ident | TokenKind::LParen | TokenKind::Bang) => {
                let expr = self.parse_expr()?;
                self.expect_close_tag()?;
                Ok(match bare_var(expr) {
                    Ok(name) => Node::Var(name),
                    Err(expr) => Node::Expr(expr),
                })
            }
            _ => Err(self.unexpected("'if', 'for' or an expression")),
        }
    }

    /// Parses an if block after its `if` keyword.
    ///
    ///   {{ if cond }} ... {{ elif cond }} ... {{ else }} ... {{ endif }}
    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let cond = self.parse_cond()?;
        let then_branch = self.parse_scope()?;

        let mut elif_branches = Vec::new();
        while self.block_end() == Some(Keyword::Elif) {
            self.advance(); // {{
            self.advance(); // elif
            let cond = self.parse_cond()?;
            let body = self.parse_scope()?;
            elif_branches.push(ElifBranch { cond, body });
        }

        let mut else_branch = None;
        if self.block_end() == Some(Keyword::Else) {
            self.advance(); // {{
            self.advance(); // else
            self.expect_close_tag()?;
            else_branch = Some(self.parse_scope()?);
        }

        if self.block_end() != Some(Keyword::EndIf) {
            return Err(ParseError::MissingEndif);
        }
        self.advance(); // {{
        self.advance(); // endif
        self.expect_close_tag()?;

        Ok(Node::IfElse(IfElse {
            cond,
            then_branch,
            elif_branches,
            else_branch,
        }))
    }

    /// Parses a for block after its `for` keyword.
    ///
    ///   {{ for item in items }} ... {{ endfor }}
    fn parse_for(&mut self) -> Result<Node, ParseError> {
        let iteratee = self.expect_ident()?;
        self.expect_keyword(Keyword::In)?;
        let iterable = self.expect_ident()?;
        self.expect_close_tag()?;

        let body = self.parse_scope()?;

        if self.block_end() != Some(Keyword::EndFor) {
            return Err(ParseError::MissingEndfor);
        }
        self.advance(); // {{
        self.advance(); // endfor
        self.expect_close_tag()?;

        Ok(Node::ForLoop(ForLoop {
            iteratee,
            iterable,
            body,
        }))
    }

    /// Parses an `if`/`elif` condition up to the closing `}}`.
    fn parse_cond(&mut self) -> Result<Cond, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Ident | TokenKind::LParen | TokenKind::Bang) => {}
            _ => return Err(ParseError::MalformedIf),
        }
        let expr = self.parse_expr()?;
        self.expect_close_tag()?;
        Ok(match bare_var(expr) {
            Ok(name) => Cond::Var(name),
            Err(expr) => Cond::Expr(expr),
        })
    }

    /// Parses a flat expression in source order, stopping before `}}` or a
    /// closing `)`.
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::Ident) => {
                    let name = self.advance().lexeme;
                    let operand = if self.check(TokenKind::LBracket) {
                        self.advance();
                        let key = match self.peek_kind() {
                            Some(TokenKind::Str) => self.advance().lexeme,
                            _ => return Err(ParseError::MalformedIndexAccess),
                        };
                        if !self.check(TokenKind::RBracket) {
                            return Err(ParseError::MalformedIndexAccess);
                        }
                        self.advance();
                        Operand::Index { name, key }
                    } else {
                        Operand::Var(name)
                    };
                    items.push(ExprItem::Operand(operand));
                }
                Some(TokenKind::Str) => {
                    items.push(ExprItem::Operand(Operand::Str(self.advance().lexeme)));
                }
                Some(TokenKind::Number) => {
                    items.push(ExprItem::Operand(Operand::Num(self.advance().lexeme)));
                }
                Some(TokenKind::LParen) => {
                    self.advance();
                    let inner = self.parse_expr()?;
                    if !self.check(TokenKind::RParen) {
                        return Err(self.unexpected(TokenKind::RParen.human()));
                    }
                    self.advance();
                    items.push(ExprItem::Operand(Operand::Group(inner)));
                }
                Some(TokenKind::Bang) => {
                    // `!` is strictly a prefix operator
                    if matches!(items.last(), Some(ExprItem::Operand(_))) {
                        return Err(self.unexpected("a binary operator or '}}'"));
                    }
                    self.advance();
                    match self.peek_kind() {
                        Some(
                            TokenKind::Ident
                            | TokenKind::Str
                            | TokenKind::Number
                            | TokenKind::LParen
                            | TokenKind::Bang,
                        ) => {}
                        _ => return Err(self.unexpected("operand after '!'")),
                    }
                    items.push(ExprItem::Op(Op::Not));
                }
                Some(kind) => match binary_op(kind) {
                    Some(op) => {
                        self.advance();
                        items.push(ExprItem::Op(op));
                    }
                    None => break,
                },
                None => break,
            }
        }
        if items.is_empty() {
            return Err(self.unexpected("an expression"));
        }
        Ok(Expr { items })
    }

    /// If the next tokens open a block-end tag (`{{ elif|else|endif|endfor`),
    /// returns the closing keyword without consuming anything.
    fn block_end(&self) -> Option<Keyword> {
        let open = self.tokens.get(self.pos)?;
        let keyword = self.tokens.get(self.pos + 1)?;
        if open.kind != TokenKind::OpenTag || keyword.kind != TokenKind::Keyword {
            return None;
        }
        match Keyword::from_str(&keyword.lexeme) {
            Some(kw @ (Keyword::Elif | Keyword::Else | Keyword::EndIf | Keyword::EndFor)) => {
                Some(kw)
            }
            _ => None,
        }
    }

    fn expect_close_tag(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            Some(TokenKind::CloseTag) => {
                self.advance();
                Ok(())
            }
            Some(_) => Err(self.unexpected(TokenKind::CloseTag.human())),
            None => Err(ParseError::MissingCloseTag),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Ident) => Ok(self.advance().lexeme),
            _ => Err(self.unexpected(TokenKind::Ident.human())),
        }
    }

    fn expect_keyword(&mut self, expected: Keyword) -> Result<(), ParseError> {
        if self.peek_kind() == Some(TokenKind::Keyword) && self.peek_keyword() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected.human()))
        }
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|token| token.kind)
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        let token = self.tokens.get(self.pos)?;
        Keyword::from_str(&token.lexeme)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consumes and returns the current token. Callers check with
    /// [`peek_kind`][Self::peek_kind] first.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Text => String::from("text"),
            Some(token) => format!("'{}'", token.lexeme),
            None => String::from("end of input"),
        };
        ParseError::UnexpectedToken {
            expected: expected.to_owned(),
            found,
        }
    }
}

/// A tag whose expression is exactly one bare variable gets special
/// treatment: `{{ name }}` renders as a variable and `{{ if name }}` is a
/// typed boolean check. Index access, parentheses and operators all keep the
/// expression form.
fn bare_var(mut expr: Expr) -> Result<String, Expr> {
    if expr.items.len() == 1 {
        match expr.items.pop() {
            Some(ExprItem::Operand(Operand::Var(name))) => return Ok(name),
            Some(item) => expr.items.push(item),
            None => {}
        }
    }
    Err(expr)
}

const fn binary_op(kind: TokenKind) -> Option<Op> {
    match kind {
        TokenKind::And => Some(Op::And),
        TokenKind::Or => Some(Op::Or),
        TokenKind::Eq => Some(Op::Eq),
        TokenKind::Ne => Some(Op::Ne),
        TokenKind::Gt => Some(Op::Gt),
        TokenKind::Lt => Some(Op::Lt),
        TokenKind::Ge => Some(Op::Ge),
        TokenKind::Le => Some(Op::Le),
        TokenKind::Coalesce => Some(Op::Coalesce),
        _ => None,
    }
}
