//! Tokenizer built on logos.
//!
//! Whitespace and `//` / `#` line comments are skipped. Number tokens keep
//! their prefix (`0x`, `0b`, leading `0` for octal) so the tree builder sees
//! the literal text unchanged.

use logos::Logos;

use crate::error::ParseError;
use crate::Span;

#[derive(Logos, Copy, Clone, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("local")]
    Local,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("none")]
    None,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Literals
    /// Decimal, or octal when it has a leading zero.
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexInt,
    #[regex(r"0[bB][01]+")]
    BinInt,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    /// `"..."` with backslash escapes.
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    /// `'...'`, taken verbatim.
    #[regex(r"'[^']*'")]
    RawString,
    #[regex(r#"b"[01_ ]*""#)]
    BitString,
    #[regex(r#"x"[0-9a-fA-F_ ]*""#)]
    HexBitString,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("=>")]
    FatArrow,

    // Punctuation
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}

impl TokenKind {
    /// How the token is named in "expected ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::For => "`for`",
            TokenKind::Function => "`function`",
            TokenKind::Return => "`return`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Local => "`local`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::None => "`none`",
            TokenKind::Ident => "an identifier",
            TokenKind::Int | TokenKind::HexInt | TokenKind::BinInt | TokenKind::Float => {
                "a number"
            }
            TokenKind::String | TokenKind::RawString => "a string",
            TokenKind::BitString | TokenKind::HexBitString => "a bit literal",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::LtEq => "`<=`",
            TokenKind::GtEq => "`>=`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::PipePipe => "`||`",
            TokenKind::Bang => "`!`",
            TokenKind::Eq => "`=`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenize all of `source`.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => return Err(lex_error(source, span)),
        }
    }
    Ok(tokens)
}

/// Any character may appear inside a quoted literal, so a quote that fails
/// to lex has no closing quote. That is reported as incomplete input so the
/// REPL can ask for another line.
fn lex_error(source: &str, span: Span) -> ParseError {
    let found = source[span.start..].chars().next().unwrap_or(' ');
    if found == '"' || found == '\'' {
        return ParseError::incomplete("unterminated string literal", span.start..source.len());
    }
    ParseError::new(format!("unexpected character `{found}`"), span)
}
