use logos::{Lexer as LogosLexer, Logos};
use logos_iter::{LogosIter, PeekableLexer};
use std::fmt;

pub type Lexer<'a> = PeekableLexer<'a, LogosLexer<'a, TokenKind>, TokenKind>;

pub fn lexer(s: &str) -> Lexer {
    TokenKind::lexer(s).peekable_lexer()
}

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,

    // 'd' and 'k' both mark dice and start the discard/keep modifiers
    #[token("d")]
    D,
    #[token("k")]
    K,
    #[token("l")]
    L,
    #[token("h")]
    H,
    #[token("!")]
    Bang,
    #[token("@")]
    At,
    #[token("r")]
    R,
    #[token("s")]
    S,

    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub const UNARY_OPS: &'static [Self] = &[Self::Plus, Self::Minus];

    pub const ADDITION_OPS: &'static [Self] = &[Self::Plus, Self::Minus];

    pub const MULTIPLICATION_OPS: &'static [Self] = &[Self::Star, Self::Slash];

    pub const DICE_MARKERS: &'static [Self] = &[Self::D, Self::K];

    pub const MOD_MARKERS: &'static [Self] =
        &[Self::D, Self::K, Self::Bang, Self::At, Self::R, Self::S];

    pub const fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            D => "'d'",
            K => "'k'",
            L => "'l'",
            H => "'h'",
            Bang => "'!'",
            At => "'@'",
            R => "'r'",
            S => "'s'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LeftParen => "'('",
            RightParen => "')'",
            Comma => "','",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Error => "<error>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        TokenKind::lexer(s).collect()
    }

    #[test]
    fn test_lex_dice_with_mods() {
        assert_eq!(
            kinds("5d10!kh2 + 3"),
            vec![Integer, D, Integer, Bang, K, H, Integer, Plus, Integer]
        );
    }

    #[test]
    fn test_lex_skips_whitespace() {
        assert_eq!(
            kinds(" {2d6 ,\t3k8}\n@2 "),
            vec![LeftBrace, Integer, D, Integer, Comma, Integer, K, Integer, RightBrace, At, Integer]
        );
    }

    #[test]
    fn test_lex_error() {
        assert_eq!(kinds("2x6"), vec![Integer, Error, Integer]);
    }
}
