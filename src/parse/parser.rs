use super::{ast::*, lexer::*};
use crate::common::*;
use logos_iter::LogosIter;
use std::fmt;
use std::ops::Range;

type PResult<T> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: TokenKind,
        expected: Vec<TokenKind>,
    },
    UnexpectedString {
        expected: Vec<TokenKind>,
    },
    UnexpectedEnd {
        expected: Vec<TokenKind>,
    },
    InvalidInteger,
    ZeroDice,
    TooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected token: found {}, expected ", found)?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                write!(f, "expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::InvalidInteger => write!(f, "integer is too large"),
            Self::ZeroDice => write!(f, "dice must have at least one die and one face"),
            Self::TooDeep => write!(f, "expression is nested too deeply"),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let len = expected.len();

    if expected.is_empty() {
        Ok(())
    } else if len == 1 {
        f.write_str(expected[0].as_str())
    } else if len == 2 {
        write!(f, "{} or {}", expected[0], expected[1])
    } else {
        for exp in &expected[..len - 1] {
            write!(f, "{}, ", exp)?;
        }
        write!(f, "or {}", expected[len - 1])
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// How many expressions and terms may nest inside each other.
    pub const MAX_DEPTH: usize = 256;

    const VALUE_START: &'static [TokenKind] = &[
        TokenKind::Integer,
        TokenKind::D,
        TokenKind::K,
        TokenKind::LeftBrace,
        TokenKind::LeftParen,
    ];

    const AFTER_EXPRESSION: &'static [TokenKind] = &[
        TokenKind::Comma,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
    ];

    pub fn new(s: &'a str) -> Self {
        Self {
            lexer: lexer(s),
            source: s,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> PResult<Roll> {
        let roll = self.parse_roll()?;
        log::trace!("parsed {:?} as {}", self.source, roll);
        Ok(roll)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        self.lexer.next()
    }

    fn peek(&mut self) -> Option<TokenKind> {
        self.lexer.peek().copied()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.lexer
            .peek()
            .map_or(false, |peeked| options.contains(peeked))
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected_token(vec![expected])
        }
    }

    fn error<T>(&mut self, kind: ParseErrorKind) -> PResult<T> {
        let span = self.lexer.span();
        self.error_at(kind, span)
    }

    fn error_at<T>(&self, kind: ParseErrorKind, span: Range<usize>) -> PResult<T> {
        Err(ParseError {
            slice: self.source.get(span.clone()).unwrap_or_default().to_string(),
            kind,
            span,
        })
    }

    fn unexpected_token<T>(&mut self, expected: Vec<TokenKind>) -> PResult<T> {
        match self.advance() {
            None => {
                let end = self.source.len();
                self.error_at(ParseErrorKind::UnexpectedEnd { expected }, end..end)
            }
            Some(TokenKind::Error) => self.error(ParseErrorKind::UnexpectedString { expected }),
            Some(found) => self.error(ParseErrorKind::UnexpectedToken { found, expected }),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= Self::MAX_DEPTH {
            return self.error(ParseErrorKind::TooDeep);
        }
        self.depth += 1;
        let ret = f(self);
        self.depth -= 1;
        ret
    }

    fn parse_roll(&mut self) -> PResult<Roll> {
        let mut expressions = vec1![self.parse_expression()?];
        while self.matches(TokenKind::Comma) {
            self.advance();
            expressions.push(self.parse_expression()?);
        }

        if self.peek().is_some() {
            return self.unexpected_token(Self::AFTER_EXPRESSION.to_vec());
        }
        Ok(Roll::new(expressions))
    }

    fn parse_expression(&mut self) -> PResult<Expression> {
        self.nested(|p| {
            let mut values = vec1![p.parse_term()?];
            let mut operators = Vec::new();

            while p.matches_any(TokenKind::ADDITION_OPS) {
                operators.push(p.parse_operator());
                values.push(p.parse_term()?);
            }

            Ok(Expression::new(values, operators))
        })
    }

    /// `*` and `/` nest to the right: `a / b * c` is `a / (b * c)`.
    fn parse_term(&mut self) -> PResult<Value> {
        self.nested(|p| {
            let first = p.parse_value()?;
            if !p.matches_any(TokenKind::MULTIPLICATION_OPS) {
                return Ok(first);
            }

            let op = p.parse_operator();
            let rest = p.parse_term()?;
            let term = Expression::new(vec1![first, rest], vec![op]);
            Ok(Value::new(ValueKind::Term(term), Operator::None))
        })
    }

    fn parse_operator(&mut self) -> Operator {
        match self.advance() {
            Some(TokenKind::Plus) => Operator::Plus,
            Some(TokenKind::Minus) => Operator::Minus,
            Some(TokenKind::Star) => Operator::Mul,
            Some(TokenKind::Slash) => Operator::Div,
            _ => unreachable!("caller checked for an operator"),
        }
    }

    fn parse_value(&mut self) -> PResult<Value> {
        let unary = if self.matches_any(TokenKind::UNARY_OPS) {
            self.parse_operator()
        } else {
            Operator::None
        };

        let inner = match self.peek() {
            Some(TokenKind::LeftBrace) => {
                let seq = self.parse_sequence()?;
                ValueKind::Dice(self.parse_mods(seq.into())?)
            }
            Some(TokenKind::Integer) => {
                let n = self.parse_integer()?;
                let start = self.lexer.span().start;
                if self.matches_any(TokenKind::DICE_MARKERS) {
                    let dice = self.parse_dice(Some((n, start)))?;
                    ValueKind::Dice(self.parse_mods(dice.into())?)
                } else {
                    ValueKind::Number(n)
                }
            }
            Some(TokenKind::D | TokenKind::K) => {
                let dice = self.parse_dice(None)?;
                ValueKind::Dice(self.parse_mods(dice.into())?)
            }
            Some(TokenKind::LeftParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RightParen)?;
                ValueKind::Group(expr)
            }
            _ => return self.unexpected_token(Self::VALUE_START.to_vec()),
        };

        Ok(Value::new(inner, unary))
    }

    fn parse_integer(&mut self) -> PResult<Int> {
        self.consume(TokenKind::Integer)?;
        match self.lexer.slice().parse() {
            Ok(x) => Ok(x),
            Err(_) => self.error(ParseErrorKind::InvalidInteger),
        }
    }

    /// Parses the rest of a dice literal, starting at its marker.
    ///
    /// `count` holds the already consumed number of dice and where it started.
    fn parse_dice(&mut self, count: Option<(Int, usize)>) -> PResult<Dice> {
        self.advance();
        let marker_start = self.lexer.span().start;
        let (num_of_dice, start) = count.unwrap_or((1, marker_start));
        let base = self.parse_integer()?;

        if base == 0 || num_of_dice == 0 {
            let end = self.lexer.span().end;
            return self.error_at(ParseErrorKind::ZeroDice, start..end);
        }
        Ok(Dice::new(base, num_of_dice))
    }

    fn parse_sequence(&mut self) -> PResult<Sequence> {
        self.consume(TokenKind::LeftBrace)?;
        let mut values = vec1![self.parse_expression()?];
        while self.matches(TokenKind::Comma) {
            self.advance();
            values.push(self.parse_expression()?);
        }
        self.consume(TokenKind::RightBrace)?;
        Ok(Sequence::new(values))
    }

    fn parse_mods(&mut self, base: DiceExpression) -> PResult<DiceExpression> {
        let mut mods = Vec::new();
        while self.matches_any(TokenKind::MOD_MARKERS) {
            mods.push(self.parse_mod()?);
        }
        Ok(base.with_mods(mods))
    }

    fn parse_mod(&mut self) -> PResult<ModSpec> {
        let kind = match self.advance() {
            Some(TokenKind::D) => {
                if self.matches(TokenKind::L) {
                    self.advance();
                }
                ModKind::DiscardLow
            }
            Some(TokenKind::K) => {
                if self.matches(TokenKind::H) {
                    self.advance();
                }
                ModKind::KeepHigh
            }
            Some(TokenKind::Bang) => ModKind::Explode,
            Some(TokenKind::At | TokenKind::R) => ModKind::Repeat,
            Some(TokenKind::S) => ModKind::Sum,
            _ => unreachable!("caller checked for a modifier marker"),
        };

        let argument = if self.matches(TokenKind::Integer) {
            Some(self.parse_integer()?)
        } else {
            None
        };
        Ok(ModSpec::new(kind, argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::*;

    fn parse(s: &str) -> PResult<Roll> {
        Parser::new(s).parse()
    }

    fn check(s: &str, expected: Vec<Expression>) {
        let parsed = parse(s).unwrap();
        assert_eq!(parsed.expressions.into_vec(), expected);
    }

    fn check_kind(s: &str, expected: ParseErrorKind) {
        assert_eq!(parse(s).unwrap_err().kind, expected);
    }

    fn dice_expr(num_of_dice: Int, base: Int, mods: Vec<ModSpec>) -> Value {
        let dice: DiceExpression = Dice::new(base, num_of_dice).into();
        Value::new(ValueKind::Dice(dice.with_mods(mods)), Operator::None)
    }

    fn seq(values: Vec<Expression>, mods: Vec<ModSpec>) -> Value {
        let seq: DiceExpression = Sequence::new(NonEmpty::try_from_vec(values).unwrap()).into();
        Value::new(ValueKind::Dice(seq.with_mods(mods)), Operator::None)
    }

    #[test]
    fn test_parse_numbers() {
        check("32", vec![single(Value::num(32))]);
        check("-7", vec![single(Value::num(7).neg())]);
        check(
            "+7",
            vec![single(Value::new(ValueKind::Number(7), Operator::Plus))],
        );
    }

    #[test]
    fn test_parse_dice() {
        check("1d20", vec![single(Value::dice(1, 20))]);
        check("d4", vec![single(Value::dice(1, 4))]);
        check("3k6", vec![single(Value::dice(3, 6))]);
        check("2 d 8", vec![single(Value::dice(2, 8))]);
    }

    #[test]
    fn test_parse_mods() {
        use ModKind::*;

        check(
            "5d10!kh2",
            vec![single(dice_expr(
                5,
                10,
                vec![ModSpec::new(Explode, None), ModSpec::new(KeepHigh, Some(2))],
            ))],
        );
        check(
            "4d6dl1",
            vec![single(dice_expr(4, 6, vec![ModSpec::new(DiscardLow, Some(1))]))],
        );
        check(
            "4d6d",
            vec![single(dice_expr(4, 6, vec![ModSpec::new(DiscardLow, None)]))],
        );
        check(
            "2d3r2s",
            vec![single(dice_expr(
                2,
                3,
                vec![ModSpec::new(Repeat, Some(2)), ModSpec::new(Sum, None)],
            ))],
        );
    }

    #[test]
    fn test_parse_explode_sorted_first() {
        let parsed = parse("5d6kh2!").unwrap();
        assert_eq!(parsed.to_string(), "5d6!kh2");
    }

    #[test]
    fn test_parse_sequence() {
        check(
            "{1, 2, 3}k2",
            vec![single(seq(
                vec![single(Value::num(1)), single(Value::num(2)), single(Value::num(3))],
                vec![ModSpec::new(ModKind::KeepHigh, Some(2))],
            ))],
        );
        check(
            "{2d6, 3d8}@2",
            vec![single(seq(
                vec![single(Value::dice(2, 6)), single(Value::dice(3, 8))],
                vec![ModSpec::new(ModKind::Repeat, Some(2))],
            ))],
        );
    }

    #[test]
    fn test_parse_precedence() {
        let term = Value::new(
            ValueKind::Term(chain(Value::num(2), vec![(Operator::Mul, Value::num(3))])),
            Operator::None,
        );
        check(
            "1 + 2 * 3",
            vec![chain(Value::num(1), vec![(Operator::Plus, term)])],
        );
        check(
            "(1 + 2) * 3",
            vec![single(Value::new(
                ValueKind::Term(chain(
                    Value::group(chain(Value::num(1), vec![(Operator::Plus, Value::num(2))])),
                    vec![(Operator::Mul, Value::num(3))],
                )),
                Operator::None,
            ))],
        );
    }

    #[test]
    fn test_parse_term_nests_right() {
        let inner = Value::new(
            ValueKind::Term(chain(Value::num(2), vec![(Operator::Mul, Value::num(5))])),
            Operator::None,
        );
        check(
            "20 / 2 * 5",
            vec![single(Value::new(
                ValueKind::Term(chain(Value::num(20), vec![(Operator::Div, inner)])),
                Operator::None,
            ))],
        );
        assert_eq!(parse("20 / 2 * 5").unwrap().to_string(), "20 / 2 * 5");
    }

    #[test]
    fn test_parse_multiple_expressions() {
        check(
            "5d10!kh2 + 3, {2d6,3d8}@2",
            vec![
                chain(
                    dice_expr(
                        5,
                        10,
                        vec![
                            ModSpec::new(ModKind::Explode, None),
                            ModSpec::new(ModKind::KeepHigh, Some(2)),
                        ],
                    ),
                    vec![(Operator::Plus, Value::num(3))],
                ),
                single(seq(
                    vec![single(Value::dice(2, 6)), single(Value::dice(3, 8))],
                    vec![ModSpec::new(ModKind::Repeat, Some(2))],
                )),
            ],
        );
    }

    #[test]
    fn test_display_round_trip() {
        for s in [
            "5d10!kh2 + 3, {2d6, 3d8}@2",
            "-(1d4 + 2) * 3 / 2 - 1",
            "{1, {2, 3}s}dl1 + {4}",
            "10 / 0",
        ] {
            let parsed = parse(s).unwrap();
            assert_eq!(parsed.to_string(), s);
            assert_eq!(parse(&parsed.to_string()).unwrap(), parsed);
        }
    }

    #[test]
    fn test_err_unbalanced() {
        check_kind(
            "{1, 2",
            ParseErrorKind::UnexpectedEnd {
                expected: vec![TokenKind::RightBrace],
            },
        );
        check_kind(
            "(1 + 2",
            ParseErrorKind::UnexpectedEnd {
                expected: vec![TokenKind::RightParen],
            },
        );
        check_kind(
            "1 + 2)",
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::RightParen,
                expected: Parser::AFTER_EXPRESSION.to_vec(),
            },
        );
    }

    #[test]
    fn test_err_trailing_garbage() {
        let err = parse("2d6 x").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedString {
                expected: Parser::AFTER_EXPRESSION.to_vec()
            }
        );
        assert_eq!(err.span, 4..5);
        assert_eq!(err.slice, "x");
    }

    #[test]
    fn test_err_modifier_on_number() {
        assert!(parse("5kh2").is_err());
        assert!(parse("5!").is_err());
        assert!(parse("2d").is_err());
        assert!(parse("").is_err());
        assert!(parse("1,").is_err());
        assert!(parse("--2").is_err());
    }

    #[test]
    fn test_err_zero_dice() {
        let err = parse("1 + 0d6").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ZeroDice);
        assert_eq!(err.slice, "0d6");
        check_kind("2d0", ParseErrorKind::ZeroDice);
    }

    #[test]
    fn test_err_too_deep() {
        let deep = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        check_kind(&deep, ParseErrorKind::TooDeep);

        let braces = format!("{}1{}", "{".repeat(50_000), "}".repeat(50_000));
        check_kind(&braces, ParseErrorKind::TooDeep);

        let product = vec!["2"; 50_000].join(" * ");
        check_kind(&product, ParseErrorKind::TooDeep);
    }

    #[test]
    fn test_nesting_below_limit() {
        let nested = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(parse(&nested).is_ok());
        let product = vec!["2"; 200].join(" * ");
        assert!(parse(&product).is_ok());
    }

    #[test]
    fn test_err_integer_too_large() {
        check_kind("99999999999999999999", ParseErrorKind::InvalidInteger);
    }
}
