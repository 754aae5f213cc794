//! Scanner tokens for inline link markup.
//!
//! The grammar only cares about five characters. Everything else is lexed as
//! a maximal [`LinkToken::Text`] run, which is inert in every mode except as
//! content for the link text or URL accumulators. Since each structural token
//! is a single character, lexing an appended suffix on its own yields the
//! same transitions as lexing the whole stream at once.

use core::ops::Range;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkToken {
    #[token("[")]
    OpenBracket,

    #[token("]")]
    CloseBracket,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("\n")]
    Newline,

    #[regex(r"[^\[\]()\n]+")]
    Text,
}

/// Lex `source[from..]`, returning tokens with spans relative to `source`.
///
/// Bytes the lexer rejects are reported as [`LinkToken::Text`] so that no
/// input is ever dropped.
pub fn lex_from(source: &str, from: usize) -> Vec<(LinkToken, Range<usize>)> {
    let mut lexer = LinkToken::lexer(&source[from..]);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.unwrap_or(LinkToken::Text);
        tokens.push((token, from + span.start..from + span.end));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_link() {
        let tokens: Vec<_> = lex_from("see [a b](x)", 0)
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                LinkToken::Text,
                LinkToken::OpenBracket,
                LinkToken::Text,
                LinkToken::CloseBracket,
                LinkToken::OpenParen,
                LinkToken::Text,
                LinkToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_lex_offsets_are_absolute() {
        let tokens = lex_from("abc[d\n", 3);
        assert_eq!(
            tokens,
            vec![
                (LinkToken::OpenBracket, 3..4),
                (LinkToken::Text, 4..5),
                (LinkToken::Newline, 5..6),
            ]
        );
    }

    #[test]
    fn test_lex_unicode_text_run() {
        let tokens = lex_from("日本語 🦀", 0);
        assert_eq!(tokens, vec![(LinkToken::Text, 0..14)]);
    }

    #[test]
    fn test_lex_empty_suffix() {
        assert!(lex_from("abc", 3).is_empty());
    }
}
