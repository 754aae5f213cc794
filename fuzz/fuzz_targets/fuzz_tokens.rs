#![no_main]

use citekit::token::{LinkToken, lex_from};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let from = data.char_indices().nth(data.len() % 7).map_or(0, |(i, _)| i);
    let tokens = lex_from(data, from);

    let mut at = from;
    for (token, span) in &tokens {
        assert_eq!(span.start, at);
        assert!(span.end > span.start);
        let slice = &data[span.clone()];
        match token {
            LinkToken::Text => assert!(!slice.contains(['[', ']', '(', ')', '\n'])),
            _ => assert_eq!(slice.len(), 1),
        }
        at = span.end;
    }
    assert_eq!(at, data.len());
});
