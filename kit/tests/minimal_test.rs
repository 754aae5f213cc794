//! End-to-end behaviour on small, hand-checked streams.

use citekit::{Citation, StreamingCitationParser};

/// Feed `chunks` in order and finalize, returning all clean text and
/// citations.
fn stream(parser: &mut StreamingCitationParser, chunks: &[&str]) -> (String, Vec<Citation>) {
    let mut text = String::new();
    let mut citations = Vec::new();
    for chunk in chunks {
        let out = parser.process_chunk(chunk);
        text.push_str(&out.text);
        citations.extend(out.citations);
    }
    text.push_str(&parser.finalize());
    (text, citations)
}

fn render(citations: &[Citation]) -> String {
    citations
        .iter()
        .map(|c| {
            format!(
                "{}..{} {} | {} | {}",
                c.start_index, c.end_index, c.title, c.description, c.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_broken_link_is_verbatim() {
    let input = "See [broken link\n(https://x.com)";
    let (text, citations) = stream(&mut StreamingCitationParser::new(), &[input]);

    assert_eq!(text, input);
    assert!(citations.is_empty());
}

#[test]
fn test_multiple_sequential_links() {
    let (text, citations) = stream(
        &mut StreamingCitationParser::new(),
        &["[A](http://a.com) and [B](http://b.com)"],
    );

    insta::assert_snapshot!(text, @"A and B");
    insta::assert_snapshot!(render(&citations), @r"
    0..1 A.Com | A | http://a.com
    6..7 B.Com | B | http://b.com
    ");
}

#[test]
fn test_unterminated_trailing_link() {
    let mut parser = StreamingCitationParser::new();

    let out = parser.process_chunk("Sources: [tail](http://incomplete");
    assert_eq!(out.text, "Sources: ");
    assert!(out.citations.is_empty());

    assert_eq!(parser.finalize(), "[tail](http://incomplete");
    assert!(parser.citations().is_empty());
}

#[test]
fn test_token_by_token_delivery() {
    let deltas = [
        "Rust", " is", " described", " in", " [", "the", " book", "](", "https",
        "://doc.rust-lang.org/", "book/", "ch01-", "00-intro", ")", ".",
    ];
    let mut parser = StreamingCitationParser::new();
    let mut emitted = Vec::new();
    let mut text = String::new();

    for delta in deltas {
        let out = parser.process_chunk(delta);
        text.push_str(&out.text);
        emitted.push(out.citations.len());
    }
    text.push_str(&parser.finalize());

    // the citation arrives with the closing paren, not before
    assert_eq!(emitted.iter().position(|&n| n == 1), Some(13));
    insta::assert_snapshot!(text, @"Rust is described in the book.");
    insta::assert_snapshot!(render(parser.citations()), @"21..29 Ch01 00 Intro | the book | https://doc.rust-lang.org/book/ch01-00-intro");
}

#[test]
fn test_text_before_candidate_is_not_delayed() {
    let mut parser = StreamingCitationParser::new();

    assert_eq!(parser.process_chunk("Hello ").text, "Hello ");
    assert_eq!(parser.process_chunk("world [x").text, "world ");
    assert_eq!(parser.process_chunk("y").text, "");
    assert_eq!(parser.process_chunk("\nz").text, "[xy\nz");
}

#[test]
fn test_reset_then_replay_matches_fresh() {
    let inputs: [&[&str]; 3] = [
        &["See [broken link\n(https://x.com)"],
        &["[A](http://a.com) and [B](http://b.com)"],
        &["...[tail](http://incomplete"],
    ];

    let mut reused = StreamingCitationParser::new();
    stream(&mut reused, &["[warm](http://up.io) up [partial"]);

    for chunks in inputs {
        reused.reset();
        let replayed = stream(&mut reused, chunks);
        let fresh = stream(&mut StreamingCitationParser::new(), chunks);
        assert_eq!(replayed, fresh);
        assert_eq!(reused.citations(), fresh.1.as_slice());
    }
}

#[test]
fn test_parser_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StreamingCitationParser>();
    assert_send_sync::<citekit::ParserState>();
}
