//! Saving a parser mid-stream and resuming it elsewhere.
use citekit::{
    Mode, ParserConfig, ParserState, PathSegmentTitle, StreamingCitationParser, strip_citations,
};

fn resume(state: ParserState) -> StreamingCitationParser {
    StreamingCitationParser::from_state(state, ParserConfig::DEFAULT, PathSegmentTitle).unwrap()
}

#[test]
fn test_resume_through_json_matches_uninterrupted() {
    let input = "Read [the guide](https://example.com/user-guide) and [the faq](https://example.com/faq) too";
    let (want_text, want_citations) = strip_citations(input);

    for at in input.char_indices().map(|(i, _)| i) {
        let mut first = StreamingCitationParser::new();
        let mut text = first.process_chunk(&input[..at]).text;

        let json = serde_json::to_string(first.state()).unwrap();
        let state: ParserState = serde_json::from_str(&json).unwrap();
        assert_eq!(&state, first.state());

        let mut second = resume(state);
        text.push_str(&second.process_chunk(&input[at..]).text);
        text.push_str(&second.finalize());

        assert_eq!(text, want_text, "split at {at}");
        assert_eq!(second.citations(), want_citations.as_slice());
    }
}

#[test]
fn test_saved_state_shape() {
    let mut parser = StreamingCitationParser::new();
    parser.process_chunk("ok [la");

    let value = serde_json::to_value(parser.state()).unwrap();
    assert_eq!(value["mode"], "LinkText");
    assert_eq!(value["pending"]["text"], "[la");
    assert_eq!(value["link_text"], "la");
    assert_eq!(value["clean_len"], 3);
}

#[test]
fn test_into_state_resumes() {
    let mut parser = StreamingCitationParser::new();
    parser.process_chunk("[a](");
    let mut resumed = resume(parser.into_state());

    assert_eq!(resumed.mode(), Mode::LinkLocation);
    let out = resumed.process_chunk("http://a.io)");
    assert_eq!(out.text, "a");
    assert_eq!(out.citations[0].url, "http://a.io");
}

#[test_case::test_case("mode", serde_json::json!("Initial"); "text outside candidate")]
#[test_case::test_case("clean_len", serde_json::json!(0); "citation past clean text")]
#[test_case::test_case("link_text", serde_json::json!("zz"); "link text not in buffer")]
#[test_case::test_case("mode", serde_json::json!("LinkLocation"); "mode ahead of buffer")]
fn test_tampered_state_is_rejected(field: &str, value: serde_json::Value) {
    let mut parser = StreamingCitationParser::new();
    parser.process_chunk("[x](http://x.io) [y");

    let mut json = serde_json::to_value(parser.state()).unwrap();
    json[field] = value;
    let state: ParserState = serde_json::from_value(json).unwrap();

    let err = StreamingCitationParser::from_state(state, ParserConfig::DEFAULT, PathSegmentTitle)
        .unwrap_err();
    assert!(err.to_string().starts_with("inconsistent parser state"));
}

#[test]
fn test_uncompacted_buffer_is_rejected() {
    let mut parser = StreamingCitationParser::new();
    parser.process_chunk("[abc");

    let mut json = serde_json::to_value(parser.state()).unwrap();
    json["pending"]["scan"] = serde_json::json!(1);
    let state: ParserState = serde_json::from_value(json).unwrap();

    let err = StreamingCitationParser::from_state(state, ParserConfig::DEFAULT, PathSegmentTitle)
        .unwrap_err();
    assert_eq!(err.reason(), "buffer not compacted");
}
