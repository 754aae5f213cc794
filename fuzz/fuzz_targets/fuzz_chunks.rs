#![no_main]

use arbitrary::Arbitrary;
use citekit::{IndexUnit, ParserConfig, StreamingCitationParser, restore_links};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    cuts: Vec<u8>,
    unit: IndexUnit,
    max_link_len: Option<u8>,
}

fn feed(config: ParserConfig, chunks: &[&str]) -> (String, Vec<citekit::Citation>) {
    let mut parser = StreamingCitationParser::with_config(config);
    let mut text = String::new();
    let mut citations = Vec::new();
    for chunk in chunks {
        let out = parser.process_chunk(chunk);
        text.push_str(&out.text);
        citations.extend(out.citations);
    }
    text.push_str(&parser.finalize());
    assert_eq!(parser.clean_len(), config.index_unit.measure(&text));
    (text, citations)
}

fuzz_target!(|input: Input| {
    let mut config = ParserConfig::new().with_index_unit(input.unit);
    if let Some(max) = input.max_link_len {
        config = config.with_max_link_len(max as usize);
    }

    let mut chunks = Vec::new();
    let mut rest = input.text.as_str();
    for cut in input.cuts {
        if rest.is_empty() {
            break;
        }
        let mut at = (cut as usize).min(rest.len());
        while !rest.is_char_boundary(at) {
            at += 1;
        }
        chunks.push(&rest[..at]);
        rest = &rest[at..];
    }
    chunks.push(rest);

    let whole = feed(config, &[&input.text]);
    let split = feed(config, &chunks);
    assert_eq!(whole, split);

    let (text, citations) = whole;
    let clean_len = input.unit.measure(&text);
    let mut last_end = 0;
    for citation in &citations {
        assert!(citation.start_index < citation.end_index);
        assert!(citation.start_index >= last_end);
        assert!(citation.end_index <= clean_len);
        last_end = citation.end_index;
    }

    assert_eq!(restore_links(&text, &citations, input.unit), input.text);
});
