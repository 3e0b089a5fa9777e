//! Integration tests for the markup tokenizer.

use quickcheck_macros::quickcheck;
use strum::IntoEnumIterator;
use wombat_html::{Attribute, HTMLTokenizer, LexicalError, Token, TokenKind, tokenize};

fn tokens(input: &str) -> Vec<Token> {
    tokenize(input).unwrap()
}

fn attr(name: &str, value: &str) -> Attribute {
    Attribute::new(name, value)
}

#[test]
fn test_nested_elements() {
    assert_eq!(
        tokens(r#"<div class="a"><p>Hi</p></div>"#),
        vec![
            Token::tag_open("div", vec![attr("class", "a")]),
            Token::tag_open("p", vec![]),
            Token::text("Hi"),
            Token::tag_close("p"),
            Token::tag_close("div"),
        ]
    );
}

#[test]
fn test_self_closing_emits_open_and_close() {
    assert_eq!(
        tokens(r#"<img src="x"/>"#),
        vec![
            Token::tag_open("img", vec![attr("src", "x")]),
            Token::tag_close("img"),
        ]
    );
    assert_eq!(
        tokens("<br />"),
        vec![Token::tag_open("br", vec![]), Token::tag_close("br")]
    );
}

#[test]
fn test_comment_value_is_trimmed() {
    assert_eq!(tokens("<!-- note -->"), vec![Token::comment("note")]);
    assert_eq!(
        tokens("<!--  two  words  -->"),
        vec![Token::comment("two  words")]
    );
    assert_eq!(tokens("<!---->"), vec![Token::comment("")]);
}

#[test]
fn test_comment_ends_at_first_terminator() {
    assert_eq!(
        tokens("<!-- a --> b -->"),
        vec![Token::comment("a"), Token::text("b -->")]
    );
}

#[test]
fn test_comment_may_contain_markup() {
    assert_eq!(
        tokens("<!-- <p>not a tag</p> -->"),
        vec![Token::comment("<p>not a tag</p>")]
    );
}

#[test]
fn test_unterminated_comment_runs_to_end() {
    assert_eq!(tokens("<!-- open"), vec![Token::comment("open")]);
}

#[test]
fn test_doctype_keeps_letters_only() {
    assert_eq!(tokens("<!DOCTYPE html>"), vec![Token::doctype("html")]);
    assert_eq!(tokens("<!doctype HTML>"), vec![Token::doctype("HTML")]);
    assert_eq!(
        tokens(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD 4.01//EN">"#),
        vec![Token::doctype("htmlPUBLICWCDTDEN")]
    );
}

#[test]
fn test_whitespace_between_tags_is_dropped() {
    assert_eq!(
        tokens("  <ul>\n  <li>a</li>\n  <li>b </li>\n</ul>\n"),
        vec![
            Token::tag_open("ul", vec![]),
            Token::tag_open("li", vec![]),
            Token::text("a"),
            Token::tag_close("li"),
            Token::tag_open("li", vec![]),
            Token::text("b "),
            Token::tag_close("li"),
            Token::tag_close("ul"),
        ]
    );
}

#[test]
fn test_text_is_verbatim() {
    assert_eq!(
        tokens("a &amp; b > c"),
        vec![Token::text("a &amp; b > c")]
    );
}

#[test]
fn test_empty_and_blank_input() {
    assert!(tokens("").is_empty());
    assert!(tokens(" \n\t ").is_empty());
}

#[test]
fn test_attributes_in_source_order() {
    assert_eq!(
        tokens(r#"<a href="/x" data-id="7" title="t t">"#),
        vec![Token::tag_open(
            "a",
            vec![attr("href", "/x"), attr("data-id", "7"), attr("title", "t t")]
        )]
    );
}

#[test]
fn test_duplicate_attributes_kept() {
    assert_eq!(
        tokens(r#"<a x="1" x="2">"#),
        vec![Token::tag_open("a", vec![attr("x", "1"), attr("x", "2")])]
    );
}

#[test]
fn test_attribute_without_equals_has_empty_value() {
    assert_eq!(
        tokens(r#"<input disabled name="n">"#),
        vec![Token::tag_open(
            "input",
            vec![attr("disabled", ""), attr("name", "n")]
        )]
    );
}

#[test]
fn test_unquoted_attribute_value_is_dropped() {
    // Only double-quoted values are read; the bare word becomes a name.
    assert_eq!(
        tokens("<a x=1 y>"),
        vec![Token::tag_open("a", vec![attr("x", ""), attr("1", ""), attr("y", "")])]
    );
}

#[test]
fn test_unterminated_attribute_value_runs_to_end() {
    assert_eq!(
        tokens(r#"<a title="never closed>text"#),
        vec![Token::tag_open("a", vec![attr("title", "never closed>text")])]
    );
}

#[test]
fn test_end_tag_skips_to_closing_bracket() {
    assert_eq!(
        tokens("<b>x</b junk>y"),
        vec![
            Token::tag_open("b", vec![]),
            Token::text("x"),
            Token::tag_close("b"),
            Token::text("y"),
        ]
    );
}

#[test]
fn test_tag_names_are_alphanumeric_runs() {
    assert_eq!(
        tokens("<h1>t</h1>"),
        vec![
            Token::tag_open("h1", vec![]),
            Token::text("t"),
            Token::tag_close("h1"),
        ]
    );
}

#[test]
fn test_malformed_declaration_is_fatal() {
    let err = tokenize("<p>ok</p>\n<!ELEMENT p>").unwrap_err();
    assert!(matches!(
        err,
        LexicalError::MalformedDeclaration { offset: 10, ref found } if found == "ELEMENT "
    ));
    assert_eq!(err.offset(), 10);
    assert!(err.to_string().contains("byte offset 10"));
}

#[test]
fn test_error_offset_counts_trimmed_whitespace() {
    let err = tokenize("   <!x>").unwrap_err();
    assert_eq!(err.offset(), 3);
}

#[test]
fn test_tokenizer_consumed_by_run() {
    let tokenizer = HTMLTokenizer::new("<p>a</p>");
    assert_eq!(tokenizer.run().unwrap().len(), 3);
    // A second scan needs a fresh instance.
    assert_eq!(HTMLTokenizer::new("<p>a</p>").run().unwrap().len(), 3);
}

#[test]
fn test_token_kind_names() {
    let kinds: Vec<&'static str> = tokens("<!DOCTYPE html><!--c--><p>t</p>")
        .iter()
        .map(|token| token.kind().into())
        .collect();
    assert_eq!(
        kinds,
        vec!["Doctype", "Comment", "TagOpen", "Text", "TagClose"]
    );
    assert_eq!(TokenKind::TagOpen.to_string(), "TagOpen");
}

#[test]
fn test_every_token_kind_is_emitted() {
    let emitted: Vec<TokenKind> = tokens("<p></p>t<!--c--><!DOCTYPE html>")
        .iter()
        .map(Token::kind)
        .collect();
    assert_eq!(emitted, TokenKind::iter().collect::<Vec<_>>());
    let names: Vec<&'static str> = TokenKind::iter().map(Into::into).collect();
    assert_eq!(names, vec!["TagOpen", "TagClose", "Text", "Comment", "Doctype"]);
}

#[test]
fn test_token_display() {
    let rendered: Vec<String> = tokens(r#"<a href="/">x</a><!--c-->"#)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        rendered,
        vec![r#"<a href="/">"#, r#"Text("x")"#, "</a>", "<!--c-->"]
    );
}

#[test]
fn test_tokens_serialize_with_type_tag() {
    let json = serde_json::to_value(tokens(r#"<a href="/">x</a>"#)).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "TagOpen", "name": "a", "attributes": [{"name": "href", "value": "/"}]},
            {"type": "Text", "value": "x"},
            {"type": "TagClose", "name": "a"},
        ])
    );
}

#[quickcheck]
fn prop_tokenizer_never_panics(input: String) -> bool {
    // Either outcome is fine; only termination without a panic is checked.
    let _ = tokenize(&input);
    true
}

#[quickcheck]
fn prop_text_without_markup_is_one_token(input: String) -> bool {
    let text: String = input.chars().filter(|&c| c != '<').collect();
    let trimmed = text.trim();
    let tokens = tokenize(&text).unwrap();
    if trimmed.is_empty() {
        tokens.is_empty()
    } else {
        tokens == vec![Token::text(trimmed)]
    }
}
