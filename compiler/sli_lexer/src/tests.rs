use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<LexemeKind<'_>> {
    match tokenize(source) {
        Ok(lexemes) => lexemes.into_iter().map(|l| l.kind).collect(),
        Err(e) => panic!("unexpected lex error: {e}"),
    }
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("42 -7 1.5 .5 2e3 -1.0e-2"),
        vec![
            LexemeKind::Integer(42),
            LexemeKind::Integer(-7),
            LexemeKind::Double(1.5),
            LexemeKind::Double(0.5),
            LexemeKind::Double(2000.0),
            LexemeKind::Double(-0.01),
        ]
    );
}

#[test]
fn names_and_literals() {
    assert_eq!(
        kinds("/x 5 def x add"),
        vec![
            LexemeKind::LiteralName("x"),
            LexemeKind::Integer(5),
            LexemeKind::Name("def"),
            LexemeKind::Name("x"),
            LexemeKind::Name("add"),
        ]
    );
}

#[test]
fn structural_tokens() {
    assert_eq!(
        kinds("{ [ 1 ] << /a 2 >> }"),
        vec![
            LexemeKind::ProcOpen,
            LexemeKind::ArrayOpen,
            LexemeKind::Integer(1),
            LexemeKind::ArrayClose,
            LexemeKind::DictOpen,
            LexemeKind::LiteralName("a"),
            LexemeKind::Integer(2),
            LexemeKind::DictClose,
            LexemeKind::ProcClose,
        ]
    );
}

#[test]
fn strings_nest_and_escape() {
    assert_eq!(
        kinds(r"(a (nested) string) (tab\there) (paren\))"),
        vec![
            LexemeKind::Str("a (nested) string".to_string()),
            LexemeKind::Str("tab\there".to_string()),
            LexemeKind::Str("paren)".to_string()),
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 % line comment\n/* block\ncomment */ 2"),
        vec![LexemeKind::Integer(1), LexemeKind::Integer(2)]
    );
}

#[test]
fn unterminated_string_is_incomplete() {
    let err = tokenize("(open").err();
    assert!(matches!(
        err,
        Some(LexError {
            kind: LexErrorKind::UnterminatedString,
            ..
        })
    ));
    assert!(LexErrorKind::UnterminatedString.is_incomplete());
    assert!(!LexErrorKind::UnexpectedCharacter.is_incomplete());
}

#[test]
fn unterminated_comment_is_incomplete() {
    let err = tokenize("1 /* never closed").err();
    assert!(err.is_some_and(|e| e.kind == LexErrorKind::UnterminatedComment));
}

#[test]
fn integer_overflow_is_reported() {
    let err = tokenize("99999999999999999999999").err();
    assert!(err.is_some_and(|e| e.kind == LexErrorKind::IntegerOutOfRange));
}

#[test]
fn lexemes_before_an_error_are_produced_first() {
    let mut iter = lexemes("1 /x < 2");
    assert_eq!(iter.next().map(|l| l.map(|l| l.kind)), Some(Ok(LexemeKind::Integer(1))));
    assert_eq!(iter.next().map(|l| l.map(|l| l.kind)), Some(Ok(LexemeKind::LiteralName("x"))));
    assert!(matches!(
        iter.next(),
        Some(Err(LexError {
            kind: LexErrorKind::UnexpectedCharacter,
            ..
        }))
    ));
    assert_eq!(iter.next(), None);
}

#[test]
fn spans_point_at_source() {
    let lexemes = tokenize("  /abc").unwrap_or_default();
    assert_eq!(lexemes.len(), 1);
    assert_eq!(lexemes[0].span, Span::new(2, 6));
}

proptest! {
    #[test]
    fn prop_integers_roundtrip(n in any::<i64>()) {
        let text = n.to_string();
        let lexemes = tokenize(&text);
        prop_assert_eq!(lexemes.map(|l| l.into_iter().map(|x| x.kind).collect::<Vec<_>>()),
            Ok(vec![LexemeKind::Integer(n)]));
    }

    #[test]
    fn prop_plain_names_lex_as_names(name in "[a-zA-Z_][a-zA-Z0-9_:]{0,16}") {
        let lexemes = tokenize(&name);
        prop_assert_eq!(lexemes.map(|l| l.into_iter().map(|x| x.kind).collect::<Vec<_>>()),
            Ok(vec![LexemeKind::Name(&name)]));
    }
}
