use super::*;
use crate::buffer::TextBuffer;

#[test]
fn test_parse_without_marker() {
    let parsed = ParsedTemplate::parse("display: flex;");
    assert_eq!(parsed.text, "display: flex;");
    assert_eq!(parsed.caret, None);
}

#[test]
fn test_parse_marker_on_first_line() {
    let parsed = ParsedTemplate::parse("console.log($CURSOR$);");
    assert_eq!(parsed.text, "console.log();");
    assert_eq!(parsed.caret, Some(CaretOffset { line: 0, column: 12 }));
}

#[test]
fn test_parse_marker_on_later_line() {
    let parsed = ParsedTemplate::parse("def f():\n    $CURSOR$\n    pass");
    assert_eq!(parsed.text, "def f():\n    \n    pass");
    assert_eq!(parsed.caret, Some(CaretOffset { line: 1, column: 4 }));
}

#[test]
fn test_parse_only_first_marker_is_removed() {
    let parsed = ParsedTemplate::parse("a$CURSOR$b$CURSOR$");
    assert_eq!(parsed.text, "ab$CURSOR$");
    assert_eq!(parsed.caret, Some(CaretOffset { line: 0, column: 1 }));
}

#[test]
fn test_expand_places_caret_at_marker() {
    let mut buffer = TextBuffer::new("let x = log ");
    let caret = expand(&mut buffer, Range::on_line(0, 8, 12), "console.log($CURSOR$);");

    assert_eq!(buffer.text(), "let x = console.log();");
    assert_eq!(caret, Position::new(0, 20));
    assert_eq!(buffer.caret(), caret);
}

#[test]
fn test_expand_multi_line_marker_uses_absolute_column() {
    let mut buffer = TextBuffer::new("x\n  for ");
    let caret = expand(
        &mut buffer,
        Range::on_line(1, 2, 6),
        "for item in items:\n    $CURSOR$\n    pass",
    );

    assert_eq!(buffer.text(), "x\n  for item in items:\n    \n    pass");
    assert_eq!(caret, Position::new(2, 4));
}

#[test]
fn test_expand_without_marker_single_line_ends_after_text() {
    let mut buffer = TextBuffer::new("  link:css ");
    let caret = expand(&mut buffer, Range::on_line(0, 2, 11), "<link rel=\"stylesheet\">");
    assert_eq!(caret, Position::new(0, 25));
}

#[test]
fn test_expand_without_marker_multi_line_ends_after_last_line() {
    let mut buffer = TextBuffer::new("    blk ");
    let caret = expand(&mut buffer, Range::on_line(0, 4, 8), "{\n    body\n}");
    assert_eq!(buffer.text(), "    {\n    body\n}");
    assert_eq!(caret, Position::new(2, 1));
}

#[test]
fn test_expand_is_single_undo_step() {
    let mut buffer = TextBuffer::new("log ");
    expand(&mut buffer, Range::on_line(0, 0, 4), "a\n$CURSOR$b");
    assert_eq!(buffer.undo_depth(), 1);
    assert!(buffer.undo());
    assert_eq!(buffer.text(), "log ");
}

#[test]
fn test_expand_reveals_distant_caret() {
    let mut content = vec![String::new(); 5];
    content.push("for ".to_string());
    let mut buffer = TextBuffer::new(&content.join("\n")).with_viewport_lines(4);

    let template = format!("for {{\n{}$CURSOR$\n}}", "\n".repeat(10));
    let caret = expand(&mut buffer, Range::on_line(5, 0, 4), &template);

    assert_eq!(caret.line, 16);
    assert_eq!(buffer.viewport_top(), 14);
}
