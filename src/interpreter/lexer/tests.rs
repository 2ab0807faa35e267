use pretty_assertions::assert_eq;
use super::*;

fn scan_all(source: &str) -> Vec<(TokenType, String)> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.scan_token().expect("unexpected lexer error");
        let done = token.token_type() == TokenType::Eof;
        tokens.push((token.token_type(), token.source().to_owned()));

        if done {
            return tokens;
        }
    }
}

#[test]
fn test_operators_and_delimiters() {
    let tokens: Vec<TokenType> = scan_all("=+(){}[],;:?!-/ *<>").into_iter().map(|(t, _)| t).collect();

    assert_eq!(vec![
        TokenType::Assign, TokenType::Plus,
        TokenType::ParenthesisLeft, TokenType::ParenthesisRight,
        TokenType::BracketLeft, TokenType::BracketRight,
        TokenType::SquareBracketLeft, TokenType::SquareBracketRight,
        TokenType::Comma, TokenType::Semicolon, TokenType::Colon, TokenType::QuestionMark,
        TokenType::Not, TokenType::Minus, TokenType::Divide, TokenType::Multiply,
        TokenType::Less, TokenType::Greater,
        TokenType::Eof,
    ], tokens);
}

#[test]
fn test_maximal_munch() {
    let tokens: Vec<TokenType> = scan_all("10 == 10; 10 != 9; !x").into_iter().map(|(t, _)| t).collect();

    assert_eq!(vec![
        TokenType::Int, TokenType::Equal, TokenType::Int, TokenType::Semicolon,
        TokenType::Int, TokenType::NotEqual, TokenType::Int, TokenType::Semicolon,
        TokenType::Not, TokenType::Identifier,
        TokenType::Eof,
    ], tokens);
}

#[test]
fn test_program() {
    let source = r#"let five = 5;
let add = fn(x, y) {
  x + y;
};
if (5 < 10) { return true; } else { return false; }
"foo bar"
{"a": null}
"#;

    let tokens = scan_all(source);

    assert_eq!(vec![
        (TokenType::Let, "let"), (TokenType::Identifier, "five"), (TokenType::Assign, "="),
        (TokenType::Int, "5"), (TokenType::Semicolon, ";"),
        (TokenType::Let, "let"), (TokenType::Identifier, "add"), (TokenType::Assign, "="),
        (TokenType::Function, "fn"), (TokenType::ParenthesisLeft, "("), (TokenType::Identifier, "x"),
        (TokenType::Comma, ","), (TokenType::Identifier, "y"), (TokenType::ParenthesisRight, ")"),
        (TokenType::BracketLeft, "{"), (TokenType::Identifier, "x"), (TokenType::Plus, "+"),
        (TokenType::Identifier, "y"), (TokenType::Semicolon, ";"), (TokenType::BracketRight, "}"),
        (TokenType::Semicolon, ";"),
        (TokenType::If, "if"), (TokenType::ParenthesisLeft, "("), (TokenType::Int, "5"),
        (TokenType::Less, "<"), (TokenType::Int, "10"), (TokenType::ParenthesisRight, ")"),
        (TokenType::BracketLeft, "{"), (TokenType::Return, "return"), (TokenType::True, "true"),
        (TokenType::Semicolon, ";"), (TokenType::BracketRight, "}"), (TokenType::Else, "else"),
        (TokenType::BracketLeft, "{"), (TokenType::Return, "return"), (TokenType::False, "false"),
        (TokenType::Semicolon, ";"), (TokenType::BracketRight, "}"),
        (TokenType::String, "foo bar"),
        (TokenType::BracketLeft, "{"), (TokenType::String, "a"), (TokenType::Colon, ":"),
        (TokenType::Null, "null"), (TokenType::BracketRight, "}"),
        (TokenType::Eof, ""),
    ].into_iter().map(|(t, s)| (t, s.to_owned())).collect::<Vec<_>>(), tokens);
}

#[test]
fn test_comments_are_skipped() {
    let tokens: Vec<TokenType> = scan_all("1 // one\n/* two /* nested */ still */ 2").into_iter().map(|(t, _)| t).collect();
    assert_eq!(vec![TokenType::Int, TokenType::Int, TokenType::Eof], tokens);
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("x");
    assert_eq!(TokenType::Identifier, lexer.scan_token().unwrap().token_type());
    assert_eq!(TokenType::Eof, lexer.scan_token().unwrap().token_type());
    assert_eq!(TokenType::Eof, lexer.scan_token().unwrap().token_type());
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("a\n  bc");
    let a = lexer.scan_token().unwrap();
    let bc = lexer.scan_token().unwrap();

    assert_eq!(TokenPos::new(1, 1), *a.start());
    assert_eq!(TokenPos::new(2, 3), *bc.start());
    assert_eq!(TokenPos::new(2, 5), *bc.end());
}

#[test]
fn test_errors() {
    let mut lexer = Lexer::new("@");
    assert_eq!(Err(LexerError::UnexpectedCharacter(TokenPos::begin(), '@')), lexer.scan_token());

    let mut lexer = Lexer::new("\"abc");
    let error = lexer.scan_token().unwrap_err();
    assert_eq!(LexerError::UnterminatedString { pos: TokenPos::begin() }, error);
    assert_eq!("[line 1 column 1] Unterminated string", error.to_string());
}

#[test]
fn test_token_type_names() {
    assert_eq!("IDENT", TokenType::Identifier.to_string());
    assert_eq!("EOF", TokenType::Eof.to_string());
    assert_eq!(")", TokenType::ParenthesisRight.to_string());
    assert_eq!("==", TokenType::Equal.to_string());
}
