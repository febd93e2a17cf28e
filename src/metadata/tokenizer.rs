/// Line tokenizer for `.meta` files
///
/// One pass, left to right. `\` escapes the next character, whitespace
/// separates tokens, `:` `=` `|` are always standalone tokens, and `#` starts
/// a comment only when no token is being accumulated.
const OPERATORS: [char; 3] = [':', '=', '|'];

/// Split one line of metadata text into tokens
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for c in line.chars() {
        if escape {
            current.push(c);
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c.is_whitespace() {
            flush(&mut tokens, &mut current);
        } else if OPERATORS.contains(&c) {
            flush(&mut tokens, &mut current);
            tokens.push(c.to_string());
        } else if c == '#' && current.is_empty() {
            break;
        } else {
            current.push(c);
        }
    }

    // A dangling backslash contributes nothing
    flush(&mut tokens, &mut current);
    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
