//! # Parsing Utils
//!
//! Splits command input into the command word and its arguments. Double
//! quotes group a multi-word argument: `.set_goal "Run a marathon" 01-06-2027 high`.

/// Splits `msg` at the first whitespace into `(cmd, rest)`.
pub fn split_command(msg: &str) -> (&str, &str) {
    let msg = msg.trim();
    match msg.find(char::is_whitespace) {
        Some(idx) => (&msg[..idx], msg[idx..].trim_start()),
        None => (msg, ""),
    }
}

/// Whitespace-separated arguments with double-quote grouping. An unterminated
/// quote runs to the end of the input.
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command(".help"), (".help", ""));
        assert_eq!(split_command("  .set_goal  a b "), (".set_goal", "a b"));
    }

    #[test]
    fn test_split_args_plain() {
        assert_eq!(split_args("10 20  30\t4"), vec!["10", "20", "30", "4"]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_split_args_quoted() {
        assert_eq!(
            split_args(r#""Run a marathon" 01-06-2027 high"#),
            vec!["Run a marathon", "01-06-2027", "high"]
        );
        assert_eq!(split_args(r#"say "" end"#), vec!["say", "", "end"]);
        assert_eq!(split_args(r#""open ended"#), vec!["open ended"]);
    }
}
