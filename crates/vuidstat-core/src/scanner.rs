//! Line scanner for identifier markers
//!
//! This is a lexical scan, not a parser. Identifiers are recovered from
//! whitespace-delimited tokens of each line. A code formatter may have split
//! a long string literal so that an identifier ends the line with its
//! word-joining `-` and continues on the next line:
//!
//! ```text
//! skip |= LogError(device, "VUID-vkCmdDraw-"
//!                          "None-02700", ...);
//! ```
//!
//! [`MarkerScanner`] stitches such lines back into one logical line before
//! tokens are extracted.

use crate::identifier::{IdPrefix, contains_prefix, starts_with_prefix};
use std::borrow::Cow;

/// Character that joins the words of an identifier
pub const WORD_JOINER: char = '-';

/// Scanner state between physical lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Normal,
    /// The previous line ended inside a split identifier
    AwaitingContinuation(String),
}

/// What the scanner made of one physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed<'a> {
    /// The line starts with a comment opener and was ignored
    Comment,
    /// The line ends in a split identifier and was stashed
    Pending,
    /// A complete logical line, ready for token extraction
    Line(Cow<'a, str>),
}

/// Stateful scanner fed one physical line at a time.
#[derive(Debug, Clone, Default)]
pub struct MarkerScanner {
    state: ScanState,
}

impl MarkerScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Feed the next physical line.
    pub fn feed<'a>(&mut self, line: &'a str) -> Feed<'a> {
        if is_comment_line(line) {
            return Feed::Comment;
        }

        let logical = match std::mem::take(&mut self.state) {
            ScanState::AwaitingContinuation(previous) => Cow::Owned(join_split(&previous, line)),
            ScanState::Normal => Cow::Borrowed(line),
        };

        if contains_prefix(&logical) && ends_with_split_identifier(&logical) {
            self.state = ScanState::AwaitingContinuation(logical.into_owned());
            return Feed::Pending;
        }

        Feed::Line(logical)
    }

    /// Feed a line and extract its identifiers in one step.
    pub fn scan_line(&mut self, line: &str) -> Vec<String> {
        match self.feed(line) {
            Feed::Line(logical) => extract_identifiers(&logical),
            Feed::Comment | Feed::Pending => Vec::new(),
        }
    }

    /// End of input. Returns a split line that never got its continuation.
    pub fn finish(self) -> Option<String> {
        match self.state {
            ScanState::AwaitingContinuation(line) => Some(line),
            ScanState::Normal => None,
        }
    }
}

/// Heuristic: only a comment opener at the start of the line counts.
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with("/*")
}

fn join_split(previous: &str, line: &str) -> String {
    let head = previous.trim_end();
    let head = head.strip_suffix('"').unwrap_or(head);
    let tail = line.trim_start().trim_start_matches('"');
    format!("{head}{tail}")
}

fn ends_with_split_identifier(line: &str) -> bool {
    line.split_whitespace().next_back().is_some_and(|last| {
        let token = clean_token(last);
        starts_with_prefix(token) && token.ends_with(WORD_JOINER)
    })
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | '[' | ']' | '(' | ')' | '"')
}

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | ',' | ';' | ':' | '(' | ')' | '{' | '}' | '[' | ']'
    )
}

fn clean_token(token: &str) -> &str {
    token.trim_matches(is_punctuation)
}

/// Byte offset of the first prefix that starts at a word boundary.
fn prefix_start(token: &str) -> Option<usize> {
    IdPrefix::ALL
        .iter()
        .flat_map(|prefix| token.match_indices(prefix.as_str()).map(|(i, _)| i))
        .filter(|&i| {
            token[..i]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_')
        })
        .min()
}

/// Extract every identifier on a logical line, in order of appearance.
/// Every returned identifier begins with a recognized prefix.
pub fn extract_identifiers(line: &str) -> Vec<String> {
    if !contains_prefix(line) {
        return Vec::new();
    }
    line.split(is_separator)
        .filter(|piece| contains_prefix(piece))
        .filter_map(|piece| {
            let start = prefix_start(piece)?;
            let id = clean_token(&piece[start..]);
            starts_with_prefix(id).then(|| id.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(lines: &[&str]) -> Vec<Vec<String>> {
        let mut scanner = MarkerScanner::new();
        lines.iter().map(|line| scanner.scan_line(line)).collect()
    }

    #[test]
    fn extracts_quoted_identifier() {
        let ids = extract_identifiers(
            r#"    skip |= LogError(device, "VUID-vkCmdDraw-None-02700", "msg %s", name);"#,
        );
        assert_eq!(ids, vec!["VUID-vkCmdDraw-None-02700"]);
    }

    #[test]
    fn extracts_multiple_identifiers_per_line() {
        let ids = extract_identifiers(
            r#"{"VUID-vkA-x-00001", "UNASSIGNED-CoreValidation-Foo"}, kVUID("VUID-vkB-y")"#,
        );
        assert_eq!(
            ids,
            vec!["VUID-vkA-x-00001", "UNASSIGNED-CoreValidation-Foo", "VUID-vkB-y"]
        );
    }

    #[test]
    fn strips_trailing_colon_inside_message() {
        let ids = extract_identifiers(r#"Log("VUID-vkFoo-bar-01234: must be zero");"#);
        assert_eq!(ids, vec!["VUID-vkFoo-bar-01234"]);
    }

    #[test]
    fn ignores_prefix_glued_to_a_word() {
        assert!(extract_identifiers("static const char *kVUID-foo = 0;").is_empty());
        assert_eq!(extract_identifiers("%s-VUID-vkFoo-x"), vec!["VUID-vkFoo-x"]);
    }

    #[test]
    fn skips_comment_lines() {
        let out = scan_all(&[
            r#"   // "VUID-vkFoo-bar-00001""#,
            r#"/* "VUID-vkFoo-bar-00002" */"#,
            r#"x = 1; // "VUID-vkFoo-bar-00003""#,
        ]);
        assert!(out[0].is_empty());
        assert!(out[1].is_empty());
        assert_eq!(out[2], vec!["VUID-vkFoo-bar-00003"]);
    }

    #[test]
    fn repairs_split_identifier() {
        let mut scanner = MarkerScanner::new();
        assert_eq!(
            scanner.feed(r#"    skip |= LogError(device, "VUID-vkCmdDraw-""#),
            Feed::Pending
        );
        assert!(matches!(scanner.state(), ScanState::AwaitingContinuation(_)));
        let ids = scanner.scan_line(r#"                     "None-02700", "msg");"#);
        assert_eq!(ids, vec!["VUID-vkCmdDraw-None-02700"]);
        assert_eq!(scanner.state(), &ScanState::Normal);
    }

    #[test]
    fn split_round_trip_at_every_joiner() {
        let id = "VUID-VkImageCreateInfo-imageType-00954";
        for (i, _) in id.match_indices(WORD_JOINER) {
            let (head, tail) = id.split_at(i + 1);
            let out = scan_all(&[
                format!("    Check(x, \"{head}\"").as_str(),
                format!("          \"{tail}\");").as_str(),
            ]);
            assert!(out[0].is_empty());
            assert_eq!(out[1], vec![id.to_string()], "split after {head}");
        }
    }

    #[test]
    fn comment_line_does_not_consume_pending_split() {
        let out = scan_all(&[
            r#"Check("VUID-vkFoo-""#,
            "    // formatter comment",
            r#"    "bar-00001");"#,
        ]);
        assert_eq!(out[2], vec!["VUID-vkFoo-bar-00001"]);
    }

    #[test]
    fn finish_reports_dangling_split() {
        let mut scanner = MarkerScanner::new();
        assert!(scanner.scan_line(r#"Check("VUID-vkFoo-""#).is_empty());
        assert_eq!(scanner.finish().as_deref(), Some(r#"Check("VUID-vkFoo-""#));
    }

    #[test]
    fn lines_without_prefix_pass_through() {
        let mut scanner = MarkerScanner::new();
        assert_eq!(
            scanner.feed("int x = y - z -"),
            Feed::Line(Cow::Borrowed("int x = y - z -"))
        );
    }
}
