//! Token-pattern matching.
//!
//! Container descriptors and the resolver express shapes as short
//! space-separated patterns over the simplified token stream:
//!
//! - a literal element matches a token with identical text
//! - `a|b` matches either literal; an empty alternative (`)|`) makes the
//!   whole element optional
//! - `!!x` matches any token except `x`, and also matches the end of the
//!   stream
//! - `%name%`, `%num%`, `%op%`, `%any%` match lexical categories
//!
//! A pattern matches as a prefix: trailing tokens after the last element do
//! not matter.

use super::token::{Tok, TokenKind};

/// Match `pattern` against the stream starting at `tok`.
///
/// `tok` being `None` matches only patterns whose remaining elements are
/// all negations or optionals.
pub fn match_tokens(tok: Option<Tok<'_>>, pattern: &str) -> bool {
    let mut cur = tok;
    for element in pattern.split_whitespace() {
        if let Some(negated) = element.strip_prefix("!!") {
            match cur {
                Some(t) => {
                    if t.text() == negated {
                        return false;
                    }
                    cur = t.next();
                }
                // Nothing left to contradict the negation.
                None => {}
            }
            continue;
        }

        let optional = element.split('|').any(str::is_empty);
        let matched = cur
            .map(|t| element.split('|').filter(|a| !a.is_empty()).any(|a| alt_matches(t, a)))
            .unwrap_or(false);

        if matched {
            cur = cur.and_then(|t| t.next());
        } else if !optional {
            return false;
        }
    }
    true
}

fn alt_matches(tok: Tok<'_>, alt: &str) -> bool {
    match alt {
        "%name%" => tok.is_name(),
        "%num%" => tok.is_number(),
        "%op%" => tok.kind() == TokenKind::Op,
        "%any%" => true,
        literal => tok.text() == literal,
    }
}
