//! Selector text to [`ParsedSelector`].

use std::iter::Peekable;
use std::str::Chars;

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, ParsedSelector, PseudoClass,
    SimpleSelector,
};

type Input<'a> = Peekable<Chars<'a>>;

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
#[must_use]
pub const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
#[must_use]
pub const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Whether `s` can be written as a bare identifier without escaping.
///
/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
///
/// A leading `-` must be followed by an ident-start code point or a second
/// `-`. Digits may not lead.
#[must_use]
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts = match chars.next() {
        Some('-') => chars
            .clone()
            .next()
            .is_some_and(|c| c == '-' || is_ident_start_char(c)),
        Some(c) => is_ident_start_char(c),
        None => false,
    };
    starts && chars.all(is_ident_char)
}

fn skip_whitespace(chars: &mut Input<'_>) {
    while chars.next_if(char::is_ascii_whitespace).is_some() {}
}

fn take_ident(chars: &mut Input<'_>) -> String {
    let mut ident = String::new();
    while let Some(ch) = chars.next_if(|&ch| is_ident_char(ch)) {
        ident.push(ch);
    }
    ident
}

/// Parse an attribute value inside `[attr=value]`.
/// Handles both quoted (`"val"`, `'val'`) and unquoted ident values.
fn parse_attr_value(chars: &mut Input<'_>) -> Option<String> {
    skip_whitespace(chars);

    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next();
            let mut val = String::new();
            for ch in chars.by_ref() {
                if ch == q {
                    return Some(val);
                }
                val.push(ch);
            }
            // Unterminated string
            None
        }
        Some(_) => {
            let mut val = String::new();
            while let Some(ch) = chars.next_if(|&ch| is_ident_char(ch) || ch == '.') {
                val.push(ch);
            }
            if val.is_empty() { None } else { Some(val) }
        }
        None => None,
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Parse the remainder of `[...]` after the opening bracket.
fn parse_attribute(chars: &mut Input<'_>) -> Option<AttributeSelector> {
    skip_whitespace(chars);
    let name = take_ident(chars);
    if name.is_empty() {
        return None;
    }
    skip_whitespace(chars);

    let op = match chars.next()? {
        ']' => return Some(AttributeSelector::Exists(name)),
        '=' => '=',
        op @ ('~' | '|' | '^' | '$' | '*') => {
            if chars.next() != Some('=') {
                return None;
            }
            op
        }
        _ => return None,
    };

    let val = parse_attr_value(chars)?;
    skip_whitespace(chars);
    if chars.next() != Some(']') {
        return None;
    }

    Some(match op {
        '~' => AttributeSelector::Includes(name, val),
        '|' => AttributeSelector::DashMatch(name, val),
        '^' => AttributeSelector::PrefixMatch(name, val),
        '$' => AttributeSelector::SuffixMatch(name, val),
        '*' => AttributeSelector::SubstringMatch(name, val),
        _ => AttributeSelector::Equals(name, val),
    })
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Parse the remainder of a pseudo-class after its `:`. Pseudo-elements,
/// unknown names and `An+B` arguments are rejected.
fn parse_pseudo_class(chars: &mut Input<'_>) -> Option<PseudoClass> {
    if chars.peek() == Some(&':') {
        return None;
    }
    let name = take_ident(chars).to_ascii_lowercase();

    let argument = if chars.next_if_eq(&'(').is_some() {
        let mut arg = String::new();
        loop {
            match chars.next()? {
                ')' => break,
                ch => arg.push(ch),
            }
        }
        Some(arg)
    } else {
        None
    };

    // [§ 4.13 Child-indexed pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
    // Indices are 1-based, so `:nth-child(0)` never matches and is refused.
    let index = |arg: Option<String>| -> Option<usize> {
        arg?.trim().parse::<usize>().ok().filter(|&i| i > 0)
    };

    match (name.as_str(), argument) {
        ("scope", None) => Some(PseudoClass::Scope),
        ("root", None) => Some(PseudoClass::Root),
        ("first-child", None) => Some(PseudoClass::FirstChild),
        ("last-child", None) => Some(PseudoClass::LastChild),
        ("only-child", None) => Some(PseudoClass::OnlyChild),
        ("first-of-type", None) => Some(PseudoClass::FirstOfType),
        ("last-of-type", None) => Some(PseudoClass::LastOfType),
        ("empty", None) => Some(PseudoClass::Empty),
        ("nth-child", arg @ Some(_)) => index(arg).map(PseudoClass::NthChild),
        ("nth-of-type", arg @ Some(_)) => index(arg).map(PseudoClass::NthOfType),
        _ => None,
    }
}

/// Flush current compound selector into the compounds list.
/// Returns true if a non-empty compound was flushed.
fn flush_compound(compound: &mut Vec<SimpleSelector>, compounds: &mut Vec<CompoundSelector>) -> bool {
    if compound.is_empty() {
        return false;
    }
    compounds.push(CompoundSelector {
        simple_selectors: std::mem::take(compound),
    });
    true
}

/// Parse a raw selector string into a `ParsedSelector`.
///
/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
///
/// Supports type, class, ID, universal and attribute selectors, the
/// pseudo-classes listed on [`PseudoClass`], and all four combinators.
/// Selector lists (`a, b`) are not supported.
///
/// Returns `None` for anything outside that subset, so a selector that parses
/// is one this crate can match exactly.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    //
    // Parse left-to-right, collecting compound selectors and the combinators
    // between them, then reverse so matching starts from the subject.
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();
    let mut current = Vec::new();
    let mut chars = trimmed.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            '.' => {
                let _ = chars.next();
                let class = take_ident(&mut chars);
                if class.is_empty() {
                    return None;
                }
                current.push(SimpleSelector::Class(class));
            }

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            '#' => {
                let _ = chars.next();
                let id = take_ident(&mut chars);
                if id.is_empty() {
                    return None;
                }
                current.push(SimpleSelector::Id(id));
            }

            // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
            '*' => {
                let _ = chars.next();
                current.push(SimpleSelector::Universal);
            }

            ':' => {
                let _ = chars.next();
                current.push(SimpleSelector::PseudoClass(parse_pseudo_class(&mut chars)?));
            }

            '[' => {
                let _ = chars.next();
                current.push(SimpleSelector::Attribute(parse_attribute(&mut chars)?));
            }

            // [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
            //
            // Whitespace is the descendant combinator unless an explicit
            // combinator follows it.
            _ if c.is_ascii_whitespace() || matches!(c, '>' | '+' | '~') => {
                skip_whitespace(&mut chars);
                let combinator = match chars.next_if(|&ch| matches!(ch, '>' | '+' | '~')) {
                    Some('>') => Combinator::Child,
                    Some('+') => Combinator::NextSibling,
                    Some('~') => Combinator::SubsequentSibling,
                    _ => Combinator::Descendant,
                };
                skip_whitespace(&mut chars);
                // A combinator needs a compound on each side
                if !flush_compound(&mut current, &mut compounds) || chars.peek().is_none() {
                    return None;
                }
                combinators_between.push(combinator);
            }

            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            //
            // A type selector must lead its compound.
            _ if (is_ident_start_char(c) || c == '-') && current.is_empty() => {
                current.push(SimpleSelector::Type(take_ident(&mut chars)));
            }

            _ => return None,
        }
    }

    let _ = flush_compound(&mut current, &mut compounds);

    // "A B C" has 3 compounds and 2 combinators
    if compounds.len() != combinators_between.len() + 1 {
        return None;
    }

    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    // "The elements represented by a complex selector are the elements matched
    // by the last compound selector in the complex selector."
    let subject = compounds.pop()?;
    let combinators = compounds
        .into_iter()
        .zip(combinators_between)
        .rev()
        .map(|(compound, combinator)| (combinator, compound))
        .collect();

    Some(ParsedSelector {
        complex: ComplexSelector {
            subject,
            combinators,
        },
    })
}
