//! Program listing loader.
//!
//! A listing is a sequence of hexadecimal words, each optionally followed by
//! a comma. Loading is permissive: it stops silently at the first token it
//! cannot read and keeps whatever was loaded up to that point.

use nom::{
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0, one_of},
    combinator::{map, opt},
    sequence::{delimited, pair, preceded},
    IResult,
};
use tracing::{debug, warn};

use crate::constants::Word;
use crate::runtime::Memory;

/// Fold hexadecimal digits into a word, keeping the low 16 bits
fn from_hexadecimal(digits: &str) -> Word {
    digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0, |acc: Word, digit| {
            #[allow(clippy::cast_possible_truncation)]
            let digit = digit as Word;
            (acc << 4) | digit
        })
}

/// Extract a hexadecimal number, with an optional `0x` prefix
fn take_hexadecimal(input: &str) -> IResult<&str, &str> {
    preceded(opt(tag_no_case("0x")), take_while1(|c: char| c.is_ascii_hexdigit()))(input)
}

/// Parse one word of a listing and its optional trailing comma.
///
/// A leading `-` negates the word in two's complement.
pub fn parse_word(input: &str) -> IResult<&str, Word> {
    let signed = map(pair(opt(one_of("+-")), take_hexadecimal), |(sign, digits)| {
        let value = from_hexadecimal(digits);
        if sign == Some('-') {
            value.wrapping_neg()
        } else {
            value
        }
    });

    delimited(multispace0, signed, opt(char(',')))(input)
}

/// Fill memory from a listing, starting at address 0.
///
/// Returns the number of words loaded. Cells past the listing are left
/// untouched.
pub fn load(memory: &mut Memory, listing: &str) -> usize {
    let mut input = listing;
    let mut count = 0;

    for cell in memory.iter_mut() {
        match parse_word(input) {
            Ok((rest, word)) => {
                *cell = word;
                count += 1;
                input = rest;
            }
            Err(_) => break,
        }
    }

    let rest = input.trim_start();
    if rest.is_empty() {
        debug!(count, "Loaded program");
    } else if count == memory.len() {
        warn!(count, "Listing does not fit in memory, ignoring the rest");
    } else {
        let token: String = rest.chars().take(16).collect();
        warn!(count, %token, "Stopped loading at malformed token");
    }

    count
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::constants::MEMORY_SIZE;

    fn head(memory: &Memory, n: usize) -> Vec<Word> {
        memory.iter().take(n).copied().collect()
    }

    #[test]
    fn from_hexadecimal_test() {
        assert_eq!(from_hexadecimal("4F"), 0x4f);
        assert_eq!(from_hexadecimal("4f"), 0x4f); // Lower case works
        assert_eq!(from_hexadecimal("ffff"), 0xffff);
        assert_eq!(from_hexadecimal("12345"), 0x2345); // Only the low bits are kept
    }

    #[test]
    fn parse_word_test() {
        assert_eq!(parse_word("1,2"), Ok(("2", 1)));
        assert_eq!(parse_word("  6042, 1"), Ok((" 1", 0x6042)));
        assert_eq!(parse_word("0x4005,"), Ok(("", 0x4005)));
        assert_eq!(parse_word("0X4005"), Ok(("", 0x4005)));
        assert_eq!(parse_word("ab\n"), Ok(("\n", 0xab)));
        assert_eq!(parse_word("-1,"), Ok(("", 0xFFFF)));
        assert_eq!(parse_word("+2a"), Ok(("", 0x2A)));
        assert_eq!(parse_word("-0x10"), Ok(("", 0xFFF0)));
        assert!(parse_word("-").is_err());
        assert!(parse_word("x").is_err());
        assert!(parse_word(",1").is_err());
        assert!(parse_word("").is_err());
    }

    #[test]
    fn load_test() {
        let mut memory = Memory::default();
        assert_eq!(load(&mut memory, "1,2,3"), 3);
        assert_eq!(head(&memory, 5), [1, 2, 3, 0, 0]);
    }

    #[test]
    fn load_stops_at_malformed_token_test() {
        let mut memory = Memory::default();
        assert_eq!(load(&mut memory, "1,x,3"), 1);
        assert_eq!(head(&memory, 4), [1, 0, 0, 0]);
    }

    #[test]
    fn load_listing_test() {
        let listing = indoc! {"
            4005, 1003,
            605C,
            0
        "};

        let mut memory = Memory::default();
        assert_eq!(load(&mut memory, listing), 4);
        assert_eq!(head(&memory, 5), [0x4005, 0x1003, 0x605C, 0, 0]);
    }

    #[test]
    fn load_signed_words_test() {
        let mut memory = Memory::default();
        assert_eq!(load(&mut memory, "-1, +5, 3"), 3);
        assert_eq!(head(&memory, 4), [0xFFFF, 5, 3, 0]);
    }

    #[test]
    fn load_keeps_untouched_cells_test() {
        let mut memory = Memory::from_words(&[9, 9, 9]);
        assert_eq!(load(&mut memory, "1 2"), 2);
        assert_eq!(head(&memory, 3), [1, 2, 9]);
    }

    #[test]
    fn load_stops_when_memory_is_full_test() {
        let listing = "1,".repeat(MEMORY_SIZE + 10);
        let mut memory = Memory::default();
        assert_eq!(load(&mut memory, &listing), MEMORY_SIZE);
        assert!(memory.iter().all(|&w| w == 1));
    }
}
