//! The nibble stream codec. One frame's packed bytes become a stream of
//! 4-bit tokens: dictionary indices 0x0..=0xB, with 0xC..=0xF reserved as
//! escapes for raw bytes and runs. Greedy, single pass, no backtracking.

use std::collections::HashMap;

use byte_writer::NibbleWriter;

use crate::Dictionary;

pub const TOKEN_RAW_RUN: u8 = 0xc;
pub const TOKEN_DICT_RUN: u8 = 0xd;
pub const TOKEN_RUN: u8 = 0xe;
pub const TOKEN_RAW_BYTE: u8 = 0xf;

/// Run lengths and raw-run counts are 8 bit fields on the wire; anything
/// longer is split into consecutive segments.
pub const MAX_RUN_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// One nibble, the dictionary index itself.
    DictRef(u8),
    /// `[0xF, hi(value), lo(value)]`
    RawByte(u8),
    /// `[0xE, hi(len), lo(len), hi(value), lo(value)]`, value not in the
    /// dictionary, len >= 3.
    RunRepeat { length: u8, value: u8 },
    /// `[0xD, hi(len), lo(len), index]`, value in the dictionary, len >= 4.
    ShortRunRepeat { length: u8, index: u8 },
    /// `[0xC, hi(count), lo(count)]` then two nibbles per value; a span of
    /// more than 2 bytes that neither repeat nor hit the dictionary.
    RawRun(Vec<u8>),
}

/// Maximal runs of >= 2 identical bytes, keyed by start index, pre-split at
/// [`MAX_RUN_LEN`] so token length fields cannot overflow. A leftover
/// segment of 1 is not a run and is left for the single-byte rules.
fn find_runs(data: &[u8]) -> HashMap<usize, (u8, usize)> {
    let mut runs = HashMap::new();
    let mut i = 0;

    while i < data.len() {
        let value = data[i];
        let mut end = i + 1;

        while end < data.len() && data[end] == value {
            end += 1;
        }

        let mut start = i;
        let mut remaining = end - i;

        while remaining >= 2 {
            let segment = remaining.min(MAX_RUN_LEN);

            runs.insert(start, (value, segment));

            start += segment;
            remaining -= segment;
        }

        i = end;
    }

    runs
}

/// Whether a run would be taken by the run rules: repeats of a
/// non-dictionary value pay off from length 3, dictionary values only from
/// length 4 (a dictionary index is a single nibble already).
fn run_qualifies(dict: &Dictionary, value: u8, length: usize) -> bool {
    match dict.index_of(value) {
        None => length >= 3,
        Some(_) => length >= 4,
    }
}

/// Tokenizes one frame's packed bytes. At every position the first matching
/// rule wins, in this order: non-dictionary run, dictionary run, raw run,
/// single byte. The order is part of the wire contract with the decoder.
pub fn tokenize(data: &[u8], dict: &Dictionary) -> Vec<Token> {
    let runs = find_runs(data);
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < data.len() {
        if let Some(&(value, length)) = runs.get(&i) {
            if run_qualifies(dict, value, length) {
                match dict.index_of(value) {
                    None => tokens.push(Token::RunRepeat {
                        length: length as u8,
                        value,
                    }),
                    Some(index) => tokens.push(Token::ShortRunRepeat {
                        length: length as u8,
                        index,
                    }),
                }

                i += length;
                continue;
            }
        }

        // raw-run scan: bytes that neither start a qualifying run nor hit
        // the dictionary
        let mut end = i;

        while end < data.len() && end - i < MAX_RUN_LEN {
            let b = data[end];

            if dict.index_of(b).is_some() {
                break;
            }

            if let Some(&(value, length)) = runs.get(&end) {
                if run_qualifies(dict, value, length) {
                    break;
                }
            }

            end += 1;
        }

        if end - i > 2 {
            tokens.push(Token::RawRun(data[i..end].to_vec()));
            i = end;
            continue;
        }

        let b = data[i];

        match dict.index_of(b) {
            Some(index) => tokens.push(Token::DictRef(index)),
            None => tokens.push(Token::RawByte(b)),
        }

        i += 1;
    }

    tokens
}

pub fn write_tokens(tokens: &[Token]) -> Vec<u8> {
    let mut writer = NibbleWriter::new();

    for token in tokens {
        match token {
            Token::DictRef(index) => writer.append_nibble(*index),
            Token::RawByte(value) => {
                writer.append_nibble(TOKEN_RAW_BYTE);
                writer.append_byte_as_nibbles(*value);
            }
            Token::RunRepeat { length, value } => {
                writer.append_nibble(TOKEN_RUN);
                writer.append_byte_as_nibbles(*length);
                writer.append_byte_as_nibbles(*value);
            }
            Token::ShortRunRepeat { length, index } => {
                writer.append_nibble(TOKEN_DICT_RUN);
                writer.append_byte_as_nibbles(*length);
                writer.append_nibble(*index);
            }
            Token::RawRun(values) => {
                writer.append_nibble(TOKEN_RAW_RUN);
                writer.append_byte_as_nibbles(values.len() as u8);

                for value in values {
                    writer.append_byte_as_nibbles(*value);
                }
            }
        }
    }

    writer.finish()
}

/// One frame's packed bytes to its packed nibble stream.
pub fn encode(data: &[u8], dict: &Dictionary) -> Vec<u8> {
    write_tokens(&tokenize(data, dict))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::decode_stream;

    fn dict(values: &[u8]) -> Dictionary {
        Dictionary::from_values(values.to_vec())
    }

    #[test]
    fn run_of_non_dictionary_value() {
        // [0x01; 5] with 0x01 not in the dictionary
        let stream = encode(&[0x01; 5], &dict(&[0xff]));

        assert_eq!(stream, vec![0xe0, 0x50, 0x10]);
    }

    #[test]
    fn single_run_token_spans_whole_run() {
        let tokens = tokenize(&[0x42; 9], &dict(&[0x00]));

        assert_eq!(
            tokens,
            vec![Token::RunRepeat {
                length: 9,
                value: 0x42
            }]
        );
    }

    #[test]
    fn dictionary_indices_pair_into_bytes() {
        let d = dict(&[10, 11, 12, 13, 14, 15, 16, 17]);

        // values at indices 3 and 7
        let stream = encode(&[13, 17], &d);

        assert_eq!(stream, vec![0x37]);
    }

    #[test]
    fn dictionary_run_uses_short_form() {
        let d = dict(&[0x55]);
        let tokens = tokenize(&[0x55; 6], &d);

        assert_eq!(
            tokens,
            vec![Token::ShortRunRepeat {
                length: 6,
                index: 0
            }]
        );
        assert_eq!(write_tokens(&tokens), vec![0xd0, 0x60]);
    }

    #[test]
    fn short_dictionary_run_stays_single_nibbles() {
        // 3 repeats of a dictionary value: 3 index nibbles beat the 4
        // nibble short-run form
        let d = dict(&[0x55]);
        let tokens = tokenize(&[0x55; 3], &d);

        assert_eq!(
            tokens,
            vec![Token::DictRef(0), Token::DictRef(0), Token::DictRef(0)]
        );
    }

    #[test]
    fn raw_run_collects_mixed_strangers() {
        let d = dict(&[0x00]);
        let tokens = tokenize(&[1, 2, 3, 4], &d);

        assert_eq!(tokens, vec![Token::RawRun(vec![1, 2, 3, 4])]);
        assert_eq!(
            write_tokens(&tokens),
            vec![0xc0, 0x40, 0x10, 0x20, 0x30, 0x40]
        );
    }

    #[test]
    fn raw_run_stops_at_dictionary_hit() {
        let d = dict(&[0x09]);
        let tokens = tokenize(&[1, 2, 3, 9, 1], &d);

        assert_eq!(
            tokens,
            vec![
                Token::RawRun(vec![1, 2, 3]),
                Token::DictRef(0),
                Token::RawByte(1),
            ]
        );
    }

    #[test]
    fn raw_run_stops_before_qualifying_run() {
        let d = dict(&[]);
        let tokens = tokenize(&[1, 2, 3, 7, 7, 7], &d);

        assert_eq!(
            tokens,
            vec![
                Token::RawRun(vec![1, 2, 3]),
                Token::RunRepeat {
                    length: 3,
                    value: 7
                },
            ]
        );
    }

    #[test]
    fn two_strangers_stay_raw_bytes() {
        let d = dict(&[0x00]);
        let tokens = tokenize(&[1, 2], &d);

        assert_eq!(tokens, vec![Token::RawByte(1), Token::RawByte(2)]);
    }

    #[test]
    fn pair_run_of_non_dictionary_value_goes_raw() {
        // a run of 2 qualifies for nothing; it lands in the raw-run scan
        let d = dict(&[0x00]);
        let tokens = tokenize(&[5, 5, 1], &d);

        assert_eq!(tokens, vec![Token::RawRun(vec![5, 5, 1])]);
    }

    #[test]
    fn overlong_run_splits_at_255() {
        let d = dict(&[0x00]);
        let data = vec![0x33u8; 300];
        let tokens = tokenize(&data, &d);

        assert_eq!(
            tokens,
            vec![
                Token::RunRepeat {
                    length: 255,
                    value: 0x33
                },
                Token::RunRepeat {
                    length: 45,
                    value: 0x33
                },
            ]
        );

        let stream = write_tokens(&tokens);
        let decoded = decode_stream(&stream, data.len(), &d).unwrap();

        assert_eq!(decoded, data);
    }

    #[test]
    fn overlong_raw_span_splits_at_255() {
        let d = dict(&[]);
        // 300 distinct-ish non-repeating bytes, avoiding accidental runs
        let data: Vec<u8> = (0..300u32).map(|i| (i % 251) as u8).collect();
        let tokens = tokenize(&data, &d);

        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::RawRun(v) if v.len() == 255));
        assert!(matches!(&tokens[1], Token::RawRun(v) if v.len() == 45));

        let stream = write_tokens(&tokens);
        let decoded = decode_stream(&stream, data.len(), &d).unwrap();

        assert_eq!(decoded, data);
    }

    #[test]
    fn mixed_stream_round_trips() {
        let d = dict(&[0x00, 0xff, 0x18]);
        let data = vec![
            0x00, 0x00, 0x00, 0x00, 0x00, // dict run
            0xff, // dict hit
            0x07, 0x07, 0x07, 0x07, // stranger run
            0x18, // dict hit
            0x42, 0x01, 0x02, 0x03, 0x04, 0x05, // raw run
            0x18,
        ];

        let stream = encode(&data, &d);
        let decoded = decode_stream(&stream, data.len(), &d).unwrap();

        assert_eq!(decoded, data);
        assert!(stream.len() < data.len() + 2);
    }

    #[test]
    fn empty_frame_encodes_to_nothing() {
        assert!(encode(&[], &dict(&[0x00])).is_empty());
    }
}
