//! Randomisation of query-name capitalisation, usually called "0x20
//! encoding": a resolver flips each letter of an outbound query name
//! to a random case and checks the answer echoes the spelling back,
//! adding entropy an off-path spoofer has to guess.  Names compare
//! case-insensitively, so a randomised name still names the same
//! records.

use rand::Rng;

use crate::protocol::types::{DomainName, Label};

/// A source of uniform draws in `[0, 1)`.
///
/// Every [`Rng`] is a `RandomSource`, so production callers pass
/// whatever generator matches their security posture and tests can
/// script an exact sequence of draws.
pub trait RandomSource {
    fn draw(&mut self) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn draw(&mut self) -> f64 {
        self.random()
    }
}

/// Randomise the capitalisation of a name: one draw per ASCII letter,
/// lowercase below 0.5 and uppercase otherwise.  Everything else
/// passes through unchanged, so the output has the same length and
/// the same case-insensitive identity as the input.
pub fn randomize<S: RandomSource>(name: &str, source: &mut S) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                if source.draw() < 0.5 {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            } else {
                c
            }
        })
        .collect()
}

/// [`randomize`] over a parsed name, producing a new `DomainName`
/// with the same labels in randomised case.
pub fn randomize_domain<S: RandomSource>(name: &DomainName, source: &mut S) -> DomainName {
    let labels = name
        .labels
        .iter()
        .map(|label| {
            let octets = label
                .octets()
                .iter()
                .map(|octet| {
                    if octet.is_ascii_alphabetic() {
                        if source.draw() < 0.5 {
                            octet.to_ascii_lowercase()
                        } else {
                            octet.to_ascii_uppercase()
                        }
                    } else {
                        *octet
                    }
                })
                .collect::<Vec<u8>>();
            // safe as case flips never change a label's length
            Label::try_from(&octets[..]).unwrap()
        })
        .collect();

    DomainName {
        labels,
        len: name.len,
    }
}
