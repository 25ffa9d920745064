// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! BOLT11 amount decoding.
//!
//! The human-readable part of an invoice is `ln` + network + optional amount,
//! e.g. `lnbc2500u`. The amount is a decimal magnitude with an optional unit
//! multiplier:
//!
//! | Suffix | Unit | msat per unit |
//! |--------|------|---------------|
//! | none | BTC | 100,000,000,000 |
//! | `m` | milli-BTC | 100,000,000 |
//! | `u` | micro-BTC | 100,000 |
//! | `n` | nano-BTC | 100 |
//! | `p` | pico-BTC | 1/10 |
//!
//! All arithmetic is done on integer millisatoshis. The only lossy step is
//! [`DecodedAmount::to_btc`], which rounds to whole satoshis.

use crate::config::{LIGHTNING_PREFIX, MAINNET_NETWORK, MIN_PICO_BTC_MAGNITUDE};
use crate::error::WalletError;

use super::bech32::{self, DecodeError};

const MSAT_PER_BTC: u64 = 100_000_000_000;
const MSAT_PER_MILLI_BTC: u64 = 100_000_000;
const MSAT_PER_MICRO_BTC: u64 = 100_000;
const MSAT_PER_NANO_BTC: u64 = 100;
const MSAT_PER_SAT: u64 = 1_000;
const SAT_PER_BTC: f64 = 100_000_000.0;

/// Why an invoice was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInvoice {
    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("human-readable part is too short")]
    TooShort,

    #[error("missing lightning prefix")]
    MissingPrefix,

    #[error("invoice is not for bitcoin mainnet (network `{0}`)")]
    WrongNetwork(String),

    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),
}

/// Why an amount suffix could not be turned into millisatoshis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount must be non-empty")]
    Empty,

    #[error("number must be non-empty")]
    EmptyMagnitude,

    #[error("amount `{0}` is not a decimal number")]
    NotNumeric(String),

    #[error("minimum amount is 10p, got {0}p")]
    BelowPicoMinimum(u64),

    #[error("amount {0} pBTC not expressible in msat")]
    PicoNotExpressible(u64),

    #[error("unknown multiplier {0}")]
    UnknownMultiplier(char),

    #[error("amount overflows a millisatoshi counter")]
    Overflow,
}

/// An exact, non-negative amount in millisatoshis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecodedAmount(u64);

impl DecodedAmount {
    pub const fn from_msat(msat: u64) -> Self {
        Self(msat)
    }

    pub const fn msat(self) -> u64 {
        self.0
    }

    /// Whole satoshis, rounding half away from zero.
    pub const fn sat_rounded(self) -> u64 {
        self.0 / MSAT_PER_SAT + (self.0 % MSAT_PER_SAT >= MSAT_PER_SAT / 2) as u64
    }

    /// Bitcoin amount rounded to the nearest satoshi.
    ///
    /// Sub-satoshi precision is lost here. Use [`DecodedAmount::msat`] when
    /// it matters.
    pub fn to_btc(self) -> f64 {
        self.sat_rounded() as f64 / SAT_PER_BTC
    }
}

/// The human-readable prefix of an invoice, split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceHumanPart<'a> {
    /// Network identifier between `ln` and the amount, e.g. `bc`
    pub network: &'a str,
    /// Amount suffix starting at the first digit, if any
    pub amount: Option<&'a str>,
}

impl<'a> InvoiceHumanPart<'a> {
    /// Split a human-readable part. Does not validate the network.
    pub fn parse(hrp: &'a str) -> Result<Self, InvalidInvoice> {
        if hrp.len() < 3 {
            return Err(InvalidInvoice::TooShort);
        }
        let rest = hrp
            .strip_prefix(LIGHTNING_PREFIX)
            .ok_or(InvalidInvoice::MissingPrefix)?;

        Ok(match rest.find(|c: char| c.is_ascii_digit()) {
            Some(idx) => Self {
                network: &rest[..idx],
                amount: Some(&rest[idx..]),
            },
            None => Self {
                network: rest,
                amount: None,
            },
        })
    }

    pub fn is_mainnet(&self) -> bool {
        self.network.eq_ignore_ascii_case(MAINNET_NETWORK)
    }
}

/// Decode an amount suffix such as `2500u` into millisatoshis.
pub fn decode_amount(amount: &str) -> Result<u64, AmountError> {
    let last = amount.chars().last().ok_or(AmountError::Empty)?;

    if last.is_ascii_digit() {
        let btc = parse_magnitude(amount)?;
        return btc.checked_mul(MSAT_PER_BTC).ok_or(AmountError::Overflow);
    }

    let magnitude = &amount[..amount.len() - last.len_utf8()];
    if magnitude.is_empty() {
        return Err(AmountError::EmptyMagnitude);
    }
    let magnitude = parse_magnitude(magnitude)?;

    let scale = match last {
        'p' => {
            if magnitude < MIN_PICO_BTC_MAGNITUDE {
                return Err(AmountError::BelowPicoMinimum(magnitude));
            }
            if magnitude % 10 != 0 {
                return Err(AmountError::PicoNotExpressible(magnitude));
            }
            return Ok(magnitude / 10);
        }
        'n' => MSAT_PER_NANO_BTC,
        'u' => MSAT_PER_MICRO_BTC,
        'm' => MSAT_PER_MILLI_BTC,
        other => return Err(AmountError::UnknownMultiplier(other)),
    };

    magnitude.checked_mul(scale).ok_or(AmountError::Overflow)
}

/// Plain ASCII digits only; `u64::from_str` would also take a leading `+`.
fn parse_magnitude(digits: &str) -> Result<u64, AmountError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotNumeric(digits.to_string()));
    }
    digits.parse().map_err(|_| AmountError::Overflow)
}

/// Decode the amount embedded in a mainnet lightning invoice.
///
/// Fails with [`WalletError::NoAmount`] for variable-amount invoices and
/// [`WalletError::InvalidInvoice`] for everything else that is wrong.
pub fn parse_invoice_amount(invoice: &str) -> Result<DecodedAmount, WalletError> {
    let decoded = bech32::decode_no_limit(invoice).map_err(InvalidInvoice::Decode)?;
    let human = InvoiceHumanPart::parse(&decoded.hrp)?;

    // A missing amount is reported before the network is checked.
    let Some(amount) = human.amount else {
        return Err(WalletError::NoAmount);
    };

    if !human.is_mainnet() {
        return Err(InvalidInvoice::WrongNetwork(human.network.to_ascii_lowercase()).into());
    }

    let msat = decode_amount(amount).map_err(InvalidInvoice::Amount)?;
    Ok(DecodedAmount::from_msat(msat))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixtures: valid bech32 checksums over the same 20-symbol payload.
    const NO_AMOUNT: &str = "lnbc1qpzry9x8gf2tvdw0s3jnw370ln";
    const ONE_BTC: &str = "lnbc11qpzry9x8gf2tvdw0s3jnu5yrfu";
    const TEN_MICRO: &str = "lnbc10u1qpzry9x8gf2tvdw0s3jn59fhxx";
    const MICRO_2500: &str = "lnbc2500u1qpzry9x8gf2tvdw0s3jntstgx9";
    const NANO_500: &str = "lnbc500n1qpzry9x8gf2tvdw0s3jnw7e382";
    const ONE_MILLI: &str = "lnbc1m1qpzry9x8gf2tvdw0s3jn425789";
    const TEN_PICO: &str = "lnbc10p1qpzry9x8gf2tvdw0s3jnpzjayj";
    const ONE_PICO: &str = "lnbc1p1qpzry9x8gf2tvdw0s3jnyz4dj2";
    const FIFTEEN_PICO: &str = "lnbc15p1qpzry9x8gf2tvdw0s3jnpyx5hf";
    const UNKNOWN_UNIT: &str = "lnbc5x1qpzry9x8gf2tvdw0s3jnlc5wel";
    const TESTNET: &str = "lntb10u1qpzry9x8gf2tvdw0s3jn27feqq";
    const REGTEST: &str = "lnbcrt10u1qpzry9x8gf2tvdw0s3jn3xg3gf";
    const ADDRESS: &str = "bc1qpzry9x8gf2tvdw0s3jn4gzxc3";

    #[test]
    fn bare_digit_is_whole_bitcoin() {
        assert_eq!(decode_amount("1"), Ok(100_000_000_000));
        assert_eq!(decode_amount("21"), Ok(2_100_000_000_000));
    }

    #[test]
    fn multiplier_table() {
        assert_eq!(decode_amount("500n"), Ok(50_000));
        assert_eq!(decode_amount("10u"), Ok(1_000_000));
        assert_eq!(decode_amount("1m"), Ok(100_000_000));
        assert_eq!(decode_amount("10p"), Ok(1));
        assert_eq!(decode_amount("2500u"), Ok(250_000_000));
    }

    #[test]
    fn pico_amounts_must_be_whole_msat() {
        assert_eq!(decode_amount("1p"), Err(AmountError::BelowPicoMinimum(1)));
        assert_eq!(decode_amount("15p"), Err(AmountError::PicoNotExpressible(15)));
        assert_eq!(decode_amount("120p"), Ok(12));
    }

    #[test]
    fn malformed_suffixes() {
        assert_eq!(decode_amount(""), Err(AmountError::Empty));
        assert_eq!(decode_amount("u"), Err(AmountError::EmptyMagnitude));
        assert_eq!(decode_amount("5x"), Err(AmountError::UnknownMultiplier('x')));
        assert!(matches!(decode_amount("1a0u"), Err(AmountError::NotNumeric(_))));
        assert_eq!(
            decode_amount("+10u"),
            Err(AmountError::NotNumeric("+10".to_string()))
        );
        assert_eq!(decode_amount("+1"), Err(AmountError::NotNumeric("+1".to_string())));
        assert!(matches!(decode_amount("-5m"), Err(AmountError::NotNumeric(_))));
        assert_eq!(decode_amount("99999999999999999999"), Err(AmountError::Overflow));
        assert_eq!(decode_amount("999999999999999999m"), Err(AmountError::Overflow));
    }

    #[test]
    fn every_unit_maps_back_to_the_same_msat() {
        for msat in [1_000u64, 250_000, 100_000_000, 1_500_000_000] {
            assert_eq!(decode_amount(&format!("{}p", msat * 10)), Ok(msat));
            if msat % MSAT_PER_NANO_BTC == 0 {
                assert_eq!(decode_amount(&format!("{}n", msat / MSAT_PER_NANO_BTC)), Ok(msat));
            }
            if msat % MSAT_PER_MICRO_BTC == 0 {
                assert_eq!(decode_amount(&format!("{}u", msat / MSAT_PER_MICRO_BTC)), Ok(msat));
            }
            if msat % MSAT_PER_MILLI_BTC == 0 {
                assert_eq!(decode_amount(&format!("{}m", msat / MSAT_PER_MILLI_BTC)), Ok(msat));
            }
        }
    }

    #[test]
    fn human_part_splits_network_and_amount() {
        let part = InvoiceHumanPart::parse("lnbc2500u").unwrap();
        assert_eq!(part.network, "bc");
        assert_eq!(part.amount, Some("2500u"));
        assert!(part.is_mainnet());

        let part = InvoiceHumanPart::parse("lnbcrt").unwrap();
        assert_eq!(part.network, "bcrt");
        assert_eq!(part.amount, None);
        assert!(!part.is_mainnet());

        assert_eq!(InvoiceHumanPart::parse("ln"), Err(InvalidInvoice::TooShort));
        assert_eq!(InvoiceHumanPart::parse("xxbc1"), Err(InvalidInvoice::MissingPrefix));
    }

    #[test]
    fn parses_fixed_amount_invoices() {
        assert_eq!(parse_invoice_amount(ONE_BTC).unwrap().msat(), 100_000_000_000);
        assert_eq!(parse_invoice_amount(TEN_MICRO).unwrap().msat(), 1_000_000);
        assert_eq!(parse_invoice_amount(MICRO_2500).unwrap().msat(), 250_000_000);
        assert_eq!(parse_invoice_amount(NANO_500).unwrap().msat(), 50_000);
        assert_eq!(parse_invoice_amount(ONE_MILLI).unwrap().msat(), 100_000_000);
        assert_eq!(parse_invoice_amount(TEN_PICO).unwrap().msat(), 1);
    }

    #[test]
    fn uppercase_invoices_decode() {
        let upper = TEN_MICRO.to_ascii_uppercase();
        assert_eq!(parse_invoice_amount(&upper).unwrap().msat(), 1_000_000);
    }

    #[test]
    fn variable_amount_invoice_is_no_amount() {
        assert!(matches!(parse_invoice_amount(NO_AMOUNT), Err(WalletError::NoAmount)));
    }

    #[test]
    fn wrong_network_is_invalid_even_with_good_amount() {
        assert!(matches!(
            parse_invoice_amount(TESTNET),
            Err(WalletError::InvalidInvoice(InvalidInvoice::WrongNetwork(n))) if n == "tb"
        ));
        assert!(matches!(
            parse_invoice_amount(REGTEST),
            Err(WalletError::InvalidInvoice(InvalidInvoice::WrongNetwork(n))) if n == "bcrt"
        ));
    }

    #[test]
    fn bad_amounts_are_invalid_invoices() {
        for invoice in [ONE_PICO, FIFTEEN_PICO, UNKNOWN_UNIT] {
            assert!(matches!(
                parse_invoice_amount(invoice),
                Err(WalletError::InvalidInvoice(InvalidInvoice::Amount(_)))
            ));
        }
    }

    #[test]
    fn non_invoices_are_rejected() {
        assert!(matches!(
            parse_invoice_amount(ADDRESS),
            Err(WalletError::InvalidInvoice(InvalidInvoice::TooShort))
        ));
        assert!(matches!(
            parse_invoice_amount("not an invoice"),
            Err(WalletError::InvalidInvoice(InvalidInvoice::Decode(_)))
        ));
    }

    #[test]
    fn btc_conversion_rounds_to_nearest_sat() {
        assert_eq!(DecodedAmount::from_msat(100_000_000_000).to_btc(), 1.0);
        assert_eq!(DecodedAmount::from_msat(1_000_000).to_btc(), 0.00001);
        assert_eq!(DecodedAmount::from_msat(1_499).sat_rounded(), 1);
        assert_eq!(DecodedAmount::from_msat(1_500).sat_rounded(), 2);
        assert_eq!(DecodedAmount::from_msat(499).sat_rounded(), 0);
        assert_eq!(DecodedAmount::from_msat(1).to_btc(), 0.0);
    }

    #[test]
    fn decoding_is_deterministic() {
        assert_eq!(
            parse_invoice_amount(MICRO_2500).unwrap(),
            parse_invoice_amount(MICRO_2500).unwrap()
        );
    }
}
