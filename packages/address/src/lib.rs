#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Japanese address handling for NTT flets availability lookups.
//!
//! The carrier sites only answer for addresses picked from their own
//! autocomplete lists, so an address typed by a user has to be
//! [normalized](normalize), [decomposed](decompose) into
//! prefecture/city/town/chōme/banchi, and then [matched](matcher) against
//! whatever candidates the site offers.

pub mod aza;
pub mod config;
pub mod decompose;
pub mod matcher;
pub mod normalize;
pub mod prefecture;
pub mod similarity;

pub use flets_area_address_models::{
    AddressComponents, CandidateScore, DecomposeRule, MatchCandidate, MatchConfig, MatchResult,
    NormalizeOptions, Region, WhitespaceMode,
};

pub use decompose::{decompose, try_decompose};
pub use matcher::{AddressMatcher, find_best_match, find_best_match_simple};
pub use normalize::{normalize, normalize_for_comparison};
pub use similarity::{is_address_match, similarity};

/// Errors that can occur while parsing addresses or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    /// Nothing was left of the input after normalization.
    #[error("Address is empty")]
    EmptyInput,

    /// No prefecture could be found at the start of the address.
    #[error("No prefecture found in address: {address}")]
    PrefectureNotFound {
        /// The address as given.
        address: String,
    },

    /// No municipality follows the prefecture.
    #[error("No city found in address: {address}")]
    CityNotFound {
        /// The address as given.
        address: String,
    },

    /// I/O error (config file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration TOML.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}
