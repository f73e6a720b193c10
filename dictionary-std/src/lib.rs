//! This crate implements the attribute dictionaries used by dcmtree.
//!
//! ## Run-time dictionaries
//!
//! - [`StandardDataDictionary`]: a built-in dictionary of common attributes,
//!   provided as a singleton behind a unit type for efficiency and ease of use.
//!   It is loaded lazily from an embedded resource
//!   in the same text format accepted by the [`loader`].
//! - [`InMemDataDictionary`]: a dictionary owning its entries,
//!   typically read from a resource file with [`loader::from_file`].
//! - [`LayeredDictionary`]: a dictionary stacked on top of another,
//!   so that private attributes can complement the standard ones.
//!
//! ## Constants
//!
//! The following modules contain constant declarations,
//! which perform an equivalent mapping at compile time,
//! thus without incurring a look-up cost:
//!
//! - [`tags`], which map an attribute keyword to its tag
//! - [`uids`], for the unique identifiers known to this project
pub mod data_element;
pub mod in_mem;
pub mod layered;
pub mod loader;
pub mod tags;
pub mod uids;

pub use data_element::StandardDataDictionary;
pub use in_mem::InMemDataDictionary;
pub use layered::LayeredDictionary;
