//! Prelude module.
//!
//! You may import all symbols within for convenient usage of this library.
//!
//! # Example
//!
//! ```
//! use dcmtree_core::prelude::*;
//! ```

pub use crate::header::{HasLength as _, Header as _};
pub use crate::{DataDictionary as _, DictionaryEntry as _};
pub use crate::{Length, PrimitiveValue, Tag, VR};
