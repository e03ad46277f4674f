//! Output sinks for the final article digest.
//!
//! # Submodules
//!
//! - [`json`]: writes the digest to a per-day JSON file
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     └── step2_final.json
//! ```

pub mod json;
