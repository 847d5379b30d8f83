//! Pipeline stages for card generation.
//!
//! Each submodule implements exactly one step, testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ compose ──▶ render ──▶ encode ──▶ deliver
//! (JSON)    (layout)    (Chrome)   (PNG/b64)  (base64/s3/local)
//! ```
//!
//! 1. [`input`]: parse request JSON, tolerating fences and stringified args
//! 2. [`layout`]: slot and highlight rules per item (pure)
//! 3. [`compose`]: deck to layout tree (pure)
//! 4. [`render`]: two-pass measure/capture on a fresh surface, always torn down
//! 5. [`encode`]: PNG verification and base64 wrapping
//! 6. [`deliver`]: naming plus the three delivery channels

pub mod compose;
pub mod deliver;
pub mod encode;
pub mod input;
pub mod layout;
pub mod render;
