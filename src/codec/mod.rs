//! Text codecs used to lay out key material.

pub mod hex;
