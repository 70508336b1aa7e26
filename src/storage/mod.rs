pub mod signer;

pub use signer::{HmacUrlSigner, UrlSigner};
