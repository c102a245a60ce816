use crate::error::Result;
use crate::keys::Key;
use std::fmt::Debug;

/// Core trait that every token signing method implements
///
/// A signing method is an immutable value identified by its algorithm name.
/// Implementations must be safe to call concurrently from any thread.
pub trait SigningMethod: Debug + Send + Sync {
    /// The algorithm identifier written to the `alg` header (e.g. "HS256")
    fn algorithm(&self) -> &str;

    /// Sign the canonical signing input and return the Base64URL signature
    ///
    /// # Arguments
    /// * `signing_input` - The data to sign (`header.payload`)
    /// * `key` - Private or shared key material
    fn sign(&self, signing_input: &str, key: &Key) -> Result<String>;

    /// Verify a Base64URL signature over the canonical signing input
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (`header.payload`)
    /// * `signature` - The Base64URL-encoded signature segment
    /// * `key` - Public or shared key material
    fn verify(&self, signing_input: &str, signature: &str, key: &Key) -> Result<()>;
}
