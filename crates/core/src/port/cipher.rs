// Secret Cipher Port
//
// Invoked by the service layer before a transport is written and after one is
// read; the repository only ever sees the sealed text form.

use crate::error::Result;

pub trait SecretCipher: Send + Sync {
    /// Seal a secret into `hex(nonce) || hex(ciphertext)`
    fn encrypt_to_text(&self, plaintext: &str) -> Result<String>;

    /// Open a sealed secret; any tampering yields AuthenticationFailure
    fn decrypt_from_text(&self, sealed: &str) -> Result<String>;
}
