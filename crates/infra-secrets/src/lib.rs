// Mailroom Infrastructure - Secrets Adapter
// Implements: SecretCipher (AES-128-GCM, random 96-bit nonce per call)

mod cipher;

pub use cipher::{CipherMode, CredentialCipher, SealedSecret, KEY_LEN, NONCE_HEX_LEN, NONCE_LEN};
