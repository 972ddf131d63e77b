use crypto::blowfish::Blowfish;
use crypto::symmetriccipher::BlockDecryptor;
use std::io::Read;

use crate::error::DecodeError;

/// Fixed key derived from the game client; identical across all supported
/// versions (the client does not rotate it).
const REPLAY_KEY: [u8; 16] = [
    0x29, 0xB7, 0xC9, 0x09, 0x38, 0x3F, 0x84, 0x88, 0xFA, 0x98, 0xEC, 0x4E, 0x13, 0x19, 0x79, 0xFB,
];

const BLOCK_SIZE: usize = 8;

/// Blowfish-ECB decrypt each block, then XOR with the previous ciphertext
/// block (CBC-style chaining, first block chained against zero) -- matches
/// the teacher's `ReplayFile::from_file` decrypt loop exactly.
pub fn decrypt(encrypted: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if encrypted.len() % BLOCK_SIZE != 0 {
        return Err(DecodeError::DecryptFailure);
    }
    let blowfish = Blowfish::new(&REPLAY_KEY);
    let mut decrypted = vec![0u8; encrypted.len()];
    let mut previous = [0u8; BLOCK_SIZE];
    for offset in (0..encrypted.len()).step_by(BLOCK_SIZE) {
        blowfish.decrypt_block(&encrypted[offset..offset + BLOCK_SIZE], &mut decrypted[offset..offset + BLOCK_SIZE]);
        for j in 0..BLOCK_SIZE {
            decrypted[offset + j] ^= previous[j];
            previous[j] = decrypted[offset + j];
        }
    }
    Ok(decrypted)
}

pub fn inflate(decrypted: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut deflater = flate2::read::ZlibDecoder::new(decrypted);
    let mut out = vec![];
    deflater.read_to_end(&mut out).map_err(DecodeError::Inflate)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto::blowfish::Blowfish;
    use crypto::symmetriccipher::BlockEncryptor;

    fn encrypt_like_client(plaintext: &[u8]) -> Vec<u8> {
        assert_eq!(plaintext.len() % BLOCK_SIZE, 0);
        let blowfish = Blowfish::new(&REPLAY_KEY);
        let mut out = vec![0u8; plaintext.len()];
        let mut previous = [0u8; BLOCK_SIZE];
        for offset in (0..plaintext.len()).step_by(BLOCK_SIZE) {
            let mut xored = [0u8; BLOCK_SIZE];
            for j in 0..BLOCK_SIZE {
                xored[j] = plaintext[offset + j] ^ previous[j];
            }
            blowfish.encrypt_block(&xored, &mut out[offset..offset + BLOCK_SIZE]);
            previous.copy_from_slice(&out[offset..offset + BLOCK_SIZE]);
        }
        out
    }

    #[test]
    fn decrypt_inverts_the_cbc_like_chaining() {
        let plaintext = b"01234567abcdefgh";
        let encrypted = encrypt_like_client(plaintext);
        let decrypted = decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn non_block_aligned_input_is_a_decrypt_failure() {
        assert!(matches!(decrypt(&[1, 2, 3]), Err(DecodeError::DecryptFailure)));
    }
}
