//! Integrity-check digest computation and validation.

use mercury_datatypes::{EncapsulatedData, IntegrityCheckAlgorithm};
use sha1::{Digest, Sha1};
use sha2::Sha256;

/// Digest of `data` under the named algorithm.
pub fn compute(algorithm: IntegrityCheckAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        IntegrityCheckAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        IntegrityCheckAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
    }
}

/// Whether the stored integrity check matches the value's content.
///
/// Vacuously true when either the digest or the algorithm is absent; the
/// check can only be evaluated when both are present.
pub fn verify(ed: &EncapsulatedData) -> bool {
    match (ed.integrity_check.as_deref(), ed.integrity_check_algorithm) {
        (Some(stored), Some(algorithm)) => compute(algorithm, &ed.content) == stored,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sha1_vector() {
        // SHA-1("abc")
        let digest = compute(IntegrityCheckAlgorithm::Sha1, b"abc");
        assert_eq!(
            digest,
            [
                0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78,
                0x50, 0xc2, 0x6c, 0x9c, 0xd0, 0xd8, 0x9d,
            ]
        );
    }

    #[test]
    fn test_verify_requires_both_fields() {
        let mut ed = EncapsulatedData::new_text("payload");
        assert!(verify(&ed));

        ed.integrity_check_algorithm = Some(IntegrityCheckAlgorithm::Sha256);
        assert!(verify(&ed), "digest absent, nothing to compare");

        ed.integrity_check = Some(compute(IntegrityCheckAlgorithm::Sha256, b"payload"));
        assert!(verify(&ed));

        ed.content = b"tampered".to_vec();
        assert!(!verify(&ed));
    }
}
