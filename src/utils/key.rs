use rand::RngCore;

/// Generates a random 32-byte private key as `0x`-prefixed hex. For test
/// fixtures and local tooling only; not suitable for production key
/// provisioning.
pub fn unsafe_generate_random_private_key_hex() -> String {
    let mut rng = rand::rng();
    let mut pk = [0u8; 32];
    rng.fill_bytes(&mut pk);
    format!("0x{}", hex::encode(pk))
}
