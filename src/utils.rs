//! Identifier helpers.

use bech32::Bech32m;
use uuid7::uuid7;

/// Mint a unique entity id: a uuid7 encoded with bech32 under a
/// human-readable prefix, e.g. `apt_1...`, `cons_1...`.
pub fn mint_id(prefix: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(prefix)?;
    let id = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(id)
}
