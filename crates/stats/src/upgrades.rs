use std::collections::HashMap;

/// PCM-code -> display-name side table, constructed once at process start.
pub struct UpgradeNameTable {
    names: HashMap<u32, String>,
}

impl UpgradeNameTable {
    pub fn new(names: HashMap<u32, String>) -> Self {
        Self { names }
    }

    pub fn sample() -> Self {
        let mut names = HashMap::new();
        names.insert(1, "Main Armaments Modification 1".to_string());
        names.insert(2, "Damage Control System Modification 1".to_string());
        Self::new(names)
    }

    fn display_name(&self, code: u32) -> String {
        self.names.get(&code).cloned().unwrap_or_else(|| format!("Unknown Upgrade #{code}"))
    }
}

/// `shipConfigDump` is a flat byte array of little-endian u32 PCM codes.
/// Trailing bytes that don't fill a full u32 are dropped (never panics on a
/// malformed dump).
pub fn decode_upgrades(dump: &[u8], names: &UpgradeNameTable) -> Vec<String> {
    dump.chunks_exact(4)
        .map(|chunk| u32::from_le_bytes(chunk.try_into().unwrap()))
        .map(|code| names.display_name(code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pcm_codes_into_display_names() {
        let names = UpgradeNameTable::sample();
        let mut dump = vec![];
        dump.extend_from_slice(&1u32.to_le_bytes());
        dump.extend_from_slice(&2u32.to_le_bytes());
        let decoded = decode_upgrades(&dump, &names);
        assert_eq!(decoded, vec!["Main Armaments Modification 1", "Damage Control System Modification 1"]);
    }

    #[test]
    fn ignores_trailing_partial_code() {
        let names = UpgradeNameTable::sample();
        let mut dump = vec![];
        dump.extend_from_slice(&1u32.to_le_bytes());
        dump.push(0xFF);
        assert_eq!(decode_upgrades(&dump, &names).len(), 1);
    }
}
