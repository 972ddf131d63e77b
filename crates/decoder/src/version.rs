use crate::error::DecodeError;

/// Closed registry of supported client versions. Adding a version is a code
/// change (a new `ClientVersion` value plus, in `wri-stats`, a new index
/// table), never runtime configuration -- per spec.md §9's redesign flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ClientVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ClientVersion {
    /// `clientVersionFromExe` is `"major,minor,patch,build"`.
    pub fn parse_from_exe(raw: &str) -> Result<ClientVersion, DecodeError> {
        let parts: Vec<&str> = raw.split(',').collect();
        if parts.len() != 4 {
            return Err(DecodeError::UnsupportedVersion(raw.to_string()));
        }
        let parse = |s: &str| s.parse::<u32>().map_err(|_| DecodeError::UnsupportedVersion(raw.to_string()));
        Ok(ClientVersion {
            major: parse(parts[0])?,
            minor: parse(parts[1])?,
            patch: parse(parts[2])?,
        })
    }

    pub fn dotted(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// The byte-offset constants for the terminal results packet are stable
    /// across every version this registry knows about; a future version
    /// with a different framing gets its own match arm here rather than a
    /// silent fallback.
    pub fn battle_results_packet_type(&self) -> u32 {
        0x22
    }
}

/// Versions this decoder is known to produce correct results for. Anything
/// else fails fast with `UnsupportedVersion` at decode start, per spec.md
/// §4.1's "registry consulted once" contract.
pub const SUPPORTED_VERSIONS: &[(u32, u32, u32)] = &[(14, 9, 0), (14, 10, 0), (14, 11, 0)];

pub fn require_supported(version: &ClientVersion) -> Result<(), DecodeError> {
    let found = SUPPORTED_VERSIONS
        .iter()
        .any(|(maj, min, pat)| *maj == version.major && *min == version.minor && *pat == version.patch);
    if found {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedVersion(version.dotted()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_part_exe_version() {
        let v = ClientVersion::parse_from_exe("14,11,0,9876543").unwrap();
        assert_eq!(v, ClientVersion { major: 14, minor: 11, patch: 0 });
    }

    #[test]
    fn unsupported_version_is_a_typed_error_not_a_panic() {
        let v = ClientVersion::parse_from_exe("99,0,0,1").unwrap();
        assert!(matches!(require_supported(&v), Err(DecodeError::UnsupportedVersion(_))));
    }

    #[test]
    fn malformed_exe_string_is_unsupported_version() {
        assert!(matches!(ClientVersion::parse_from_exe("14,11"), Err(DecodeError::UnsupportedVersion(_))));
    }
}
