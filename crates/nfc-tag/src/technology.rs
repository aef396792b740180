use serde::Serialize;

/// Android reports technologies as fully qualified class names
pub const ANDROID_TECH_PREFIX: &str = "android.nfc.tech.";

/// Hardware protocol families a tag can support
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Serialize,
    uniffi::Enum,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum Technology {
    IsoDep,
    NfcA,
    NfcB,
    NfcF,
    NfcV,
    Ndef,
    NdefFormatable,
    MifareClassic,
    MifareUltralight,
}

impl Technology {
    /// Parse a short (`NfcA`) or fully qualified (`android.nfc.tech.NfcA`) identifier
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let name = identifier.strip_prefix(ANDROID_TECH_PREFIX).unwrap_or(identifier);
        name.parse().ok()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

mod ffi {
    use strum::IntoEnumIterator as _;

    use super::Technology;

    #[uniffi::export]
    fn technology_name(technology: Technology) -> String {
        technology.name().to_string()
    }

    #[uniffi::export]
    fn all_technologies() -> Vec<Technology> {
        Technology::iter().collect()
    }
}
