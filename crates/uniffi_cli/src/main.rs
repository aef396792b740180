//! Binding generator for the nfc bridge
//!
//! `--language kotlin` (or any kotlin target) goes through the generic
//! bindgen, everything else produces swift bindings and module maps

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Kotlin,
    Swift,
}

impl Target {
    fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kotlin = args
            .into_iter()
            .any(|arg| arg.as_ref().to_ascii_lowercase().contains("kotlin"));

        if kotlin { Self::Kotlin } else { Self::Swift }
    }
}

fn main() {
    match Target::from_args(std::env::args()) {
        Target::Kotlin => uniffi::uniffi_bindgen_main(),
        Target::Swift => uniffi::uniffi_bindgen_swift(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_target_from_args() {
        assert_eq!(
            Target::from_args(["uniffi-bindgen", "generate", "--language", "Kotlin"]),
            Target::Kotlin
        );
        assert_eq!(
            Target::from_args(["uniffi-bindgen-swift", "--swift-sources", "libnfc_bridge.a"]),
            Target::Swift
        );
    }
}
