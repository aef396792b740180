//! Tag technology inspection
//!
//! For every technology a discovered tag reports, the platform reads it through
//! [`access::TagAccess`] and the readout is decoded into
//! [`params::TechnologyParams`]. Each technology is inspected on its own, one
//! that can't be read is left out without affecting the others.

uniffi::setup_scaffolding!();

pub mod access;
pub mod error;
pub mod inspect;
pub mod params;
pub mod technology;

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tracing::{debug, warn};

pub use access::{TagAccess, TechnologyReadout};
pub use error::TagError;
pub use params::TechnologyParams;
pub use technology::Technology;

/// Parameters of every technology of a tag, keyed by technology name
///
/// When several tag variants were discovered together, keys of the variant at
/// position `n > 0` carry a `_n` suffix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct TagData {
    /// Technology identifiers of the first variant, as reported by the platform
    #[serde(rename = "techList")]
    pub tech_list: Vec<String>,
    pub technologies: HashMap<String, TechnologyParams>,
}

impl TagData {
    /// Add another variant's technologies, suffixing keys with its position
    pub fn merge(&mut self, other: TagData, position: usize) {
        if self.tech_list.is_empty() {
            self.tech_list = other.tech_list;
        }

        for (name, params) in other.technologies {
            self.technologies.insert(technology_key(&name, position), params);
        }
    }

    pub fn get(&self, technology: Technology) -> Option<&TechnologyParams> {
        self.technologies.get(technology.name())
    }
}

pub fn technology_key(name: &str, position: usize) -> String {
    match position {
        0 => name.to_string(),
        position => format!("{name}_{position}"),
    }
}

/// Inspect every technology of one tag
pub fn parse_tag(tag: &dyn TagAccess) -> TagData {
    let tech_list = tag.tech_list();

    let mut technologies: Vec<TechnologyParams> = Vec::with_capacity(tech_list.len());
    for identifier in &tech_list {
        let Some(technology) = Technology::from_identifier(identifier) else {
            debug!("skipping unsupported technology {identifier}");
            continue;
        };

        if technologies.iter().any(|params| params.technology() == technology) {
            continue;
        }

        match inspect::inspect_technology(tag, technology) {
            Ok(params) => technologies.push(params),
            Err(error) => warn!("unable to inspect {technology}: {error}"),
        }
    }

    let sak = technologies.iter().find_map(|params| match params {
        TechnologyParams::NfcA { sak, .. } => *sak,
        _ => None,
    });

    for params in technologies.iter_mut() {
        inspect::infer_classic_size(params, sak);
    }

    let technologies = technologies
        .into_iter()
        .map(|params| (params.technology().name().to_string(), params))
        .collect();

    TagData {
        tech_list,
        technologies,
    }
}

/// Inspect all variants of a tag discovered together and merge them into one result
pub fn parse_tags(tags: &[Arc<dyn TagAccess>]) -> TagData {
    let mut merged = TagData::default();

    for (position, tag) in tags.iter().enumerate() {
        let parsed = parse_tag(tag.as_ref());
        debug!("variant {position}: {} technologies", parsed.technologies.len());
        merged.merge(parsed, position);
    }

    merged
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn parse_tag_technologies(tags: Vec<Arc<dyn TagAccess>>) -> TagData {
        parse_tags(&tags)
    }
}

#[cfg(test)]
pub(crate) mod test_tag {
    use std::collections::HashMap;

    use crate::{TagAccess, TagError, Technology, TechnologyReadout};

    #[derive(Debug, Default)]
    pub struct TestTag {
        pub id: Vec<u8>,
        pub tech_list: Vec<String>,
        pub readouts: HashMap<Technology, Result<TechnologyReadout, TagError>>,
    }

    impl TestTag {
        pub fn with(mut self, readout: TechnologyReadout) -> Self {
            let technology = readout.technology();
            self.tech_list.push(format!("android.nfc.tech.{technology}"));
            self.readouts.insert(technology, Ok(readout));
            self
        }

        pub fn failing(mut self, technology: Technology, error: TagError) -> Self {
            self.tech_list.push(format!("android.nfc.tech.{technology}"));
            self.readouts.insert(technology, Err(error));
            self
        }
    }

    impl TagAccess for TestTag {
        fn id(&self) -> Vec<u8> {
            self.id.clone()
        }

        fn tech_list(&self) -> Vec<String> {
            self.tech_list.clone()
        }

        fn read(&self, technology: Technology) -> Result<TechnologyReadout, TagError> {
            self.readouts
                .get(&technology)
                .cloned()
                .unwrap_or(Err(TagError::Unsupported(technology)))
        }
    }
}
