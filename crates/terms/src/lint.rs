use serde::Serialize;

use crate::dictionary::TermDictionary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HazardKind {
    /// Source and target are the same string.
    Identity,
    /// The target contains the source of an entry applied after it in
    /// sequential mode, so the replaced text gets rewritten again.
    Retrigger { by: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hazard {
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub kind: HazardKind,
}

impl std::fmt::Display for Hazard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            HazardKind::Identity => {
                write!(f, "'{}' maps to itself", self.source)
            }
            HazardKind::Retrigger { by } => write!(
                f,
                "'{}' -> '{}' is re-matched by later term '{by}'",
                self.source, self.target
            ),
        }
    }
}

/// Find entries whose output is not stable under sequential substitution.
///
/// Only containment is checked; a match spanning a target and its
/// surrounding text is not detected.
pub fn lint(dictionary: &TermDictionary) -> Vec<Hazard> {
    let ordered = dictionary.by_length_desc();
    let mut hazards = Vec::new();

    for (i, entry) in ordered.iter().enumerate() {
        if entry.source == entry.target {
            hazards.push(Hazard {
                source: entry.source.clone(),
                target: entry.target.clone(),
                kind: HazardKind::Identity,
            });
        }

        for later in &ordered[i + 1..] {
            if entry.target.contains(later.source.as_str()) {
                hazards.push(Hazard {
                    source: entry.source.clone(),
                    target: entry.target.clone(),
                    kind: HazardKind::Retrigger { by: later.source.clone() },
                });
            }
        }
    }

    hazards
}
