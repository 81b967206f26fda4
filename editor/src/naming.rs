use serde::{Deserialize, Serialize};

/// Left/right suffix pairs used to find a bone's mirror counterpart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorNaming {
    /// Checked in order; the first pair whose either side matches the name's suffix wins.
    pub suffix_pairs: Vec<(String, String)>,
}

impl Default for MirrorNaming {
    fn default() -> Self {
        Self {
            suffix_pairs: vec![("_L".into(), "_R".into()), ("_l".into(), "_r".into())],
        }
    }
}

impl MirrorNaming {
    /// The name with its side suffix swapped, or `None` when no pair matches.
    pub fn mirror_name(&self, name: &str) -> Option<String> {
        self.suffix_pairs.iter().find_map(|(left, right)| {
            if let Some(stem) = name.strip_suffix(left.as_str()) {
                Some(format!("{stem}{right}"))
            } else {
                name.strip_suffix(right.as_str())
                    .map(|stem| format!("{stem}{left}"))
            }
        })
    }
}
