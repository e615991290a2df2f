//! Normalisation of raw classification-model labels to canonical disease codes.
//!
//! The model reports class names in whatever spelling its training set used
//! (`melanocytic_Nevi`, `benign_keratosis-like_lesions`, `akiec`, ...). Before a result can be
//! shown or stored it has to be mapped onto the curated disease vocabulary.
//!
//! Resolution order:
//! 1. clean the label (lowercase, `-` to `_`, drop anything outside `[a-z0-9_ ]`)
//! 2. look up the cleaned form, the form without spaces, the form without `_`, and the first word
//! 3. look up the first four characters of the space-free form
//! 4. substring heuristics on the uppercased raw label
//!
//! A label that survives all of that unresolved is reported as `None`; no code is guessed.

use derm_types::Code;

/// Known spellings of each disease class.
pub(crate) const SYNONYMS: &[(&str, &str)] = &[
    ("benign_keratosis-like_lesions", "BKL"),
    ("benign_keratosis_like_lesions", "BKL"),
    ("benign keratosis like lesions", "BKL"),
    ("benignkeratosislikelesions", "BKL"),
    ("bkl", "BKL"),
    ("actinic_keratoses", "AK"),
    ("actinic_keratosis", "AK"),
    ("actinic keratoses", "AK"),
    ("ak", "AK"),
    ("akiec", "AK"),
    ("basal_cell_carcinoma", "BCC"),
    ("basal-cell_carcinoma", "BCC"),
    ("basal cell carcinoma", "BCC"),
    ("bcc", "BCC"),
    ("dermatofibroma", "DF"),
    ("df", "DF"),
    ("melanocytic_nevi", "NV"),
    ("melanocytic_nevus", "NV"),
    ("melanocytic_nevi_n", "NV"),
    ("melanocyticnevi", "NV"),
    ("nevi", "NV"),
    ("nev", "NV"),
    ("nevus", "NV"),
    ("nv", "NV"),
    ("nv_m", "NV"),
    ("nv_m_", "NV"),
    ("vascular_lesions", "VASC"),
    ("vascular lesions", "VASC"),
    ("vascularlesions", "VASC"),
    ("vasc", "VASC"),
    ("melanoma", "MEL"),
    ("mel", "MEL"),
];

/// Maps a raw model label to a canonical disease code.
pub fn normalise_model_label(raw: &str) -> Option<Code> {
    let resolved = resolve(raw);
    match &resolved {
        Some(code) => tracing::debug!(raw_label = raw, code = %code, "normalised model label"),
        None => tracing::warn!(raw_label = raw, "could not normalise model label"),
    }
    resolved.and_then(|code| Code::parse(code).ok())
}

fn resolve(raw: &str) -> Option<&'static str> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return None;
    }

    let no_space = cleaned.replace(' ', "");
    let no_underscore = cleaned.replace('_', "");
    let first_word = cleaned.split_whitespace().next().unwrap_or(cleaned.as_str());

    let candidates = [cleaned.as_str(), no_space.as_str(), no_underscore.as_str(), first_word];
    if let Some(code) = candidates.into_iter().find_map(lookup) {
        return Some(code);
    }

    let prefix: String = no_space.chars().take(4).collect();
    if let Some(code) = lookup(&prefix) {
        return Some(code);
    }

    let upper = raw.trim().to_uppercase();
    if upper.starts_with("AKIEC") {
        Some("AK")
    } else if upper.starts_with("NV_M") || upper.contains("NEV") {
        Some("NV")
    } else if upper.contains("MELANO") {
        Some("MEL")
    } else {
        None
    }
}

fn clean(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace('-', "_")
        .chars()
        .filter(|c| matches!(*c, 'a'..='z' | '0'..='9' | '_' | ' '))
        .collect::<String>()
        .trim()
        .to_owned()
}

fn lookup(candidate: &str) -> Option<&'static str> {
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == candidate)
        .map(|(_, code)| *code)
}
