//! Language detection helpers for query hints and result rating.
//!
//! Thin wrapper over [`whatlang`] that maps detections onto the small set of
//! two-letter codes the engines understand. Unreliable detections are
//! reported as `None` so short or ambiguous text never skews the ranking.

use whatlang::Lang;

/// Languages we map between whatlang detections and two-letter hints.
const LANG_CODES: &[(Lang, &str)] = &[
    (Lang::Eng, "en"),
    (Lang::Deu, "de"),
    (Lang::Fra, "fr"),
    (Lang::Spa, "es"),
    (Lang::Ita, "it"),
    (Lang::Por, "pt"),
    (Lang::Nld, "nl"),
    (Lang::Rus, "ru"),
    (Lang::Jpn, "ja"),
    (Lang::Cmn, "zh"),
    (Lang::Kor, "ko"),
    (Lang::Pol, "pl"),
    (Lang::Swe, "sv"),
    (Lang::Tur, "tr"),
];

fn code_for(lang: Lang) -> Option<&'static str> {
    LANG_CODES
        .iter()
        .find(|(l, _)| *l == lang)
        .map(|(_, code)| *code)
}

/// Detect the language of `text` as a two-letter code.
///
/// Returns `None` when detection is unreliable or the detected language is
/// outside the supported set.
pub fn detect(text: &str) -> Option<&'static str> {
    let info = whatlang::detect(text)?;
    if !info.is_reliable() {
        return None;
    }
    code_for(info.lang())
}

/// Check whether `text` appears to be written in the language `hint`
/// (a two-letter code).
///
/// Returns `None` when the text's language cannot be reliably determined;
/// callers must not treat that as a mismatch.
pub fn matches(text: &str, hint: &str) -> Option<bool> {
    let detected = detect(text)?;
    Some(detected == hint)
}
