//! Game alphabet and accent folding.
//!
//! Every letter comparison in the engine goes through [`fold_letter`], so a
//! plain vowel typed by the player matches an accented vowel in the secret.

/// On-screen keyboard layout, top row first.
pub const KEYBOARD_ROWS: [&str; 4] = ["qwertyuiop", "asdfghjklñ", "zxcvbnm", "áéíóúü"];

/// Accented letters the input adapters accept besides ASCII letters.
const ACCENTED_LETTERS: &str = "áéíóúüñ";

/// Returns true if `c` can be typed into an attempt.
#[must_use]
pub fn is_alphabet_letter(c: char) -> bool {
    if c.is_ascii_alphabetic() {
        return true;
    }
    c.to_lowercase().all(|lower| ACCENTED_LETTERS.contains(lower))
}

/// Lower-cases `c` and strips its diacritic, if any.
#[must_use]
pub fn fold_letter(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[must_use]
pub fn fold_word(word: &str) -> String {
    word.chars().map(fold_letter).collect()
}

/// Lower-cases a single character without folding it.
#[must_use]
pub fn lower_letter(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
