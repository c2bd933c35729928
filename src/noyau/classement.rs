// src/noyau/classement.rs
//
// Classement "arithmetic" / "scientific" sur le texte ORIGINAL (avant normalisation).
// - Compatible : recherche de sous-chaînes, insensible à la casse ; la lettre "e"
//   n'importe où (même dans un mot) suffit => scientific.
// - Strict : mêmes mots-clés, mais seulement sur des identifiants entiers
//   (plus les symboles π ² ³ ! √).

use std::fmt;

use super::normalisation::{decouper, Morceau};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationType {
    Arithmetic,
    Scientific,
}

impl OperationType {
    pub fn label(self) -> &'static str {
        match self {
            OperationType::Arithmetic => "arithmetic",
            OperationType::Scientific => "scientific",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeClassement {
    #[default]
    Compatible,
    Strict,
}

const MOTS_CLES: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "log", "ln", "sqrt", "cbrt", "exp", "abs", "π",
    "²", "³", "!", "e",
];

const IDENTS_STRICTS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "log", "ln", "sqrt", "cbrt", "exp", "abs", "e",
    "pi", "pow",
];

const SYMBOLES_STRICTS: &[char] = &['π', '²', '³', '!', '√'];

/// Classement par défaut (mode Compatible).
pub fn classify(original: &str) -> OperationType {
    classify_with(original, ModeClassement::Compatible)
}

pub fn classify_with(original: &str, mode: ModeClassement) -> OperationType {
    let scientifique = match mode {
        ModeClassement::Compatible => {
            let bas = original.to_lowercase();
            MOTS_CLES.iter().any(|k| bas.contains(k))
        }
        ModeClassement::Strict => decouper(original).iter().any(|m| match m {
            Morceau::Ident(w) => IDENTS_STRICTS.contains(&w.as_str()),
            Morceau::Symbole(c) => SYMBOLES_STRICTS.contains(c),
            Morceau::Nombre(_) | Morceau::Espace(_) => false,
        }),
    };

    if scientifique {
        OperationType::Scientific
    } else {
        OperationType::Arithmetic
    }
}
