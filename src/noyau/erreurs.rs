// src/noyau/erreurs.rs
//
// Erreurs typées du noyau.
// - Une seule erreur par appel (tout ou rien)
// - Chaque erreur porte un message lisible qui nomme la condition violée
// - ErrorKind = taxonomie stable pour l'appelant (UI, API, ...)

use thiserror::Error;

/// Taxonomie des erreurs (ce que voit l'appelant).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyExpression,
    SyntaxError,
    UnknownIdentifier,
    DivisionByZero,
    DomainError,
    FactorialError,
    Overflow,
    ResultIsInfinite,
    ResultIsNotANumber,
}

impl ErrorKind {
    /// Libellé stable (snake_case), utilisable tel quel dans une réponse.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::EmptyExpression => "empty_expression",
            ErrorKind::SyntaxError => "syntax_error",
            ErrorKind::UnknownIdentifier => "unknown_identifier",
            ErrorKind::DivisionByZero => "division_by_zero",
            ErrorKind::DomainError => "domain_error",
            ErrorKind::FactorialError => "factorial_error",
            ErrorKind::Overflow => "overflow",
            ErrorKind::ResultIsInfinite => "result_is_infinite",
            ErrorKind::ResultIsNotANumber => "result_is_not_a_number",
        }
    }
}

/// Opérande hors du domaine mathématique d'une fonction.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DomainError {
    #[error("racine carrée d'un nombre négatif ({0})")]
    NegativeRoot(f64),

    #[error("{fonction} exige un argument entre -1 et 1 (reçu {valeur})")]
    InverseTrigRange { fonction: &'static str, valeur: f64 },

    #[error("{fonction} exige un argument strictement positif (reçu {valeur})")]
    NonPositiveLog { fonction: &'static str, valeur: f64 },

    #[error("puissance invalide : {base} ** {exposant}")]
    InvalidPower { base: f64, exposant: f64 },
}

/// Factorielle hors domaine (entier naturel ≤ 170).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FactorialError {
    #[error("factorielle d'un nombre négatif ({0})")]
    Negative(f64),

    #[error("factorielle d'un nombre non entier ({0})")]
    NonInteger(f64),

    #[error("factorielle trop grande ({0} > 170)")]
    TooLarge(f64),
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum CalculatorError {
    #[error("Entrée vide")]
    EmptyExpression,

    #[error("syntaxe invalide (position {position}) : {message}")]
    Syntax { message: String, position: usize },

    #[error("fonction ou variable inconnue '{nom}' (position {position})")]
    UnknownIdentifier { nom: String, position: usize },

    #[error("division par zéro ({operation})")]
    DivisionByZero { operation: &'static str },

    #[error("erreur de domaine : {0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Factorial(#[from] FactorialError),

    #[error("résultat trop grand ({operation})")]
    Overflow { operation: &'static str },

    #[error("le résultat est infini")]
    ResultIsInfinite,

    #[error("le résultat n'est pas un nombre")]
    ResultIsNotANumber,
}

impl CalculatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalculatorError::EmptyExpression => ErrorKind::EmptyExpression,
            CalculatorError::Syntax { .. } => ErrorKind::SyntaxError,
            CalculatorError::UnknownIdentifier { .. } => ErrorKind::UnknownIdentifier,
            CalculatorError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            CalculatorError::Domain(_) => ErrorKind::DomainError,
            CalculatorError::Factorial(_) => ErrorKind::FactorialError,
            CalculatorError::Overflow { .. } => ErrorKind::Overflow,
            CalculatorError::ResultIsInfinite => ErrorKind::ResultIsInfinite,
            CalculatorError::ResultIsNotANumber => ErrorKind::ResultIsNotANumber,
        }
    }

    /// Raccourci : erreur de syntaxe à une position donnée.
    pub(crate) fn syntaxe(message: impl Into<String>, position: usize) -> Self {
        CalculatorError::Syntax {
            message: message.into(),
            position,
        }
    }
}
