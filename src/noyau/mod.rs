//! Noyau de calcul (f64)
//!
//! Organisation interne :
//! - bibliotheque.rs  : allow-list des fonctions (domaines + erreurs typées)
//! - normalisation.rs : texte humain -> forme canonique (×, ÷, π, e, ², ³, !, noms)
//! - jetons.rs        : tokenisation de la forme canonique
//! - rpn.rs           : shunting-yard + construction Expr (profondeur bornée)
//! - expr.rs          : AST + descente récursive
//! - classement.rs    : arithmetic / scientific (texte original)
//! - eval.rs          : pipeline complet
//! - erreurs.rs       : taxonomie des erreurs
//! - reglages.rs      : réglages (profondeur, mode de classement)

pub mod bibliotheque;
pub mod classement;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod normalisation;
pub mod reglages;
pub mod rpn;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use bibliotheque::metadata;
pub use classement::{classify, classify_with, ModeClassement, OperationType};
pub use erreurs::{CalculatorError, DomainError, ErrorKind, FactorialError};
pub use eval::{
    calculer, eval_expression, evaluate, evaluate_with, normalize_and_evaluate,
    normalize_and_evaluate_with, Calcul, DemarcheNoyau,
};
pub use normalisation::normalize;
pub use reglages::Reglages;
