//! Calculatrice scientifique — noyau réutilisable
//!
//! Le noyau reçoit un texte, rend un nombre fini (f64) ou une erreur typée,
//! et classe le texte en "arithmetic" / "scientific".
//! Aucune E/S, aucun état mutable partagé : appelable depuis n'importe quel thread.
//!
//! ```
//! use calculatrice_sci::noyau::{calculer, OperationType};
//!
//! let c = calculer("(2 + 3) × 4").unwrap();
//! assert_eq!(c.resultat, 20.0);
//! assert_eq!(c.type_operation, OperationType::Arithmetic);
//! ```

pub mod noyau;
