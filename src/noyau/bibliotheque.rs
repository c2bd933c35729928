// src/noyau/bibliotheque.rs
//
// Bibliothèque de fonctions (allow-list fixe)
// -------------------------------------------
// - Chaque entrée : nom canonique + arité (1 ou 2) + implémentation
// - L'implémentation vérifie son domaine AVANT de calculer (erreur typée)
// - Trigonométrie en DEGRÉS : conversion degrés -> radians en entrée,
//   radians -> degrés en sortie pour les fonctions inverses
// - Table construite une seule fois (OnceLock), lecture seule ensuite

use std::collections::HashMap;
use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use super::erreurs::{CalculatorError, DomainError, FactorialError};

/// Plus grand n tel que n! reste fini en f64.
pub const FACTORIELLE_MAX: f64 = 170.0;

type Resultat = Result<f64, CalculatorError>;

#[derive(Clone, Copy)]
enum Implementation {
    Unaire(fn(f64) -> Resultat),
    Binaire(fn(f64, f64) -> Resultat),
}

/// Une entrée de la bibliothèque.
#[derive(Clone, Copy)]
pub struct FunctionEntry {
    pub nom: &'static str,
    implementation: Implementation,
}

impl FunctionEntry {
    const fn unaire(nom: &'static str, f: fn(f64) -> Resultat) -> Self {
        Self {
            nom,
            implementation: Implementation::Unaire(f),
        }
    }

    const fn binaire(nom: &'static str, f: fn(f64, f64) -> Resultat) -> Self {
        Self {
            nom,
            implementation: Implementation::Binaire(f),
        }
    }

    pub fn arite(&self) -> usize {
        match self.implementation {
            Implementation::Unaire(_) => 1,
            Implementation::Binaire(_) => 2,
        }
    }

    /// Applique la fonction. Le nombre d'arguments est vérifié ici aussi
    /// (le parseur le fait déjà, avec la position).
    pub fn apply(&self, args: &[f64]) -> Resultat {
        match (self.implementation, args) {
            (Implementation::Unaire(f), [x]) => f(*x),
            (Implementation::Binaire(f), [a, b]) => f(*a, *b),
            _ => Err(CalculatorError::syntaxe(
                format!(
                    "{} attend {} argument(s), reçu {}",
                    self.nom,
                    self.arite(),
                    args.len()
                ),
                0,
            )),
        }
    }
}

// Les noms sont uniques : l'identité d'une entrée est son nom.
impl PartialEq for FunctionEntry {
    fn eq(&self, other: &Self) -> bool {
        self.nom == other.nom
    }
}

impl std::fmt::Debug for FunctionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.nom, self.arite())
    }
}

const ENTREES: &[FunctionEntry] = &[
    FunctionEntry::binaire("add", add),
    FunctionEntry::binaire("subtract", subtract),
    FunctionEntry::binaire("multiply", multiply),
    FunctionEntry::binaire("divide", divide),
    FunctionEntry::binaire("power", power),
    FunctionEntry::binaire("modulo", modulo),
    FunctionEntry::unaire("square", square),
    FunctionEntry::unaire("cube", cube),
    FunctionEntry::unaire("sqrt", sqrt),
    FunctionEntry::unaire("cbrt", cbrt),
    FunctionEntry::unaire("sin_deg", sin_deg),
    FunctionEntry::unaire("cos_deg", cos_deg),
    FunctionEntry::unaire("tan_deg", tan_deg),
    FunctionEntry::unaire("asin_deg", asin_deg),
    FunctionEntry::unaire("acos_deg", acos_deg),
    FunctionEntry::unaire("atan_deg", atan_deg),
    FunctionEntry::unaire("log10", log10),
    FunctionEntry::unaire("ln", ln),
    FunctionEntry::unaire("exp", exp),
    FunctionEntry::unaire("factorial", factorial),
    FunctionEntry::unaire("absolute", absolute),
    FunctionEntry::unaire("reciprocal", reciprocal),
];

static TABLE: OnceLock<HashMap<&'static str, &'static FunctionEntry>> = OnceLock::new();

fn table() -> &'static HashMap<&'static str, &'static FunctionEntry> {
    TABLE.get_or_init(|| ENTREES.iter().map(|e| (e.nom, e)).collect())
}

/// Résout un identifiant dans l'allow-list (sensible à la casse : forme canonique).
pub fn lookup(nom: &str) -> Option<&'static FunctionEntry> {
    table().get(nom).copied()
}

/// Métadonnées (nom -> arité), triées par nom.
pub fn metadata() -> Vec<(&'static str, usize)> {
    let mut v: Vec<_> = ENTREES.iter().map(|e| (e.nom, e.arite())).collect();
    v.sort_unstable_by_key(|(nom, _)| *nom);
    v
}

/* ------------------------ Arithmétique ------------------------ */

pub fn add(a: f64, b: f64) -> Resultat {
    Ok(a + b)
}

pub fn subtract(a: f64, b: f64) -> Resultat {
    Ok(a - b)
}

pub fn multiply(a: f64, b: f64) -> Resultat {
    Ok(a * b)
}

pub fn divide(a: f64, b: f64) -> Resultat {
    if b == 0.0 {
        return Err(CalculatorError::DivisionByZero { operation: "divide" });
    }
    Ok(a / b)
}

/// a ** b
/// - 0 ** (négatif) => division par zéro
/// - base négative + exposant non entier => domaine
/// - entrées finies, résultat infini => dépassement
pub fn power(base: f64, exposant: f64) -> Resultat {
    if base == 0.0 && exposant < 0.0 {
        return Err(CalculatorError::DivisionByZero { operation: "power" });
    }
    if base < 0.0 && exposant.is_finite() && exposant.fract() != 0.0 {
        return Err(DomainError::InvalidPower { base, exposant }.into());
    }

    let r = base.powf(exposant);
    if r.is_infinite() && base.is_finite() && exposant.is_finite() {
        return Err(CalculatorError::Overflow { operation: "power" });
    }
    Ok(r)
}

/// Modulo "plancher" : le signe du reste suit le diviseur.
pub fn modulo(a: f64, b: f64) -> Resultat {
    if b == 0.0 {
        return Err(CalculatorError::DivisionByZero { operation: "modulo" });
    }
    let mut r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r += b;
    }
    Ok(r)
}

pub fn square(a: f64) -> Resultat {
    Ok(a * a)
}

pub fn cube(a: f64) -> Resultat {
    Ok(a * a * a)
}

/* ------------------------ Racines ------------------------ */

pub fn sqrt(a: f64) -> Resultat {
    if a < 0.0 {
        return Err(DomainError::NegativeRoot(a).into());
    }
    Ok(a.sqrt())
}

/// Racine cubique signée (définie sur tout ℝ).
pub fn cbrt(a: f64) -> Resultat {
    Ok(a.cbrt())
}

/* ------------------------ Trigonométrie (DEGRÉS) ------------------------ */

pub fn sin_deg(a: f64) -> Resultat {
    Ok(a.to_radians().sin())
}

pub fn cos_deg(a: f64) -> Resultat {
    Ok(a.to_radians().cos())
}

pub fn tan_deg(a: f64) -> Resultat {
    Ok(a.to_radians().tan())
}

fn verifie_unite(fonction: &'static str, valeur: f64) -> Result<(), CalculatorError> {
    if !(-1.0..=1.0).contains(&valeur) && !valeur.is_nan() {
        return Err(DomainError::InverseTrigRange { fonction, valeur }.into());
    }
    Ok(())
}

pub fn asin_deg(a: f64) -> Resultat {
    verifie_unite("asin", a)?;
    Ok(a.asin().to_degrees())
}

pub fn acos_deg(a: f64) -> Resultat {
    verifie_unite("acos", a)?;
    Ok(a.acos().to_degrees())
}

pub fn atan_deg(a: f64) -> Resultat {
    Ok(a.atan().to_degrees())
}

/* ------------------------ Logarithmes / exponentielle ------------------------ */

pub fn log10(a: f64) -> Resultat {
    if a <= 0.0 {
        return Err(DomainError::NonPositiveLog {
            fonction: "log",
            valeur: a,
        }
        .into());
    }
    Ok(a.log10())
}

pub fn ln(a: f64) -> Resultat {
    if a <= 0.0 {
        return Err(DomainError::NonPositiveLog {
            fonction: "ln",
            valeur: a,
        }
        .into());
    }
    Ok(a.ln())
}

pub fn exp(a: f64) -> Resultat {
    let r = a.exp();
    if r.is_infinite() && a.is_finite() {
        return Err(CalculatorError::Overflow { operation: "exp" });
    }
    Ok(r)
}

/* ------------------------ Divers ------------------------ */

/// n! exact (BigUint) puis conversion f64 (arrondi correct).
pub fn factorial(n: f64) -> Resultat {
    if n < 0.0 {
        return Err(FactorialError::Negative(n).into());
    }
    if n.is_infinite() {
        return Err(FactorialError::TooLarge(n).into());
    }
    if n.fract() != 0.0 || n.is_nan() {
        return Err(FactorialError::NonInteger(n).into());
    }
    if n > FACTORIELLE_MAX {
        return Err(FactorialError::TooLarge(n).into());
    }

    // n ∈ [0, 170] entier : la conversion est exacte
    let k = n as u32;
    let mut acc = BigUint::one();
    for i in 2..=k {
        acc *= i;
    }
    acc.to_f64()
        .ok_or(CalculatorError::Overflow {
            operation: "factorial",
        })
}

pub fn absolute(a: f64) -> Resultat {
    Ok(a.abs())
}

pub fn reciprocal(a: f64) -> Resultat {
    if a == 0.0 {
        return Err(CalculatorError::DivisionByZero {
            operation: "reciprocal",
        });
    }
    Ok(1.0 / a)
}
