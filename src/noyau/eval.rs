//! Noyau — évaluation (pipeline réel)
//!
//! texte -> normalize -> tokenize -> RPN -> Expr (profondeur bornée) -> descente -> contrôle final
//! texte (inchangé) -> classify
//!
//! Tout ou rien : une seule erreur par appel, jamais de NaN / ±∞ rendu à l'appelant.

use log::{debug, trace};

use super::classement::{classify_with, OperationType};
use super::erreurs::CalculatorError;
use super::jetons::{format_tokens, tokenize};
use super::normalisation::normalize;
use super::reglages::Reglages;
use super::rpn::{format_rpn, from_rpn, to_rpn};

/// Résultat d'un calcul complet : ce que l'appelant persiste / affiche.
#[derive(Clone, Debug, PartialEq)]
pub struct Calcul {
    pub expression: String,
    pub resultat: f64,
    pub type_operation: OperationType,
}

#[derive(Default, Clone, Debug)]
pub struct DemarcheNoyau {
    pub canonique: String,
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
}

/// Évalue une forme canonique (réglages par défaut).
pub fn evaluate(canonical: &str) -> Result<f64, CalculatorError> {
    evaluate_with(canonical, &Reglages::default())
}

pub fn evaluate_with(canonical: &str, reglages: &Reglages) -> Result<f64, CalculatorError> {
    evalue_avec_demarche(canonical, reglages, None)
}

/// Composition normalize -> evaluate.
pub fn normalize_and_evaluate(expression: &str) -> Result<f64, CalculatorError> {
    normalize_and_evaluate_with(expression, &Reglages::default())
}

pub fn normalize_and_evaluate_with(
    expression: &str,
    reglages: &Reglages,
) -> Result<f64, CalculatorError> {
    if expression.trim().is_empty() {
        return Err(CalculatorError::EmptyExpression);
    }
    evaluate_with(&normalize(expression), reglages)
}

/// Résultat + classement (texte original), réglages par défaut.
pub fn calculer(expression: &str) -> Result<Calcul, CalculatorError> {
    eval_expression(expression, &Reglages::default()).map(|(c, _)| c)
}

/// API publique complète : calcul + démarche (canonique, jetons, RPN, arbre).
pub fn eval_expression(
    expression: &str,
    reglages: &Reglages,
) -> Result<(Calcul, DemarcheNoyau), CalculatorError> {
    if expression.trim().is_empty() {
        return Err(CalculatorError::EmptyExpression);
    }

    let canonique = normalize(expression);
    let mut demarche = DemarcheNoyau {
        canonique: canonique.clone(),
        ..Default::default()
    };

    let resultat = evalue_avec_demarche(&canonique, reglages, Some(&mut demarche))?;

    let calcul = Calcul {
        expression: expression.to_string(),
        resultat,
        type_operation: classify_with(expression, reglages.classement),
    };
    Ok((calcul, demarche))
}

fn evalue_avec_demarche(
    canonical: &str,
    reglages: &Reglages,
    demarche: Option<&mut DemarcheNoyau>,
) -> Result<f64, CalculatorError> {
    let s = canonical.trim();
    if s.is_empty() {
        return Err(CalculatorError::EmptyExpression);
    }
    trace!("forme canonique: {s:?}");

    let r = pipeline(s, reglages, demarche);
    if let Err(e) = &r {
        debug!("évaluation refusée ({}): {s:?} -> {e}", e.kind().code());
    }
    r
}

fn pipeline(
    s: &str,
    reglages: &Reglages,
    demarche: Option<&mut DemarcheNoyau>,
) -> Result<f64, CalculatorError> {
    // 1) Jetons
    let jetons = tokenize(s)?;

    // 2) RPN
    let rpn = to_rpn(&jetons)?;

    // 3) AST (Expr), profondeur bornée
    let expr = from_rpn(&rpn, reglages.profondeur_max)?;

    if let Some(d) = demarche {
        d.jetons = format_tokens(&jetons);
        d.rpn = format_rpn(&rpn);
        d.arbre = expr.to_string();
    }

    // 4) Descente + contrôle final
    verifie_fini(expr.evaluer()?)
}

fn verifie_fini(v: f64) -> Result<f64, CalculatorError> {
    if v.is_nan() {
        return Err(CalculatorError::ResultIsNotANumber);
    }
    if v.is_infinite() {
        return Err(CalculatorError::ResultIsInfinite);
    }
    Ok(v)
}
