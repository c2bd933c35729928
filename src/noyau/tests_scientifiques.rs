//! Tests scientifiques (campagne) : propriétés du noyau + limites contrôlées.
//!
//! But : vérifier les invariants annoncés sans faire chauffer la machine.
//! - balayages bornés (division, racine, trig inverse)
//! - tolérance 1e-10 pour la trig en degrés
//! - budget temps global sur les balayages

use std::time::{Duration, Instant};

use super::{
    classify, evaluate, normalize, normalize_and_evaluate, CalculatorError, ErrorKind,
    FactorialError, OperationType,
};

const TOL: f64 = 1e-10;

fn eval_ok(expr: &str) -> f64 {
    normalize_and_evaluate(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn eval_err(expr: &str) -> CalculatorError {
    match normalize_and_evaluate(expr) {
        Ok(v) => panic!("erreur attendue pour expr={expr:?}, obtenu {v}"),
        Err(e) => e,
    }
}

fn assert_proche(expr: &str, attendu: f64) {
    let v = eval_ok(expr);
    assert!(
        (v - attendu).abs() < TOL,
        "expr={expr:?} : {v} != {attendu}"
    );
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/// Valeurs de balayage (entiers, décimaux, grands, petits, négatifs).
fn valeurs() -> Vec<f64> {
    let mut v = vec![0.0, 1.0, 2.0, 3.0, 7.0, 0.5, 0.1, 1e-9, 12345.678, 1e12];
    let negs: Vec<f64> = v.iter().map(|x| -x).collect();
    v.extend(negs);
    v
}

/* ------------------------ Division ------------------------ */

#[test]
fn sci_division_ieee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    for a in valeurs() {
        for b in valeurs() {
            budget(t0, max);
            let expr = format!("({a:?}) / ({b:?})");
            if b == 0.0 {
                assert_eq!(eval_err(&expr).kind(), ErrorKind::DivisionByZero, "expr={expr:?}");
            } else {
                assert_eq!(eval_ok(&expr), a / b, "expr={expr:?}");
            }
        }
    }
}

#[test]
fn sci_division_par_zero() {
    for a in ["0", "1", "-5", "2.5", "1e300"] {
        let e = eval_err(&format!("{a} / 0"));
        assert_eq!(e, CalculatorError::DivisionByZero { operation: "divide" });
    }
}

/* ------------------------ Racine carrée ------------------------ */

#[test]
fn sci_sqrt_domaine() {
    for x in valeurs() {
        let expr = format!("sqrt({x:?})");
        if x < 0.0 {
            assert_eq!(eval_err(&expr).kind(), ErrorKind::DomainError, "expr={expr:?}");
        } else {
            let v = eval_ok(&expr);
            assert!(v >= 0.0);
            assert_eq!(v, x.sqrt(), "expr={expr:?}");
        }
    }
}

/* ------------------------ Trigonométrie (degrés) ------------------------ */

#[test]
fn sci_trig_degres() {
    assert_proche("sin(30)", 0.5);
    assert_proche("cos(60)", 0.5);
    assert_proche("tan(45)", 1.0);
    assert_proche("sin(0)", 0.0);
    assert_proche("cos(0)", 1.0);
    assert_proche("sin(-30)", -0.5);
    assert_proche("sin(30)**2 + cos(30)**2", 1.0);
}

#[test]
fn sci_trig_inverse() {
    assert_proche("asin(1)", 90.0);
    assert_proche("acos(0)", 90.0);
    assert_proche("atan(1)", 45.0);
    assert_proche("asin(sin(30))", 30.0);

    assert_eq!(eval_err("asin(1.1)").kind(), ErrorKind::DomainError);
    assert_eq!(eval_err("acos(-1.0001)").kind(), ErrorKind::DomainError);
}

/* ------------------------ Factorielle ------------------------ */

#[test]
fn sci_factorielle() {
    assert_eq!(eval_ok("5!"), 120.0);
    assert_eq!(eval_ok("0!"), 1.0);
    assert!(eval_ok("170!").is_finite());

    assert_eq!(
        eval_err("171!"),
        CalculatorError::Factorial(FactorialError::TooLarge(171.0))
    );
    assert_eq!(
        eval_err("3.5!"),
        CalculatorError::Factorial(FactorialError::NonInteger(3.5))
    );
    assert_eq!(
        eval_err("factorial(-1)"),
        CalculatorError::Factorial(FactorialError::Negative(-1.0))
    );
}

/* ------------------------ Normalisation ------------------------ */

#[test]
fn sci_normalisation_idempotente() {
    for s in [
        "2 + 2",
        "(2 + 3) × 4",
        "2² + 3³",
        "sin(30) + cos(60) × tan(45)",
        "log(100) - ln(e) + π",
        "abs(-5)! + sqrt(16)³",
        "eee + e1e + 1e",
        "√(2)² ÷ 2",
        "  ((((1)))) ",
    ] {
        let n1 = normalize(s);
        assert_eq!(normalize(&n1), n1, "s={s:?}");
    }
}

/* ------------------------ Classement ------------------------ */

#[test]
fn sci_classement() {
    assert_eq!(classify("2 + 2"), OperationType::Arithmetic);
    assert_eq!(classify("sin(30)"), OperationType::Scientific);
    assert_eq!(classify("5!"), OperationType::Scientific);
}

/* ------------------------ Entrées vides ------------------------ */

#[test]
fn sci_vide() {
    assert_eq!(evaluate(""), Err(CalculatorError::EmptyExpression));
    assert_eq!(evaluate("   "), Err(CalculatorError::EmptyExpression));
    assert_eq!(normalize_and_evaluate("\t\n"), Err(CalculatorError::EmptyExpression));
}

/* ------------------------ Bout en bout ------------------------ */

#[test]
fn sci_bout_en_bout() {
    assert_eq!(eval_ok("(2 + 3) × 4"), 20.0);
    assert_eq!(eval_ok("2² + 3³"), 31.0);
}

/* ------------------------ Jamais NaN / ∞ ------------------------ */

#[test]
fn sci_jamais_non_fini() {
    for s in [
        "1e308 * 1e308",
        "-1e308 * 1e308",
        "1e308 * 1e308 - 1e308 * 1e308",
        "exp(709) * exp(709)",
        "tan(90)",
        "10 ** 308 * 10",
    ] {
        match normalize_and_evaluate(s) {
            Ok(v) => assert!(v.is_finite(), "s={s:?} v={v}"),
            Err(e) => assert!(
                matches!(
                    e.kind(),
                    ErrorKind::ResultIsInfinite | ErrorKind::ResultIsNotANumber | ErrorKind::Overflow
                ),
                "s={s:?} err={e}"
            ),
        }
    }
}
