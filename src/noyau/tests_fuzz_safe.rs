//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariants clés :
//!   - jamais de panique, jamais de NaN / ∞ rendu
//!   - normalize(normalize(s)) == normalize(s)
//!   - même entrée => même sortie

use std::time::{Duration, Instant};

use super::reglages::{PROFONDEUR_DEFAUT, PROFONDEUR_MAX};
use super::{
    eval_expression, normalize, normalize_and_evaluate, normalize_and_evaluate_with,
    CalculatorError, ErrorKind, Reglages,
};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants ------------------------ */

fn check_resultat(expr: &str, r: &Result<f64, CalculatorError>) {
    match r {
        Ok(v) => assert!(v.is_finite(), "résultat non fini: expr={expr:?} v={v}"),
        Err(e) => assert!(!e.to_string().is_empty(), "message vide: expr={expr:?}"),
    }
}

fn check_idempotence(expr: &str) {
    let n1 = normalize(expr);
    assert_eq!(normalize(&n1), n1, "normalisation non idempotente: expr={expr:?}");
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(8) {
        0 => "0".to_string(),
        1 => "1".to_string(),
        2 => "2.5".to_string(),
        3 => "30".to_string(),
        4 => "45".to_string(),
        5 => "1e3".to_string(),
        6 => "0.5".to_string(),
        _ => "7".to_string(),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "π".to_string(),
        4 => "e".to_string(),
        5 => format!("{}²", gen_nombre(rng)),
        _ => format!("{}!", rng.pick(8)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    const FONCTIONS: &[&str] = &[
        "sin", "cos", "tan", "asin", "acos", "atan", "log", "ln", "sqrt", "cbrt", "abs", "exp",
    ];
    const OPS: &[&str] = &["+", "-", "×", "÷", "*", "/", "**", "%"];

    match rng.pick(6) {
        0 => gen_atom(rng),
        1 | 2 => {
            let op = OPS[rng.pick(OPS.len() as u32) as usize];
            format!(
                "({} {op} {})",
                gen_expr(rng, depth - 1),
                gen_expr(rng, depth - 1)
            )
        }
        3 | 4 => {
            let f = FONCTIONS[rng.pick(FONCTIONS.len() as u32) as usize];
            format!("{f}({})", gen_expr(rng, depth - 1))
        }
        _ => {
            if rng.coin() {
                format!("-{}", gen_expr(rng, depth - 1))
            } else {
                format!("({})³", gen_expr(rng, depth - 1))
            }
        }
    }
}

/// Bruit : texte quelconque construit à partir de fragments (syntaxe souvent invalide).
fn gen_bruit(rng: &mut Rng) -> String {
    const FRAGMENTS: &[&str] = &[
        "(", ")", ",", "+", "-", "*", "**", "/", "^", "%", "!", "²", "³", "π", "e", "×", "÷", "√",
        "sin", "log", "x", "foo", "1", "2.", ".5", "1e", "1e-2", " ", "pow", "E", "Pi", "@",
    ];
    let n = 1 + rng.pick(12) as usize;
    (0..n)
        .map(|_| FRAGMENTS[rng.pick(FRAGMENTS.len() as u32) as usize])
        .collect()
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_invariants() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        check_idempotence(&expr);

        let r1 = normalize_and_evaluate(&expr);
        check_resultat(&expr, &r1);

        // même entrée => même sortie
        let r2 = normalize_and_evaluate(&expr);
        assert_eq!(r1, r2, "non déterministe: expr={expr:?}");

        match r1 {
            Ok(_) => seen_ok += 1,
            Err(_) => seen_err += 1,
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne "balaye" rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop \"sage\"");
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..500 {
        budget(t0, max);

        let s = gen_bruit(&mut rng);
        check_idempotence(&s);
        check_resultat(&s, &normalize_and_evaluate(&s));
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = somme_balancee("1/2", 800);
    let v = normalize_and_evaluate(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(v, 400.0);
}

#[test]
fn fuzz_safe_somme_plate_acceptee() {
    // profondeur ~900 < profondeur par défaut
    let expr = vec!["1"; 900].join(" + ");
    assert_eq!(normalize_and_evaluate(&expr).unwrap(), 900.0);
}

#[test]
fn fuzz_safe_imbrication_pathologique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    // parenthèses seules : pas de noeud ajouté
    let parens = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
    assert_eq!(normalize_and_evaluate(&parens).unwrap(), 1.0);
    budget(t0, max);

    // moins unaires / appels en cascade : refusés proprement (pas de débordement de pile)
    let negs = format!("{}1", "-".repeat(50_000));
    assert_eq!(
        normalize_and_evaluate(&negs).unwrap_err().kind(),
        ErrorKind::SyntaxError
    );
    budget(t0, max);

    let appels = format!("{}4{}", "sqrt(".repeat(5000), ")".repeat(5000));
    assert_eq!(
        normalize_and_evaluate(&appels).unwrap_err().kind(),
        ErrorKind::SyntaxError
    );
    budget(t0, max);

    // parenthèses non fermées très profondes
    let ouvertes = "(".repeat(10_000) + "1";
    assert_eq!(
        normalize_and_evaluate(&ouvertes).unwrap_err().kind(),
        ErrorKind::SyntaxError
    );
}

fn appels_imbriques(n: usize) -> String {
    format!("{}4{}", "abs(".repeat(n), ")".repeat(n))
}

#[test]
fn fuzz_safe_appels_juste_sous_la_borne_par_defaut() {
    // n appels + la feuille = profondeur n + 1
    let expr = appels_imbriques(PROFONDEUR_DEFAUT - 1);

    assert_eq!(normalize_and_evaluate(&expr), Ok(4.0));

    let (c, d) = eval_expression(&expr, &Reglages::default()).unwrap();
    assert_eq!(c.resultat, 4.0);
    assert!(d.arbre.starts_with("absolute(absolute("));

    // un cran de plus : refusé
    let trop = appels_imbriques(PROFONDEUR_DEFAUT);
    assert_eq!(
        normalize_and_evaluate(&trop).unwrap_err().kind(),
        ErrorKind::SyntaxError
    );
}

#[test]
fn fuzz_safe_appels_juste_sous_la_borne_max() {
    let mut r = Reglages::default();
    r.set_profondeur_max(PROFONDEUR_MAX);
    let expr = appels_imbriques(PROFONDEUR_MAX - 1);

    assert_eq!(normalize_and_evaluate_with(&expr, &r), Ok(4.0));

    let (c, d) = eval_expression(&expr, &r).unwrap();
    assert_eq!(c.resultat, 4.0);
    assert!(d.arbre.ends_with("(4))"));

    // même profondeur en moins unaires et en puissances emboîtées
    let negs = format!("{}4", "-".repeat(PROFONDEUR_MAX - 1));
    assert_eq!(normalize_and_evaluate_with(&negs, &r), Ok(-4.0));

    let k = PROFONDEUR_MAX / 2 - 1;
    let pow = format!("{}1{}", "1 ** (".repeat(k), ")".repeat(k));
    assert_eq!(normalize_and_evaluate_with(&pow, &r), Ok(1.0));
}
