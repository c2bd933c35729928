// src/noyau/normalisation.rs
//
// Normalisation : texte "humain" -> forme canonique
// -------------------------------------------------
// On découpe d'abord le texte en morceaux (nombre / identifiant / espace / symbole),
// puis on applique des passes dans un ordre fixe. Les remplacements portent sur des
// morceaux ENTIERS, jamais sur des sous-chaînes : "exp", "sec" ou "1e5" restent intacts.
//
// Passes (l'ordre compte) :
// 1) trim
// 2) symboles : × -> *, ÷ -> /, − -> -, √ -> sqrt
// 3) constantes : π, pi, e -> développement décimal (f64)
// 4) noms de fonctions suivis de '(' -> noms de la bibliothèque (sin -> sin_deg, log -> log10, ...)
// 5) suffixes : n² -> n**2, n³ -> n**3, n! -> factorial(n)  (aussi après ')')
// 6) collage : espace entre deux morceaux "mots" adjacents (sinon "2π" deviendrait 23.14…)
//
// Totale (jamais d'erreur) et idempotente : normalize(normalize(s)) == normalize(s).

use std::f64::consts::{E, PI};

use super::jetons::{debut_ident, longueur_nombre, suite_ident};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Morceau {
    Nombre(String),
    Ident(String),
    Espace(String),
    Symbole(char),
}

impl Morceau {
    // un '.' isolé compte comme un mot : collé à un nombre, il serait relu autrement
    fn est_mot(&self) -> bool {
        matches!(
            self,
            Morceau::Nombre(_) | Morceau::Ident(_) | Morceau::Symbole('.')
        )
    }

    fn pousser_dans(&self, out: &mut String) {
        match self {
            Morceau::Nombre(s) | Morceau::Ident(s) | Morceau::Espace(s) => out.push_str(s),
            Morceau::Symbole(c) => out.push(*c),
        }
    }
}

/// Renommage des fonctions "humaines" vers la bibliothèque (mode degrés).
const RENOMMAGES: &[(&str, &str)] = &[
    ("sin", "sin_deg"),
    ("cos", "cos_deg"),
    ("tan", "tan_deg"),
    ("asin", "asin_deg"),
    ("acos", "acos_deg"),
    ("atan", "atan_deg"),
    ("log", "log10"),
    ("ln", "ln"),
    ("sqrt", "sqrt"),
    ("cbrt", "cbrt"),
    ("abs", "absolute"),
    ("exp", "exp"),
    ("pow", "power"),
];

/// Découpe (totale) : identifiants en minuscules, le reste tel quel.
pub(crate) fn decouper(s: &str) -> Vec<Morceau> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            let start = i;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            out.push(Morceau::Espace(chars[start..i].iter().collect()));
            continue;
        }

        if debut_ident(c) {
            let start = i;
            i += 1;
            while i < chars.len() && suite_ident(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Morceau::Ident(word.to_lowercase()));
            continue;
        }

        let n = longueur_nombre(&chars, i);
        if n > 0 {
            out.push(Morceau::Nombre(chars[i..i + n].iter().collect()));
            i += n;
            continue;
        }

        out.push(Morceau::Symbole(c));
        i += 1;
    }

    out
}

/* ------------------------ Passes ------------------------ */

fn passe_symboles(m: Morceau) -> Morceau {
    match m {
        Morceau::Symbole('×') => Morceau::Symbole('*'),
        Morceau::Symbole('÷') => Morceau::Symbole('/'),
        Morceau::Symbole('−') => Morceau::Symbole('-'),
        Morceau::Symbole('√') => Morceau::Ident("sqrt".to_string()),
        autre => autre,
    }
}

fn passe_constantes(m: Morceau) -> Morceau {
    match &m {
        Morceau::Symbole('π') => Morceau::Nombre(format!("{PI}")),
        Morceau::Ident(w) if w == "pi" => Morceau::Nombre(format!("{PI}")),
        Morceau::Ident(w) if w == "e" => Morceau::Nombre(format!("{E}")),
        _ => m,
    }
}

fn passe_fonctions(morceaux: &mut [Morceau]) {
    for i in 0..morceaux.len() {
        let Morceau::Ident(w) = &morceaux[i] else {
            continue;
        };
        let Some((_, canon)) = RENOMMAGES.iter().find(|(h, _)| *h == w.as_str()) else {
            continue;
        };
        // suivi (espaces permis) d'une parenthèse ouvrante
        let appel = morceaux[i + 1..]
            .iter()
            .find(|m| !matches!(m, Morceau::Espace(_)))
            .is_some_and(|m| *m == Morceau::Symbole('('));
        if appel {
            morceaux[i] = Morceau::Ident((*canon).to_string());
        }
    }
}

/// Sortie de la passe "suffixes".
///
/// Les "factorial(" ne sont pas insérés physiquement : on compte, pour chaque
/// morceau, combien d'ouvertures le précèdent, et on déplie à la fin.
/// Chaque ')' retient le début du groupe qu'elle ferme. Ainsi "n!!!…" reste linéaire.
#[derive(Default)]
struct SortieSuffixes {
    morceaux: Vec<Morceau>,
    ouvertures: Vec<usize>,
    debuts: Vec<Option<usize>>,
    ouvrantes: Vec<usize>,
}

impl SortieSuffixes {
    fn pousser(&mut self, m: Morceau) {
        let debut = match m {
            Morceau::Symbole('(') => {
                self.ouvrantes.push(self.morceaux.len());
                None
            }
            // la '(' correspondante, ou le nom de fonction qui la précède immédiatement
            Morceau::Symbole(')') => self.ouvrantes.pop().map(|j| {
                match j.checked_sub(1).map(|k| &self.morceaux[k]) {
                    Some(Morceau::Ident(_)) => j - 1,
                    _ => j,
                }
            }),
            _ => None,
        };
        self.morceaux.push(m);
        self.ouvertures.push(0);
        self.debuts.push(debut);
    }

    fn derniere_valeur(&self) -> bool {
        matches!(
            self.morceaux.last(),
            Some(Morceau::Nombre(_)) | Some(Morceau::Symbole(')'))
        )
    }

    /// Début de la valeur qui finit en dernière position (nombre ou groupe complet).
    fn debut_valeur(&self) -> Option<usize> {
        match self.morceaux.last() {
            Some(Morceau::Nombre(_)) => Some(self.morceaux.len() - 1),
            Some(Morceau::Symbole(')')) => self.debuts.last().copied().flatten(),
            _ => None,
        }
    }

    /// x -> factorial(x), x commençant en `debut`.
    fn envelopper(&mut self, debut: usize) {
        self.ouvertures[debut] += 1;
        self.morceaux.push(Morceau::Symbole(')'));
        self.ouvertures.push(0);
        self.debuts.push(Some(debut));
    }

    fn deplier(self) -> Vec<Morceau> {
        let n = self.morceaux.len() + 2 * self.ouvertures.iter().sum::<usize>();
        let mut out = Vec::with_capacity(n);
        for (m, k) in self.morceaux.into_iter().zip(self.ouvertures) {
            for _ in 0..k {
                out.push(Morceau::Ident("factorial".to_string()));
                out.push(Morceau::Symbole('('));
            }
            out.push(m);
        }
        out
    }
}

fn passe_suffixes(morceaux: Vec<Morceau>) -> Vec<Morceau> {
    let mut sortie = SortieSuffixes::default();

    for m in morceaux {
        let exposant = match m {
            Morceau::Symbole('²') => Some("2"),
            Morceau::Symbole('³') => Some("3"),
            _ => None,
        };

        if let (Some(n), true) = (exposant, sortie.derniere_valeur()) {
            sortie.pousser(Morceau::Symbole('*'));
            sortie.pousser(Morceau::Symbole('*'));
            sortie.pousser(Morceau::Nombre(n.to_string()));
            continue;
        }

        if m == Morceau::Symbole('!') {
            if let Some(d) = sortie.debut_valeur() {
                sortie.envelopper(d);
                continue;
            }
        }

        sortie.pousser(m);
    }

    sortie.deplier()
}

fn passe_collage(morceaux: Vec<Morceau>) -> Vec<Morceau> {
    let mut sortie: Vec<Morceau> = Vec::with_capacity(morceaux.len());
    for m in morceaux {
        if m.est_mot() && sortie.last().is_some_and(Morceau::est_mot) {
            sortie.push(Morceau::Espace(" ".to_string()));
        }
        sortie.push(m);
    }
    sortie
}

/// Texte -> forme canonique. Pure et totale.
pub fn normalize(text: &str) -> String {
    let morceaux = decouper(text.trim());

    let mut morceaux: Vec<Morceau> = morceaux
        .into_iter()
        .map(passe_symboles)
        .map(passe_constantes)
        .collect();
    passe_fonctions(&mut morceaux);
    let morceaux = passe_collage(passe_suffixes(morceaux));

    let mut out = String::with_capacity(text.len());
    for m in &morceaux {
        m.pousser_dans(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::normalize;

    #[test]
    fn symboles() {
        assert_eq!(normalize("2 × 3"), "2 * 3");
        assert_eq!(normalize("10 ÷ 2"), "10 / 2");
        assert_eq!(normalize("5 − 1"), "5 - 1");
        assert_eq!(normalize("  (2 + 3) × 4  "), "(2 + 3) * 4");
    }

    #[test]
    fn constantes() {
        assert_eq!(normalize("π"), "3.141592653589793");
        assert_eq!(normalize("e"), "2.718281828459045");
        assert_eq!(normalize("PI * 2"), "3.141592653589793 * 2");
        assert_eq!(normalize("2*e"), "2*2.718281828459045");
    }

    #[test]
    fn constantes_sur_jetons_entiers() {
        // aucun "e" à l'intérieur d'un mot ou d'un nombre n'est touché
        assert_eq!(normalize("exp(1)"), "exp(1)");
        assert_eq!(normalize("1e5 + 2"), "1e5 + 2");
        assert_eq!(normalize("sec(1)"), "sec(1)");
        assert_eq!(normalize("log(e)"), "log10(2.718281828459045)");
    }

    #[test]
    fn constante_collee_a_un_nombre() {
        // pas de multiplication implicite : on sépare, l'évaluateur refusera
        assert_eq!(normalize("2π"), "2 3.141592653589793");
        assert_eq!(normalize("2e"), "2 2.718281828459045");
    }

    #[test]
    fn fonctions() {
        assert_eq!(normalize("sin(30)"), "sin_deg(30)");
        assert_eq!(normalize("cos(60)"), "cos_deg(60)");
        assert_eq!(normalize("asin(1)"), "asin_deg(1)");
        assert_eq!(normalize("sqrt(16)"), "sqrt(16)");
        assert_eq!(normalize("log(100)"), "log10(100)");
        assert_eq!(normalize("ln(2.718)"), "ln(2.718)");
        assert_eq!(normalize("abs(-5)"), "absolute(-5)");
        assert_eq!(normalize("pow(2, 3)"), "power(2, 3)");
        assert_eq!(normalize("SIN ( 30 )"), "sin_deg ( 30 )");
        assert_eq!(normalize("√(16)"), "sqrt(16)");
        // sans parenthèse : inchangé
        assert_eq!(normalize("sin"), "sin");
    }

    #[test]
    fn suffixes() {
        assert_eq!(normalize("2²"), "2**2");
        assert_eq!(normalize("3³"), "3**3");
        assert_eq!(normalize("5!"), "factorial(5)");
        assert_eq!(normalize("2² + 3³"), "2**2 + 3**3");
        assert_eq!(normalize("3.5!"), "factorial(3.5)");
        assert_eq!(normalize("π²"), "3.141592653589793**2");
        assert_eq!(normalize("5!!"), "factorial(factorial(5))");
    }

    #[test]
    fn suffixes_apres_parenthese() {
        assert_eq!(normalize("(2+3)²"), "(2+3)**2");
        assert_eq!(normalize("(2+3)!"), "factorial((2+3))");
        assert_eq!(normalize("sqrt(4)!"), "factorial(sqrt(4))");
        assert_eq!(normalize("1 + (2*(1+1))!"), "1 + factorial((2*(1+1)))");
    }

    #[test]
    fn factorielles_en_cascade_lineaires() {
        let t0 = Instant::now();

        let n = 20_000;
        let s = format!("(1){}", "!".repeat(n));
        let canon = normalize(&s);
        assert!(t0.elapsed() < Duration::from_millis(1500), "{:?}", t0.elapsed());

        assert_eq!(canon, format!("{}(1){}", "factorial(".repeat(n), ")".repeat(n)));

        let canon = normalize("sqrt(2)!! + 3!!");
        assert_eq!(
            canon,
            "factorial(factorial(sqrt(2))) + factorial(factorial(3))"
        );
        assert_eq!(normalize("(1!)!"), "factorial((factorial(1)))");
        assert_eq!(normalize("5!²"), "factorial(5)**2");
    }

    #[test]
    fn suffixe_orphelin_inchange() {
        assert_eq!(normalize("!5"), "!5");
        assert_eq!(normalize("2 ²"), "2 ²");
        assert_eq!(normalize(")!"), ")!");
    }

    #[test]
    fn idempotence_exemples() {
        for s in [
            "2 × 3",
            "sin(30) + cos(60)",
            "2π",
            "e^2",
            "5! + (2+3)² - √(9)",
            "log(100) ÷ ln(e)",
            "  abs(-3)³ ",
            "SQRT(16) + Pi",
            "1.5.3 e.",
            "1². e",
            ".π",
            "",
        ] {
            let n1 = normalize(s);
            assert_eq!(normalize(&n1), n1, "s={s:?}");
        }
    }
}
