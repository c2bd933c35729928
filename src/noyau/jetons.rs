// src/noyau/jetons.rs

use super::erreurs::CalculatorError;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Noms de fonctions (la résolution dans la bibliothèque se fait au parse)
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow, // ** ou ^

    LPar,
    RPar,
    Comma,
}

/// Jeton + lexème d'origine + position (index de caractère) pour les erreurs.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub tok: Tok,
    pub lexeme: String,
    pub position: usize,
}

/// Longueur (en caractères) du nombre qui commence en `i`, 0 si aucun.
///
/// Formes acceptées : `12`, `1.5`, `.5`, `2.`, `1e-3`, `2.5E+4`.
/// L'exposant n'est consommé que s'il est suivi d'au moins un chiffre
/// (`2e` = nombre `2` puis identifiant `e`).
pub fn longueur_nombre(chars: &[char], i: usize) -> usize {
    let mut j = i;
    let mut chiffres = 0usize;

    while j < chars.len() && chars[j].is_ascii_digit() {
        j += 1;
        chiffres += 1;
    }
    if j < chars.len() && chars[j] == '.' {
        j += 1;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
            chiffres += 1;
        }
    }
    if chiffres == 0 {
        return 0;
    }

    // exposant optionnel
    if j < chars.len() && (chars[j] == 'e' || chars[j] == 'E') {
        let mut k = j + 1;
        if k < chars.len() && (chars[k] == '+' || chars[k] == '-') {
            k += 1;
        }
        if k < chars.len() && chars[k].is_ascii_digit() {
            while k < chars.len() && chars[k].is_ascii_digit() {
                k += 1;
            }
            j = k;
        }
    }

    j - i
}

/// Début d'identifiant : [a-zA-Z_]
pub fn debut_ident(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Suite d'identifiant : [a-zA-Z0-9_]
pub fn suite_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize la forme canonique en jetons.
/// Supporte:
/// - nombres décimaux / notation scientifique (f64 IEEE-754)
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (sensibles à la casse)
/// - opérateurs + - * / % ** ^
/// - parenthèses ( ) et virgule
pub fn tokenize(s: &str) -> Result<Vec<Token>, CalculatorError> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Comma),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            '^' => Some(Tok::Pow),
            _ => None,
        };
        if let Some(tok) = simple {
            out.push(Token {
                tok,
                lexeme: c.to_string(),
                position: i,
            });
            i += 1;
            continue;
        }

        // '*' ou '**'
        if c == '*' {
            let (tok, lexeme, n) = if chars.get(i + 1) == Some(&'*') {
                (Tok::Pow, "**", 2)
            } else {
                (Tok::Star, "*", 1)
            };
            out.push(Token {
                tok,
                lexeme: lexeme.to_string(),
                position: i,
            });
            i += n;
            continue;
        }

        if debut_ident(c) {
            let start = i;
            i += 1;
            while i < chars.len() && suite_ident(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Token {
                tok: Tok::Ident(word.clone()),
                lexeme: word,
                position: start,
            });
            continue;
        }

        let n = longueur_nombre(&chars, i);
        if n > 0 {
            let lexeme: String = chars[i..i + n].iter().collect();
            let v: f64 = lexeme
                .parse()
                .map_err(|_| CalculatorError::syntaxe(format!("nombre invalide '{lexeme}'"), i))?;
            out.push(Token {
                tok: Tok::Num(v),
                lexeme,
                position: i,
            });
            i += n;
            continue;
        }

        return Err(CalculatorError::syntaxe(
            format!("caractère inattendu: '{c}'"),
            i,
        ));
    }

    Ok(out)
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.lexeme.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
