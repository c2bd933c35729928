// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Token en RPN (postfix), avec appels de fonctions n-aires
// - Puis reconstruire Expr (pile), profondeur bornée
//
// Règles:
// - Ident(name) doit être suivi de '(' et résolu dans la bibliothèque, sinon erreur
//   (pas de variables)
// - Moins unaire: opérateur préfixe Neg (précédence entre * et **)
//   => "-2**2" = -(2**2), "2**-1" = 2**(-1)
// - Plus unaire: ignoré
// - Virgule: seulement entre les arguments d'un appel
//
// NOTE:
// - Les fonctions restent sur la pile sous leur '(' et sortent avec la ')'.
// - `attend_valeur` détecte les suites invalides ("2 3", "2 +", "* 3", "2(3)").

use log::warn;

use super::bibliotheque::{self, FunctionEntry};
use super::erreurs::CalculatorError;
use super::expr::{Expr, OpBinaire, PRECEDENCE_NEG};
use super::jetons::{Tok, Token};

/// Élément de sortie (RPN).
#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Num(f64),
    Neg { position: usize },
    Bin { op: OpBinaire, position: usize },
    Appel {
        fonction: &'static FunctionEntry,
        arite: usize,
        position: usize,
    },
}

/// Pile des opérateurs en attente.
enum Attente {
    Bin(OpBinaire, usize),
    Neg(usize),
    Fonction(&'static FunctionEntry, usize),
    LPar { appel: bool, position: usize },
}

impl Attente {
    fn precedence(&self) -> Option<u8> {
        match self {
            Attente::Bin(op, _) => Some(op.precedence()),
            Attente::Neg(_) => Some(PRECEDENCE_NEG),
            Attente::Fonction(..) | Attente::LPar { .. } => None,
        }
    }

    fn vers_rpn(self) -> Option<Rpn> {
        match self {
            Attente::Bin(op, position) => Some(Rpn::Bin { op, position }),
            Attente::Neg(position) => Some(Rpn::Neg { position }),
            Attente::Fonction(..) | Attente::LPar { .. } => None,
        }
    }
}

fn op_binaire(t: &Tok) -> Option<OpBinaire> {
    match t {
        Tok::Plus => Some(OpBinaire::Add),
        Tok::Minus => Some(OpBinaire::Sub),
        Tok::Star => Some(OpBinaire::Mul),
        Tok::Slash => Some(OpBinaire::Div),
        Tok::Percent => Some(OpBinaire::Mod),
        Tok::Pow => Some(OpBinaire::Pow),
        _ => None,
    }
}

/// Dépile vers la sortie tant que la précédence l'exige (arrêt sur '(' / fonction).
fn depile_operateurs(ops: &mut Vec<Attente>, out: &mut Vec<Rpn>, op: OpBinaire) {
    let p_tok = op.precedence();
    while let Some(p_top) = ops.last().and_then(Attente::precedence) {
        let doit_pop = if op.is_right_associative() {
            p_top > p_tok
        } else {
            p_top >= p_tok
        };
        if !doit_pop {
            break;
        }
        if let Some(r) = ops.pop().and_then(Attente::vers_rpn) {
            out.push(r);
        }
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   jetons: [Ident("power"), LPar, Num(2), Comma, Num(3), RPar, Star, Num(4)]
///   rpn:    [Num(2), Num(3), Appel(power/2), Num(4), Bin(Mul)]
pub fn to_rpn(tokens: &[Token]) -> Result<Vec<Rpn>, CalculatorError> {
    let mut out: Vec<Rpn> = Vec::new();
    let mut ops: Vec<Attente> = Vec::new();
    // nombre d'arguments de chaque appel ouvert
    let mut arites: Vec<usize> = Vec::new();

    let mut attend_valeur = true;
    let mut precedent: Option<&Tok> = None;

    for (idx, t) in tokens.iter().enumerate() {
        let pos = t.position;

        match &t.tok {
            Tok::Num(v) => {
                if !attend_valeur {
                    return Err(CalculatorError::syntaxe("opérateur manquant avant un nombre", pos));
                }
                out.push(Rpn::Num(*v));
                attend_valeur = false;
            }

            Tok::Ident(name) => {
                if !attend_valeur {
                    return Err(CalculatorError::syntaxe(
                        format!("opérateur manquant avant '{name}'"),
                        pos,
                    ));
                }
                let fonction = bibliotheque::lookup(name).ok_or_else(|| {
                    CalculatorError::UnknownIdentifier {
                        nom: name.clone(),
                        position: pos,
                    }
                })?;
                let suivi_par_lpar = matches!(tokens.get(idx + 1).map(|n| &n.tok), Some(Tok::LPar));
                if !suivi_par_lpar {
                    return Err(CalculatorError::syntaxe(
                        format!("la fonction '{name}' doit être suivie de '('"),
                        pos,
                    ));
                }
                ops.push(Attente::Fonction(fonction, pos));
            }

            Tok::LPar => {
                if !attend_valeur {
                    return Err(CalculatorError::syntaxe(
                        "multiplication implicite non supportée avant '('",
                        pos,
                    ));
                }
                let appel = matches!(ops.last(), Some(Attente::Fonction(..)))
                    && matches!(precedent, Some(Tok::Ident(_)));
                if appel {
                    arites.push(1);
                }
                ops.push(Attente::LPar {
                    appel,
                    position: pos,
                });
            }

            Tok::Comma => {
                if attend_valeur {
                    return Err(CalculatorError::syntaxe("argument manquant avant ','", pos));
                }
                loop {
                    match ops.last() {
                        Some(Attente::LPar { appel: true, .. }) => break,
                        Some(Attente::LPar { appel: false, .. }) | None => {
                            return Err(CalculatorError::syntaxe(
                                "virgule hors d'un appel de fonction",
                                pos,
                            ));
                        }
                        Some(_) => {
                            if let Some(r) = ops.pop().and_then(Attente::vers_rpn) {
                                out.push(r);
                            }
                        }
                    }
                }
                if let Some(n) = arites.last_mut() {
                    *n += 1;
                }
                attend_valeur = true;
            }

            Tok::RPar => {
                let vide = matches!(precedent, Some(Tok::LPar));
                if attend_valeur && !vide {
                    return Err(CalculatorError::syntaxe("expression attendue avant ')'", pos));
                }

                // dépile jusqu'à '('
                let appel = loop {
                    match ops.pop() {
                        Some(Attente::LPar { appel, .. }) => break appel,
                        Some(autre) => {
                            if let Some(r) = autre.vers_rpn() {
                                out.push(r);
                            }
                        }
                        None => {
                            return Err(CalculatorError::syntaxe(
                                "parenthèse fermante sans ouvrante",
                                pos,
                            ));
                        }
                    }
                };

                if appel {
                    let mut arite = arites.pop().unwrap_or(0);
                    if vide {
                        arite = 0;
                    }
                    match ops.pop() {
                        Some(Attente::Fonction(fonction, position)) => out.push(Rpn::Appel {
                            fonction,
                            arite,
                            position,
                        }),
                        _ => {
                            return Err(CalculatorError::syntaxe("appel de fonction incohérent", pos));
                        }
                    }
                } else if vide {
                    return Err(CalculatorError::syntaxe("parenthèses vides", pos));
                }

                attend_valeur = false;
            }

            Tok::Plus | Tok::Minus if attend_valeur => {
                // signe unaire : '-' => Neg (préfixe, ne dépile rien) ; '+' => ignoré
                if t.tok == Tok::Minus {
                    ops.push(Attente::Neg(pos));
                }
            }

            tok => {
                let op = op_binaire(tok).ok_or_else(|| {
                    CalculatorError::syntaxe(format!("jeton inattendu '{}'", t.lexeme), pos)
                })?;
                if attend_valeur {
                    return Err(CalculatorError::syntaxe(
                        format!("opérande manquante avant '{}'", t.lexeme),
                        pos,
                    ));
                }
                depile_operateurs(&mut ops, &mut out, op);
                ops.push(Attente::Bin(op, pos));
                attend_valeur = true;
            }
        }

        precedent = Some(&t.tok);
    }

    if attend_valeur {
        let fin = tokens.last().map(|t| t.position + t.lexeme.chars().count()).unwrap_or(0);
        return Err(CalculatorError::syntaxe("expression incomplète", fin));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match op {
            Attente::LPar { position, .. } => {
                return Err(CalculatorError::syntaxe("parenthèses non fermées", position));
            }
            autre => {
                if let Some(r) = autre.vers_rpn() {
                    out.push(r);
                }
            }
        }
    }

    Ok(out)
}

/// Construit une Expr à partir d'une RPN.
///
/// - vérifie l'arité de chaque appel
/// - refuse un arbre plus profond que `profondeur_max`
pub fn from_rpn(rpn: &[Rpn], profondeur_max: usize) -> Result<Expr, CalculatorError> {
    // (noeud, profondeur)
    let mut st: Vec<(Expr, usize)> = Vec::new();

    let trop_profond = |d: usize, position: usize| -> Result<(), CalculatorError> {
        if d > profondeur_max {
            warn!("expression refusée : profondeur {d} > {profondeur_max}");
            return Err(CalculatorError::syntaxe(
                format!("expression trop imbriquée (profondeur > {profondeur_max})"),
                position,
            ));
        }
        Ok(())
    };

    for r in rpn {
        match r {
            Rpn::Num(v) => st.push((Expr::Num(*v), 1)),

            Rpn::Neg { position } => {
                let (x, d) = st
                    .pop()
                    .ok_or_else(|| CalculatorError::syntaxe("expression invalide", *position))?;
                trop_profond(d + 1, *position)?;
                st.push((Expr::Neg(Box::new(x)), d + 1));
            }

            Rpn::Bin { op, position } => {
                let (b, db) = st
                    .pop()
                    .ok_or_else(|| CalculatorError::syntaxe("expression invalide", *position))?;
                let (a, da) = st
                    .pop()
                    .ok_or_else(|| CalculatorError::syntaxe("expression invalide", *position))?;
                let d = da.max(db) + 1;
                trop_profond(d, *position)?;
                st.push((Expr::Bin(*op, Box::new(a), Box::new(b)), d));
            }

            Rpn::Appel {
                fonction,
                arite,
                position,
            } => {
                if *arite != fonction.arite() {
                    return Err(CalculatorError::syntaxe(
                        format!(
                            "la fonction '{}' attend {} argument(s), reçu {}",
                            fonction.nom,
                            fonction.arite(),
                            arite
                        ),
                        *position,
                    ));
                }
                if st.len() < *arite {
                    return Err(CalculatorError::syntaxe("expression invalide", *position));
                }
                let args: Vec<(Expr, usize)> = st.split_off(st.len() - arite);
                let d = args.iter().map(|(_, d)| *d).max().unwrap_or(0) + 1;
                trop_profond(d, *position)?;
                let args = args.into_iter().map(|(e, _)| e).collect();
                st.push((Expr::Appel(fonction, args), d));
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        _ => Err(CalculatorError::syntaxe("expression invalide", 0)),
    }
}

/// Format utilitaire (démarche) : RPN en texte.
pub fn format_rpn(rpn: &[Rpn]) -> String {
    rpn.iter()
        .map(|r| match r {
            Rpn::Num(v) => format!("{v}"),
            Rpn::Neg { .. } => "neg".to_string(),
            Rpn::Bin { op, .. } => op.symbole().to_string(),
            Rpn::Appel { fonction, arite, .. } => format!("{}/{}", fonction.nom, arite),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
