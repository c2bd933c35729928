// src/noyau/expr.rs
//
// AST numérique (f64 IEEE-754).
// - Num   : littéral
// - Neg   : moins unaire
// - Bin   : opérateur binaire (délègue à la bibliothèque => erreurs de domaine typées)
// - Appel : fonction de la bibliothèque (déjà résolue, arité déjà vérifiée)
//
// IMPORTANT (SAFE):
// - Aucun identifiant libre dans l'arbre : tout est résolu au parse.
// - La profondeur est bornée au parse (rpn.rs).
// - Descente, affichage et libération utilisent une pile explicite : aucune
//   récursion, quelle que soit la profondeur acceptée.

use std::fmt;

use super::bibliotheque::{self, FunctionEntry};
use super::erreurs::CalculatorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl OpBinaire {
    pub fn precedence(self) -> u8 {
        match self {
            OpBinaire::Add | OpBinaire::Sub => 1,
            OpBinaire::Mul | OpBinaire::Div | OpBinaire::Mod => 2,
            OpBinaire::Pow => 4,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, OpBinaire::Pow)
    }

    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Add => "+",
            OpBinaire::Sub => "-",
            OpBinaire::Mul => "*",
            OpBinaire::Div => "/",
            OpBinaire::Mod => "%",
            OpBinaire::Pow => "**",
        }
    }

    fn appliquer(self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        match self {
            OpBinaire::Add => bibliotheque::add(a, b),
            OpBinaire::Sub => bibliotheque::subtract(a, b),
            OpBinaire::Mul => bibliotheque::multiply(a, b),
            OpBinaire::Div => bibliotheque::divide(a, b),
            OpBinaire::Mod => bibliotheque::modulo(a, b),
            OpBinaire::Pow => bibliotheque::power(a, b),
        }
    }
}

/// Précédence du moins unaire : au-dessus de * / %, sous ** (donc -2**2 = -4).
pub const PRECEDENCE_NEG: u8 = 3;

#[derive(Debug)]
pub enum Expr {
    Num(f64),
    Neg(Box<Expr>),
    Bin(OpBinaire, Box<Expr>, Box<Expr>),
    Appel(&'static FunctionEntry, Vec<Expr>),
}

/// Travail en attente pendant la descente (pile explicite, pas de récursion).
enum Tache<'a> {
    Visiter(&'a Expr),
    Neg,
    Bin(OpBinaire),
    Appel(&'static FunctionEntry, usize),
}

fn depile(valeurs: &mut Vec<f64>) -> Result<f64, CalculatorError> {
    valeurs
        .pop()
        .ok_or_else(|| CalculatorError::syntaxe("expression invalide", 0))
}

impl Expr {
    /// Descente en post-ordre : gauche puis droite, première erreur propagée.
    ///
    /// La pile d'appels ne grandit pas avec la profondeur de l'arbre : les noeuds
    /// en attente vivent dans un Vec (tas).
    pub fn evaluer(&self) -> Result<f64, CalculatorError> {
        let mut taches = vec![Tache::Visiter(self)];
        let mut valeurs: Vec<f64> = Vec::new();

        while let Some(t) = taches.pop() {
            match t {
                Tache::Visiter(Expr::Num(v)) => valeurs.push(*v),
                Tache::Visiter(Expr::Neg(x)) => {
                    taches.push(Tache::Neg);
                    taches.push(Tache::Visiter(x));
                }
                Tache::Visiter(Expr::Bin(op, a, b)) => {
                    taches.push(Tache::Bin(*op));
                    taches.push(Tache::Visiter(b));
                    taches.push(Tache::Visiter(a));
                }
                Tache::Visiter(Expr::Appel(f, args)) => {
                    taches.push(Tache::Appel(f, args.len()));
                    taches.extend(args.iter().rev().map(Tache::Visiter));
                }

                Tache::Neg => {
                    let v = depile(&mut valeurs)?;
                    valeurs.push(-v);
                }
                Tache::Bin(op) => {
                    let vb = depile(&mut valeurs)?;
                    let va = depile(&mut valeurs)?;
                    valeurs.push(op.appliquer(va, vb)?);
                }
                Tache::Appel(f, n) => {
                    if valeurs.len() < n {
                        return Err(CalculatorError::syntaxe("expression invalide", 0));
                    }
                    let args = valeurs.split_off(valeurs.len() - n);
                    valeurs.push(f.apply(&args)?);
                }
            }
        }

        match (valeurs.pop(), valeurs.is_empty()) {
            (Some(v), true) => Ok(v),
            _ => Err(CalculatorError::syntaxe("expression invalide", 0)),
        }
    }
}

/// Morceaux d'affichage en attente.
enum Ecriture<'a> {
    Noeud(&'a Expr),
    Texte(&'static str),
    Op(OpBinaire),
}

/// Affichage complètement parenthésé (démarche), sans récursion.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pile = vec![Ecriture::Noeud(self)];

        while let Some(e) = pile.pop() {
            match e {
                Ecriture::Texte(t) => f.write_str(t)?,
                Ecriture::Op(op) => write!(f, " {} ", op.symbole())?,
                Ecriture::Noeud(Expr::Num(v)) => write!(f, "{v}")?,
                Ecriture::Noeud(Expr::Neg(x)) => {
                    pile.push(Ecriture::Texte(")"));
                    pile.push(Ecriture::Noeud(x));
                    f.write_str("-(")?;
                }
                Ecriture::Noeud(Expr::Bin(op, a, b)) => {
                    pile.push(Ecriture::Texte(")"));
                    pile.push(Ecriture::Noeud(b));
                    pile.push(Ecriture::Op(*op));
                    pile.push(Ecriture::Noeud(a));
                    f.write_str("(")?;
                }
                Ecriture::Noeud(Expr::Appel(fonction, args)) => {
                    write!(f, "{}(", fonction.nom)?;
                    pile.push(Ecriture::Texte(")"));
                    for (i, a) in args.iter().enumerate().rev() {
                        pile.push(Ecriture::Noeud(a));
                        if i > 0 {
                            pile.push(Ecriture::Texte(", "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Libération sans récursion : les enfants sont détachés vers une pile.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pile: Vec<Expr> = Vec::new();
        detacher(self, &mut pile);
        while let Some(mut e) = pile.pop() {
            detacher(&mut e, &mut pile);
        }
    }
}

fn detacher(e: &mut Expr, pile: &mut Vec<Expr>) {
    match e {
        Expr::Num(_) => {}
        Expr::Neg(x) => pile.push(std::mem::replace(&mut **x, Expr::Num(0.0))),
        Expr::Bin(_, a, b) => {
            pile.push(std::mem::replace(&mut **a, Expr::Num(0.0)));
            pile.push(std::mem::replace(&mut **b, Expr::Num(0.0)));
        }
        Expr::Appel(_, args) => pile.append(args),
    }
}
