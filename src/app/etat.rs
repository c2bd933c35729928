//! src/app/etat.rs
//!
//! État UI (sans vue, sans évaluation).
//!
//! Rôle : contenir l'état de la calculatrice (entrée, dernier résultat, erreur, démarche,
//! mémoire, historique de session, mode, réglages) et offrir des opérations simples
//! sans logique d'affichage.
//!
//! Contrats :
//! - Aucune évaluation ici : le noyau est appelé par la vue, l'état reçoit le `Calcul`.
//! - Actions déterministes, sans effet de bord caché.
//! - Historique borné (HISTORIQUE_MAX), le plus récent en tête.

use chrono::{DateTime, Local};

use calculatrice_sci::noyau::{Calcul, DemarcheNoyau, OperationType, Reglages};

/// Nombre maximal d'entrées conservées dans l'historique de session.
pub const HISTORIQUE_MAX: usize = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct EntreeHistorique {
    pub id: u64,
    pub expression: String,
    pub resultat: f64,
    pub type_operation: OperationType,
    pub horodatage: DateTime<Local>,
}

/// Manière d'insérer un morceau de texte dans l'entrée (espaces automatiques).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    Chiffre,
    Mot,
    Fonction,
    Op,
    OuvrePar,
    FermePar,
    Suffixe,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub resultat: String, // dernier résultat affiché
    pub dernier_resultat: Option<f64>,
    pub type_operation: Option<OperationType>,
    pub erreur: String,

    // --- démarche (panneau d'explication) ---
    pub demarche: DemarcheNoyau,

    // --- mémoire (MC / MR / M+ / M-) ---
    pub memoire: f64,

    // --- historique de session ---
    pub historique: Vec<EntreeHistorique>,
    prochain_id: u64,

    // --- paramètres ---
    pub mode_scientifique: bool,
    pub reglages: Reglages,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l'entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::avec_reglages(Reglages::default())
    }
}

impl AppCalc {
    pub fn avec_reglages(reglages: Reglages) -> Self {
        Self {
            entree: String::new(),
            resultat: String::new(),
            dernier_resultat: None,
            type_operation: None,
            erreur: String::new(),
            demarche: DemarcheNoyau::default(),
            memoire: 0.0,
            historique: Vec::new(),
            prochain_id: 1,
            mode_scientifique: false,
            reglages,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }

    /* ------------------------ Actions "boutons" (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + mémoire). L'historique reste.
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.memoire = 0.0;
        self.focus_entree = true;
    }

    /// C : effacer seulement l'entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultat + erreur + démarche (sans toucher à l'entrée).
    pub fn clear_resultats(&mut self) {
        self.resultat.clear();
        self.dernier_resultat = None;
        self.type_operation = None;
        self.erreur.clear();
        self.demarche = DemarcheNoyau::default();
        self.focus_entree = true;
    }

    /// Place une erreur. Le dernier résultat reste affiché, la démarche est coupée.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.demarche = DemarcheNoyau::default();
        self.focus_entree = true;
    }

    /// Dépose un calcul réussi : résultat, type, démarche, et une entrée d'historique
    /// horodatée (l'heure est fournie par l'appelant).
    pub fn set_resultat(
        &mut self,
        calcul: Calcul,
        demarche: DemarcheNoyau,
        horodatage: DateTime<Local>,
    ) {
        self.erreur.clear();
        self.resultat = format_resultat(calcul.resultat);
        self.dernier_resultat = Some(calcul.resultat);
        self.type_operation = Some(calcul.type_operation);
        self.demarche = demarche;
        self.ajouter_historique(calcul, horodatage);
        self.focus_entree = true;
    }

    /* ------------------------ Historique ------------------------ */

    fn ajouter_historique(&mut self, calcul: Calcul, horodatage: DateTime<Local>) {
        let entree = EntreeHistorique {
            id: self.prochain_id,
            expression: calcul.expression,
            resultat: calcul.resultat,
            type_operation: calcul.type_operation,
            horodatage,
        };
        self.prochain_id += 1;

        self.historique.insert(0, entree);
        self.historique.truncate(HISTORIQUE_MAX);
    }

    /// Remet l'expression d'une entrée dans le champ de saisie.
    pub fn reprendre_historique(&mut self, id: u64) -> bool {
        let Some(h) = self.historique.iter().find(|h| h.id == id) else {
            return false;
        };
        self.entree = h.expression.clone();
        self.focus_entree = true;
        true
    }

    pub fn supprimer_historique(&mut self, id: u64) -> bool {
        let avant = self.historique.len();
        self.historique.retain(|h| h.id != id);
        self.historique.len() != avant
    }

    pub fn vider_historique(&mut self) {
        self.historique.clear();
    }

    /* ------------------------ Mémoire ------------------------ */

    /// MC
    pub fn memoire_effacer(&mut self) {
        self.memoire = 0.0;
    }

    /// MR : insère la valeur mémorisée dans l'entrée ; négative => "(-3)".
    pub fn memoire_rappeler(&mut self) {
        let texte = if self.memoire < 0.0 {
            format!("({})", format_resultat(self.memoire))
        } else {
            format_resultat(self.memoire)
        };
        self.inserer(&texte, Insertion::Mot);
    }

    /// M+ (sans effet s'il n'y a pas encore de résultat)
    pub fn memoire_ajouter(&mut self) {
        if let Some(v) = self.dernier_resultat {
            self.memoire += v;
        }
    }

    /// M-
    pub fn memoire_soustraire(&mut self) {
        if let Some(v) = self.dernier_resultat {
            self.memoire -= v;
        }
    }

    /* ------------------------ Édition de l'entrée ------------------------ */

    /// ± : "-(x)" <-> "x"
    pub fn negation_entree(&mut self) {
        let s = self.entree.trim();
        if s.is_empty() {
            return;
        }
        self.entree = match s.strip_prefix('-') {
            Some(reste) if entre_parentheses(reste) => reste[1..reste.len() - 1].to_string(),
            _ => format!("-({s})"),
        };
        self.focus_entree = true;
    }

    /// 1/x : "1/(x)"
    pub fn inverse_entree(&mut self) {
        let s = self.entree.trim();
        if s.is_empty() {
            return;
        }
        self.entree = format!("1/({s})");
        self.focus_entree = true;
    }

    /// Backspace "intelligent" : retire d'un coup les motifs utiles ("sin(", "π", etc.).
    pub fn backspace_entree(&mut self) {
        // "asin(" avant "sin(" : sinon il resterait un "a"
        const MOTIFS: &[&str] = &[
            "asin(", "acos(", "atan(", "sqrt(", "cbrt(", "sin(", "cos(", "tan(", "log(", "ln(",
            "exp(", "abs(",
        ];

        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        match MOTIFS.iter().find(|m| self.entree.ends_with(*m)) {
            Some(m) => {
                let garde = self.entree.len() - m.len();
                self.entree.truncate(garde);
            }
            None => {
                self.entree.pop();
            }
        }

        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    /// Insère `texte` en fin d'entrée, avec les espaces qui vont bien.
    pub fn inserer(&mut self, texte: &str, kind: Insertion) {
        if texte.is_empty() {
            return;
        }

        let precedent = self.entree.chars().rev().find(|c| !c.is_whitespace());
        let apres_valeur = precedent
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, ')' | 'π' | '²' | '³' | '!'));
        let apres_op = precedent
            .is_some_and(|c| matches!(c, '+' | '-' | '*' | '/' | '×' | '÷' | '−' | '^' | '%'));

        match kind {
            Insertion::FermePar | Insertion::Suffixe => {
                // "2 ²" ne serait pas reconnu : le suffixe doit coller
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(texte);
            }
            Insertion::OuvrePar | Insertion::Fonction | Insertion::Mot => {
                if (apres_valeur || apres_op) && !self.entree.ends_with(' ') {
                    self.entree.push(' ');
                }
                self.entree.push_str(texte);
            }
            Insertion::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(texte);
                self.entree.push(' ');
            }
            Insertion::Chiffre => {
                // chiffres: pas d'espaces auto
                self.entree.push_str(texte);
            }
        }

        self.focus_entree = true;
    }
}

/// "(…)" dont la première parenthèse ferme à la toute fin.
fn entre_parentheses(s: &str) -> bool {
    if !(s.starts_with('(') && s.ends_with(')')) {
        return false;
    }
    let mut profondeur = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => profondeur += 1,
            ')' => {
                profondeur = match profondeur.checked_sub(1) {
                    Some(p) => p,
                    None => return false,
                };
                if profondeur == 0 {
                    return i == s.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Horodatage affiché dans l'historique : "2026-01-11 14:30:00".
pub fn format_horodatage(h: &DateTime<Local>) -> String {
    h.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Affichage d'un f64 fini : décimal court, notation scientifique aux extrêmes.
pub fn format_resultat(v: f64) -> String {
    if v == 0.0 {
        // pas de "-0"
        return "0".to_string();
    }
    let a = v.abs();
    if !(1e-9..1e15).contains(&a) {
        format!("{v:e}")
    } else {
        format!("{v}")
    }
}
