//! src/noyau/reglages.rs
//!
//! Réglages du noyau (immuables pendant un appel).
//!
//! - profondeur_max : borne sur la profondeur de l'arbre (anti pile / anti gel)
//! - classement     : Compatible (historique) ou Strict (mots entiers)
//!
//! Lecture optionnelle depuis l'environnement :
//! - CALC_PROFONDEUR_MAX=<entier>
//! - CALC_CLASSEMENT=strict|compatible

use log::warn;

use super::classement::ModeClassement;

/// Profondeur d'arbre par défaut (une somme plate de ~1000 termes passe).
pub const PROFONDEUR_DEFAUT: usize = 1000;

/// Garde-fou : au-delà, la descente récursive devient risquée pour la pile.
pub const PROFONDEUR_MAX: usize = 2000;

pub const ENV_PROFONDEUR: &str = "CALC_PROFONDEUR_MAX";
pub const ENV_CLASSEMENT: &str = "CALC_CLASSEMENT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub profondeur_max: usize,
    pub classement: ModeClassement,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            profondeur_max: PROFONDEUR_DEFAUT,
            classement: ModeClassement::Compatible,
        }
    }
}

impl Reglages {
    /// Borne la profondeur dans [1, PROFONDEUR_MAX].
    pub fn set_profondeur_max(&mut self, n: usize) {
        self.profondeur_max = n.clamp(1, PROFONDEUR_MAX);
    }

    pub fn avec_classement(mut self, mode: ModeClassement) -> Self {
        self.classement = mode;
        self
    }

    /// Défauts + surcharges de l'environnement (valeurs invalides ignorées).
    pub fn depuis_env() -> Self {
        Self::depuis_valeurs(
            std::env::var(ENV_PROFONDEUR).ok().as_deref(),
            std::env::var(ENV_CLASSEMENT).ok().as_deref(),
        )
    }

    fn depuis_valeurs(profondeur: Option<&str>, classement: Option<&str>) -> Self {
        let mut r = Self::default();

        if let Some(p) = profondeur {
            match p.trim().parse::<usize>() {
                Ok(n) => r.set_profondeur_max(n),
                Err(_) => warn!("{ENV_PROFONDEUR}={p:?} ignoré (entier attendu)"),
            }
        }

        if let Some(c) = classement {
            match c.trim().to_lowercase().as_str() {
                "strict" => r.classement = ModeClassement::Strict,
                "compatible" => r.classement = ModeClassement::Compatible,
                _ => warn!("{ENV_CLASSEMENT}={c:?} ignoré (strict|compatible)"),
            }
        }

        r
    }
}
