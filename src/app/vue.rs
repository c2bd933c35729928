// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue, Backspace efface (quand le champ est focus)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - Deux pavés : basique (toujours) + scientifique (mode)
//
// Note :
// - PAS de Key::NumEnter (n'existe pas dans egui 0.33.x)

use eframe::egui;

use calculatrice_sci::noyau::{eval_expression, ModeClassement};

use super::etat::{format_horodatage, format_resultat, AppCalc, Insertion};

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
    Negation,
    Inverse,
    MemoireEffacer,
    MemoireRappeler,
    MemoireAjouter,
    MemoireSoustraire,
}

/// Clic sur une ligne d'historique (appliqué après la boucle d'affichage).
enum ActionHistorique {
    Reprendre(u64),
    Supprimer(u64),
}

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité "calc"
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Calculatrice scientifique");
                    ui.separator();
                    ui.selectable_value(&mut self.mode_scientifique, false, "Basique");
                    ui.selectable_value(&mut self.mode_scientifique, true, "Scientifique");
                });
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultat(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
                self.ui_demarche(ui);
                self.ui_reglages(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: (2 + 3) × 4, sin(30) + cos(60), 5!, √(16)")
                .id_salt("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : Enter évalue (seulement si le champ est focus) ---
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.eval_via_noyau();
        }

        ui.add_space(6.0);

        // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
        ui.horizontal(|ui| {
            self.bouton_action(ui, "C", "Efface seulement l'entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultat + erreur + démarche",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro (mémoire comprise)", Action::ResetTotal);

            ui.separator();

            self.bouton_action(ui, "MC", "Efface la mémoire", Action::MemoireEffacer);
            self.bouton_action(ui, "MR", "Insère la mémoire", Action::MemoireRappeler);
            self.bouton_action(ui, "M+", "Ajoute le dernier résultat", Action::MemoireAjouter);
            self.bouton_action(ui, "M-", "Retranche le dernier résultat", Action::MemoireSoustraire);

            if self.memoire != 0.0 {
                ui.monospace(format!("M = {}", format_resultat(self.memoire)));
            }
        });

        ui.add_space(8.0);

        self.ui_pave_basique(ui);

        if self.mode_scientifique {
            ui.add_space(8.0);
            self.ui_pave_scientifique(ui);
        }

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_basique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_basique")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", "7", Insertion::Chiffre);
                self.bouton_insert(ui, "8", "8", Insertion::Chiffre);
                self.bouton_insert(ui, "9", "9", Insertion::Chiffre);
                self.bouton_insert(ui, "÷", "÷", Insertion::Op);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.end_row();

                self.bouton_insert(ui, "4", "4", Insertion::Chiffre);
                self.bouton_insert(ui, "5", "5", Insertion::Chiffre);
                self.bouton_insert(ui, "6", "6", Insertion::Chiffre);
                self.bouton_insert(ui, "×", "×", Insertion::Op);
                self.bouton_insert(ui, "(", "(", Insertion::OuvrePar);
                ui.end_row();

                self.bouton_insert(ui, "1", "1", Insertion::Chiffre);
                self.bouton_insert(ui, "2", "2", Insertion::Chiffre);
                self.bouton_insert(ui, "3", "3", Insertion::Chiffre);
                self.bouton_insert(ui, "−", "-", Insertion::Op);
                self.bouton_insert(ui, ")", ")", Insertion::FermePar);
                ui.end_row();

                self.bouton_insert(ui, "0", "0", Insertion::Chiffre);
                self.bouton_insert(ui, ".", ".", Insertion::Chiffre);
                self.bouton_action(ui, "±", "Change le signe de l'entrée", Action::Negation);
                self.bouton_insert(ui, "+", "+", Insertion::Op);

                let eq = ui.add_sized([46.0, 28.0], egui::Button::new("="));
                if eq.clicked() {
                    self.eval_via_noyau();
                }
                ui.end_row();
            });
    }

    fn ui_pave_scientifique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_scientifique")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "sin", "sin(", Insertion::Fonction);
                self.bouton_insert(ui, "cos", "cos(", Insertion::Fonction);
                self.bouton_insert(ui, "tan", "tan(", Insertion::Fonction);
                self.bouton_insert(ui, "π", "π", Insertion::Mot);
                self.bouton_insert(ui, "e", "e", Insertion::Mot);
                ui.end_row();

                self.bouton_insert(ui, "asin", "asin(", Insertion::Fonction);
                self.bouton_insert(ui, "acos", "acos(", Insertion::Fonction);
                self.bouton_insert(ui, "atan", "atan(", Insertion::Fonction);
                self.bouton_insert(ui, "x²", "²", Insertion::Suffixe);
                self.bouton_insert(ui, "x³", "³", Insertion::Suffixe);
                ui.end_row();

                self.bouton_insert(ui, "log", "log(", Insertion::Fonction);
                self.bouton_insert(ui, "ln", "ln(", Insertion::Fonction);
                self.bouton_insert(ui, "exp", "exp(", Insertion::Fonction);
                self.bouton_insert(ui, "n!", "!", Insertion::Suffixe);
                self.bouton_insert(ui, "xʸ", "^", Insertion::Op);
                ui.end_row();

                self.bouton_insert(ui, "√", "sqrt(", Insertion::Fonction);
                self.bouton_insert(ui, "∛", "cbrt(", Insertion::Fonction);
                self.bouton_insert(ui, "|x|", "abs(", Insertion::Fonction);
                self.bouton_action(ui, "1/x", "Inverse de l'entrée", Action::Inverse);
                self.bouton_insert(ui, "mod", "%", Insertion::Op);
                ui.end_row();
            });
    }

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Résultat :");
            if let Some(t) = self.type_operation {
                ui.weak(format!("({t})"));
            }
        });
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 1);
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        let mut clic: Option<ActionHistorique> = None;
        let mut vider = false;

        egui::CollapsingHeader::new(format!("Historique ({})", self.historique.len()))
            .default_open(true)
            .show(ui, |ui| {
                if self.historique.is_empty() {
                    ui.weak("aucun calcul");
                    return;
                }
                if ui.button("Vider l'historique").clicked() {
                    vider = true;
                }
                for h in &self.historique {
                    ui.horizontal(|ui| {
                        if ui.small_button("↺").on_hover_text("Reprendre").clicked() {
                            clic = Some(ActionHistorique::Reprendre(h.id));
                        }
                        if ui.small_button("✕").on_hover_text("Supprimer").clicked() {
                            clic = Some(ActionHistorique::Supprimer(h.id));
                        }
                        ui.monospace(format!(
                            "#{}  {} = {}  [{}]",
                            h.id,
                            h.expression,
                            format_resultat(h.resultat),
                            h.type_operation
                        ));
                        ui.weak(format_horodatage(&h.horodatage));
                    });
                }
            });

        if vider {
            self.vider_historique();
        }
        match clic {
            Some(ActionHistorique::Reprendre(id)) => {
                self.reprendre_historique(id);
            }
            Some(ActionHistorique::Supprimer(id)) => {
                self.supprimer_historique(id);
            }
            None => {}
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Forme canonique", "demarche_canon", &self.demarche.canonique);
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
                Self::champ_demarche(ui, "Arbre", "demarche_arbre", &self.demarche.arbre);
            });
    }

    fn ui_reglages(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Réglages")
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Profondeur max :");
                    let mut p = self.reglages.profondeur_max as u32;
                    let resp = ui.add(egui::DragValue::new(&mut p).speed(1).range(1..=2000));
                    if resp.changed() {
                        self.reglages.set_profondeur_max(p as usize);
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Classement :");
                    ui.selectable_value(
                        &mut self.reglages.classement,
                        ModeClassement::Compatible,
                        "compatible",
                    );
                    ui.selectable_value(
                        &mut self.reglages.classement,
                        ModeClassement::Strict,
                        "strict",
                    );
                });
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 2);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule "stable", sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([46.0, 28.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
                Action::Negation => self.negation_entree(),
                Action::Inverse => self.inverse_entree(),
                Action::MemoireEffacer => self.memoire_effacer(),
                Action::MemoireRappeler => self.memoire_rappeler(),
                Action::MemoireAjouter => self.memoire_ajouter(),
                Action::MemoireSoustraire => self.memoire_soustraire(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: Insertion) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if resp.clicked() {
            self.inserer(to_insert, kind);
        }
    }

    /// Évalue l'entrée via le noyau, puis dépose résultat / erreur dans l'état UI.
    fn eval_via_noyau(&mut self) {
        match eval_expression(&self.entree, &self.reglages) {
            Ok((calcul, demarche)) => {
                self.set_resultat(calcul, demarche, chrono::Local::now())
            }
            Err(e) => self.set_erreur(e.to_string()),
        }
        self.focus_entree = true;
    }
}
