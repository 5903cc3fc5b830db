use egui::Color32;

use crate::command::Command;
use crate::components::ModeButton;
use crate::editor::Editor;
use crate::element::ElementKind;
use crate::scene::ElementStyle;
use crate::state::Mode;

/// Where a dropped image file goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropTarget {
    #[default]
    Photo,
    Reference,
}

/// UI-only state of the side panel.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub drop_target: DropTarget,
    /// Last message shown under the save button
    pub status: Option<String>,
    pub export_running: bool,
}

/// Things the panel asks the app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    Execute(Command),
    SetReferenceOpacity(f32),
    ClearReference,
    NewStudy,
    Save,
}

fn swatch(kind: ElementKind) -> Option<Color32> {
    let style = ElementStyle::for_kind(kind);
    style
        .stroke
        .map(|s| s.color)
        .or(style.badge.map(|b| b.fill))
}

pub fn tools_panel(ctx: &egui::Context, editor: &Editor, state: &mut PanelState) -> Vec<PanelAction> {
    let mut actions = Vec::new();
    let session = editor.session();
    let mode = session.mode();

    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Estudio morfológico");
            ui.separator();

            ui.label("Dibujar");
            for kind in ElementKind::ALL {
                let selected = mode == Mode::Draw(kind);
                if ModeButton::new(kind.title(), swatch(kind), selected).show(ui).clicked() {
                    actions.push(PanelAction::Execute(Command::SetMode(Mode::Draw(kind))));
                }
            }
            ui.add_space(6.0);
            ui.label("Herramientas");
            for (title, target) in [("Ver / mover", Mode::View), ("Editar", Mode::Edit), ("Borrar", Mode::Delete)] {
                if ModeButton::new(title, None, mode == target).show(ui).clicked() {
                    actions.push(PanelAction::Execute(Command::SetMode(target)));
                }
            }

            ui.separator();
            ui.horizontal(|ui| {
                let can_undo = !session.current_points().is_empty() || !session.elements().is_empty();
                if ui.add_enabled(can_undo, egui::Button::new("Deshacer")).clicked() {
                    actions.push(PanelAction::Execute(Command::Undo));
                }
                if ui
                    .add_enabled(mode.is_drawing() && session.current_points().len() >= 2, egui::Button::new("Cerrar forma"))
                    .clicked()
                {
                    actions.push(PanelAction::Execute(Command::CloseShape));
                }
            });
            if ui
                .add_enabled(!session.viewport().is_identity(), egui::Button::new("Restablecer vista"))
                .clicked()
            {
                actions.push(PanelAction::Execute(Command::ResetView));
            }

            ui.separator();
            ui.label("Fondo");
            let mut show = session.show_background();
            if ui.checkbox(&mut show, "Mostrar imagen de fondo").changed() {
                actions.push(PanelAction::Execute(Command::SetShowBackground(show)));
            }
            ui.horizontal(|ui| {
                ui.label("Soltar archivo como:");
                ui.selectable_value(&mut state.drop_target, DropTarget::Photo, "Foto");
                ui.selectable_value(&mut state.drop_target, DropTarget::Reference, "Referencia");
            });
            if let Some(reference) = editor.background().and_then(|b| b.reference()) {
                let mut opacity = reference.opacity() * 100.0;
                let slider = egui::Slider::new(&mut opacity, 0.0..=100.0).suffix(" %").text("Opacidad");
                if ui.add(slider).changed() {
                    actions.push(PanelAction::SetReferenceOpacity(opacity / 100.0));
                }
                if ui.button("Quitar referencia").clicked() {
                    actions.push(PanelAction::ClearReference);
                }
            }
            if editor.background().is_none() {
                ui.weak("Arrastre una imagen sobre la ventana para usarla de fondo.");
            }

            ui.separator();
            ui.label("Inventario");
            egui::Grid::new("inventory_grid").num_columns(2).striped(true).show(ui, |ui| {
                for kind in ElementKind::ALL {
                    ui.label(kind.title());
                    ui.label(session.elements_of(kind).count().to_string());
                    ui.end_row();
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.add_enabled(!state.export_running, egui::Button::new("Guardar en el formulario")).clicked() {
                    actions.push(PanelAction::Save);
                }
                if state.export_running {
                    ui.spinner();
                }
            });
            if ui.button("Nuevo estudio").clicked() {
                actions.push(PanelAction::NewStudy);
            }
            if let Some(status) = &state.status {
                ui.label(status);
            }

            ui.separator();
            ui.small("C / Enter: cerrar forma · Esc: cancelar · Ctrl+Z: deshacer");
            ui.small("Rueda: zoom · botón central: desplazar");
        });

    actions
}
