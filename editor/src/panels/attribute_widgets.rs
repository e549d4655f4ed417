//! Value rows of the inspector and the edit handler behind them
//!
//! [`add_value_row`] is the only place that maps a value kind to widgets.
//! Editable line edits capture an [`AttributeBinding`] and report the entered
//! text through [`EditorAction::EditValue`]; [`apply_edit`] writes it back.

use engine::reflect::{Reflect, ReflectError};
use engine::scene::{attr, Scene};
use engine::ui::{ElementKind, ListItem, UiElementId, UiEvent, UiEventKind};
use engine::variant::{parse_float, Axis, ValueKind, Variant, VariantParseError};
use thiserror::Error;
use tracing::debug;

use crate::actions::{AttributeBinding, BindingTarget, EditorAction};
use crate::windows::{self, EditorUi};

/// Name of the single line edit of scalar rows
pub const VALUE_EDIT: &str = "Value";
pub const EMPTY_STRING_VECTOR: &str = "(Empty StringVector)";

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("parse error: {0}")]
    Parse(#[from] VariantParseError),

    #[error("'{0}' is not a number")]
    InvalidComponent(String),

    #[error(transparent)]
    Reflect(#[from] ReflectError),

    #[error("edit target {0:?} no longer exists")]
    MissingTarget(BindingTarget),

    #[error("attribute '{0}' has no current value")]
    MissingValue(String),
}

/// Add one inspector row for a value
///
/// Variables are labelled with their type. Rows are read-only unless
/// `editable` is set.
pub fn add_value_row(
    ui: &mut EditorUi,
    panel: UiElementId,
    target: BindingTarget,
    name: &str,
    value: &Variant,
    editable: bool,
) -> UiElementId {
    let kind = value.kind();
    let row = ui.create(panel, ElementKind::Row, name);
    let label = match target {
        BindingTarget::NodeVar(_) => format!("{name} ({kind})"),
        _ => name.to_string(),
    };
    let binding = |field: Option<Axis>| AttributeBinding {
        target,
        name: name.to_string(),
        kind,
        field,
    };

    match kind {
        ValueKind::Bool | ValueKind::Int | ValueKind::Float | ValueKind::String => {
            windows::add_text(ui, row, "Label", &label);
            add_line_edit(ui, row, VALUE_EDIT, &value.to_text(), editable.then(|| binding(None)));
        }
        ValueKind::Vector2 | ValueKind::Vector3 | ValueKind::Vector4 | ValueKind::Quaternion => {
            windows::add_text(ui, row, "Label", &label);
            for axis in Axis::ALL.into_iter().take(kind.component_count()) {
                let text = value
                    .component(axis)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                windows::add_text(ui, row, &format!("{}Label", axis.label()), axis.label());
                add_line_edit(ui, row, axis.label(), &text, editable.then(|| binding(Some(axis))));
            }
        }
        ValueKind::StringVector => {
            windows::add_text(ui, row, "Label", &label);
            let list = ui.create(row, ElementKind::DropDownList, "Values");
            match value {
                Variant::StringVector(strings) if !strings.is_empty() => {
                    for text in strings {
                        ui.add_item(list, ListItem::new(text.clone()));
                    }
                }
                _ => {
                    ui.add_item(list, ListItem::new(EMPTY_STRING_VECTOR));
                }
            }
            ui.set_selection(list, Some(0));
        }
        ValueKind::ResourceRef => {
            windows::add_text(ui, row, "Label", &label);
            let resource = match value {
                Variant::ResourceRef(r) => r.name.as_str(),
                _ => "",
            };
            windows::add_text(ui, row, "Resource", resource);
        }
        ValueKind::ResourceRefList => {
            windows::add_text(ui, row, "Label", &label);
            let scroll = ui.create(row, ElementKind::ScrollView, "Resources");
            let list = ui.create(scroll, ElementKind::ListView, "ResourceList");
            if let Variant::ResourceRefList(resources) = value {
                for name in &resources.names {
                    ui.add_item(list, ListItem::new(name.clone()));
                }
            }
        }
        ValueKind::None | ValueKind::IntVector2 | ValueKind::Color | ValueKind::VariantMap => {
            windows::add_text(ui, row, "Label", &format!("{name} ({})", kind.name()));
        }
    }
    row
}

fn add_line_edit(
    ui: &mut EditorUi,
    row: UiElementId,
    name: &str,
    text: &str,
    binding: Option<AttributeBinding>,
) -> UiElementId {
    let edit = ui.create(row, ElementKind::LineEdit, name);
    ui.set_text(edit, text);
    match binding {
        Some(binding) => ui.subscribe(edit, UiEventKind::TextFinished, move |event| match event {
            UiEvent::TextFinished { text, .. } => Some(EditorAction::EditValue {
                binding: binding.clone(),
                text: text.clone(),
            }),
            _ => None,
        }),
        None => {
            if let Some(element) = ui.get_mut(edit) {
                element.editable = false;
            }
        }
    }
    edit
}

fn current_value(scene: &Scene, binding: &AttributeBinding, world: bool) -> Option<Variant> {
    match binding.target {
        BindingTarget::Node(id) => {
            let node = scene.node(id)?;
            match binding.name.as_str() {
                attr::POSITION if world => Some(Variant::Vector3(scene.world_position(id))),
                attr::ROTATION if world => Some(Variant::Quaternion(scene.world_rotation(id))),
                name => node.attribute(name),
            }
        }
        BindingTarget::Component(id) => scene.component(id)?.data().attribute(&binding.name),
        BindingTarget::NodeVar(id) => scene.node(id)?.var(&binding.name).cloned(),
    }
}

fn target_exists(scene: &Scene, target: BindingTarget) -> bool {
    match target {
        BindingTarget::Node(id) | BindingTarget::NodeVar(id) => scene.contains_node(id),
        BindingTarget::Component(id) => scene.contains_component(id),
    }
}

/// Parse edited text and write it to the bound attribute
///
/// Component fields replace one axis of the current value. With `world` set,
/// node position and rotation are interpreted in world space.
pub fn apply_edit(
    scene: &mut Scene,
    binding: &AttributeBinding,
    text: &str,
    world: bool,
) -> Result<Variant, EditError> {
    if !target_exists(scene, binding.target) {
        return Err(EditError::MissingTarget(binding.target));
    }
    let value = match binding.field {
        Some(axis) => {
            let component =
                parse_float(text).ok_or_else(|| EditError::InvalidComponent(text.to_string()))?;
            current_value(scene, binding, world)
                .and_then(|current| current.with_component(axis, component))
                .ok_or_else(|| EditError::MissingValue(binding.name.clone()))?
        }
        None => Variant::parse(binding.kind, text)?,
    };

    match binding.target {
        BindingTarget::Node(id) => match (binding.name.as_str(), &value) {
            (attr::POSITION, Variant::Vector3(position)) if world => {
                scene.set_world_position(id, *position)
            }
            (attr::ROTATION, Variant::Quaternion(rotation)) if world => {
                scene.set_world_rotation(id, *rotation)
            }
            (name, _) => {
                if let Some(node) = scene.node_mut(id) {
                    node.set_attribute(name, value.clone())?;
                }
            }
        },
        BindingTarget::Component(id) => {
            if let Some(slot) = scene.component_mut(id) {
                slot.data_mut().set_attribute(&binding.name, value.clone())?;
            }
        }
        BindingTarget::NodeVar(id) => {
            if let Some(node) = scene.node_mut(id) {
                node.set_var(binding.name.clone(), value.clone());
            }
        }
    }
    debug!(target = ?binding.target, attribute = %binding.name, value = %value.to_text(), "Applied edit");
    Ok(value)
}
