//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use everhome_core::{
    AccountConfig, Category, Coordinator, CoreError, Device, DeviceCollection, EntityDescription,
};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Serializable view ───────────────────────────────────────────────

/// Projected readings; `None` serializes as `null` (unknown).
#[derive(Debug, Serialize)]
struct Readings {
    is_on: Option<bool>,
    is_open: Option<bool>,
    is_closed: Option<bool>,
    position: Option<u8>,
    brightness: Option<u8>,
    battery_low: Option<bool>,
    battery_level: Option<i64>,
}

#[derive(Debug, Serialize)]
struct DeviceView {
    id: String,
    name: Option<String>,
    subtype: Option<String>,
    category: Option<Category>,
    readings: Readings,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<EntityDescription>,
}

impl DeviceView {
    fn new(device: &Device) -> Self {
        let category = device.category();
        let is_cover = category == Some(Category::Cover);
        Self {
            id: device.id.to_string(),
            name: device.name.clone(),
            subtype: device.subtype.clone(),
            category,
            readings: Readings {
                is_on: match category {
                    Some(Category::Cover) => None,
                    Some(Category::BinarySensor) => device.binary_state(),
                    _ => device.is_on(),
                },
                is_open: if is_cover { device.cover_is_open() } else { None },
                is_closed: if is_cover { device.cover_is_closed() } else { None },
                position: device.cover_position(),
                brightness: device.brightness(),
                battery_low: device.battery_low(),
                battery_level: device.battery_level(),
            },
            description: None,
        }
    }

    fn described(device: &Device, account_id: &str) -> Self {
        Self {
            description: device.describe(account_id),
            ..Self::new(device)
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subtype")]
    subtype: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "State")]
    state: String,
}

impl DeviceRow {
    fn new(view: &DeviceView, color: bool) -> Self {
        Self {
            id: view.id.clone(),
            name: view.name.clone().unwrap_or_default(),
            subtype: view.subtype.clone().unwrap_or_else(|| "-".into()),
            category: view
                .category
                .map_or_else(|| "-".into(), |c| c.to_string()),
            state: state_summary(view, color),
        }
    }
}

/// One-cell summary of the projected state.
fn state_summary(view: &DeviceView, color: bool) -> String {
    let r = &view.readings;
    match view.category {
        Some(Category::Cover) => match r.position {
            Some(position) => format!(
                "{} ({position}%)",
                output::tri_state(r.is_open, "open", "closed", color)
            ),
            None => output::tri_state(r.is_open, "open", "closed", color),
        },
        Some(Category::Light) => match (r.is_on, r.brightness) {
            (Some(true), Some(brightness)) => {
                format!("{} ({brightness}/255)", output::tri_state(Some(true), "on", "off", color))
            }
            (on, _) => output::tri_state(on, "on", "off", color),
        },
        Some(Category::Switch) => output::tri_state(r.is_on, "on", "off", color),
        Some(Category::BinarySensor) => {
            let (on, off) = match view.subtype.as_deref() {
                Some("door" | "window") => ("open", "closed"),
                _ => ("detected", "clear"),
            };
            output::tri_state(r.is_on, on, off, color)
        }
        None => "-".into(),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

fn detail(view: &DeviceView) -> String {
    let r = &view.readings;
    let mut lines = vec![
        format!("ID:         {}", view.id),
        format!("Name:       {}", view.name.as_deref().unwrap_or("-")),
        format!("Subtype:    {}", view.subtype.as_deref().unwrap_or("-")),
        format!("Category:   {}", opt(view.category)),
        format!("On:         {}", opt(r.is_on)),
        format!("Open:       {}", opt(r.is_open)),
        format!("Closed:     {}", opt(r.is_closed)),
        format!("Position:   {}", opt(r.position)),
        format!("Brightness: {}", opt(r.brightness)),
        format!("Battery:    {}", opt(r.battery_level)),
        format!("Low:        {}", opt(r.battery_low)),
    ];
    if let Some(ref d) = view.description {
        lines.push(format!("Unique ID:  {}", d.unique_id));
        lines.push(format!("Model:      {}", d.model));
        lines.push(format!("Firmware:   {}", d.firmware));
        lines.push(format!("Class:      {}", opt(d.device_class)));
        lines.push(format!("Icon:       {}", d.icon.unwrap_or("-")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: AccountConfig,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    let rendered = Coordinator::oneshot(config, |coordinator| async move {
        let account_id = coordinator.config().account_id.clone();
        let devices = coordinator.devices();

        Ok::<_, CoreError>(match args.command {
            DevicesCommand::List { category } => {
                let category = category.map(Category::from);
                let views: Vec<DeviceView> = devices
                    .iter()
                    .filter(|d| category.is_none() || d.category() == category)
                    .map(|d| DeviceView::new(d))
                    .collect();
                render_views(&views, global, color)
            }
            DevicesCommand::Get { id } => match devices.get(&id) {
                Some(device) => {
                    let view = DeviceView::described(device, &account_id);
                    output::render_single(&global.output, &view, detail, |v| v.id.clone())
                }
                None => Err(CliError::DeviceNotFound { id }),
            },
        })
    })
    .await??;

    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// Render a collection snapshot the way `devices list` does.
pub(crate) fn render_collection(
    devices: &DeviceCollection,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    let color = output::should_color(&global.color);
    let views: Vec<DeviceView> = devices.iter().map(|d| DeviceView::new(d)).collect();
    render_views(&views, global, color)
}

fn render_views(views: &[DeviceView], global: &GlobalOpts, color: bool) -> Result<String, CliError> {
    output::render_list(
        &global.output,
        views,
        |v| DeviceRow::new(v, color),
        |v| v.id.clone(),
    )
}
