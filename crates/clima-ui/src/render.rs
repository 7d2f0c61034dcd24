//! Plain-text rendering of the weather screen.

use clima_core::LocationError;
use clima_weather::regions;

use crate::RefreshState;

pub fn render_state(state: &RefreshState) -> String {
    let mut out = String::from("Datos del Clima\n");

    if state.is_loading {
        out.push_str("  Cargando...\n");
    } else {
        let reading = &state.current;
        out.push_str(&format!("  Temperatura:  {} °C\n", reading.temperature_celsius));
        out.push_str(&format!("  Humedad:      {} %\n", reading.relative_humidity_percent));
        out.push_str(&format!("  Estado:       {}\n", reading.condition_description));
        out.push_str(&format!("  Departamento: {}\n", reading.region_name));
    }

    if let Some(updated) = state.last_updated {
        out.push_str(&format!(
            "  Actualizado:  {}\n",
            updated.with_timezone(&chrono::Local).format("%H:%M:%S")
        ));
    }

    out.push_str(&format!(
        "Actualizacion automatica: {}\n",
        if state.auto_refresh_enabled { "si" } else { "no" }
    ));
    out
}

/// Acknowledgement shown when location fails and the default region is used.
pub fn render_notice(error: &LocationError) -> String {
    format!("[{}] {}", error.title(), error.user_message())
}

/// Numbered picker list, marking the selected region.
pub fn render_regions(selected: &str) -> String {
    regions::names()
        .enumerate()
        .map(|(i, name)| {
            let marker = if name == selected { '*' } else { ' ' };
            format!("{marker} {:>2}. {name}", i + 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve picker input: a 1-based index into the list or an exact name.
pub fn parse_region_choice(input: &str) -> Option<&'static str> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return regions::all().get(index.checked_sub(1)?).map(|r| r.name);
    }
    regions::find(input).map(|r| r.name)
}
